pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "unixfs")]
#[command(about = "Add and list UnixFS content on a remote node over its RPC API")]
pub struct Args {
    /// RPC API base URL (overrides the config file)
    #[arg(long, global = true)]
    pub api: Option<Url>,

    /// Path to the config directory (defaults to ~/.unixfs-rpc)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: crate::Command,
}
