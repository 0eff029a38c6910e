use std::path::PathBuf;

use clap::Args;

use client::{ApiError, CancellationToken};
use common::hash_fn;
use common::options::{DEFAULT_CHUNKER, DEFAULT_INLINE_LIMIT};
use common::prelude::{AddEvent, AddOptions, CidVersion, Layout, Node, RawLeaves};

#[derive(Args, Debug, Clone)]
pub struct Add {
    /// File or directory to add
    pub path: PathBuf,

    /// Include files and directories whose names start with a dot
    #[arg(long)]
    pub hidden: bool,

    /// Multihash function name
    #[arg(long, default_value = "sha2-256")]
    pub hash: String,

    /// Chunking algorithm, e.g. size-262144 or rabin-min-avg-max
    #[arg(long, default_value = DEFAULT_CHUNKER)]
    pub chunker: String,

    /// CID version (defaults to 0 for sha2-256, 1 otherwise)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub cid_version: Option<u8>,

    /// Store leaves as raw blocks (left to the remote when omitted)
    #[arg(long)]
    pub raw_leaves: Option<bool>,

    /// Use the trickle DAG layout
    #[arg(long)]
    pub trickle: bool,

    /// Inline small blocks into their CIDs
    #[arg(long)]
    pub inline: bool,

    /// Largest block size to inline, in bytes
    #[arg(long, default_value_t = DEFAULT_INLINE_LIMIT)]
    pub inline_limit: u32,

    /// Reference file contents on the remote's disk instead of copying them
    #[arg(long)]
    pub nocopy: bool,

    /// Check the remote's filestore for pre-existing blocks
    #[arg(long)]
    pub fscache: bool,

    /// Only compute the CID, store nothing
    #[arg(long)]
    pub only_hash: bool,

    /// Pin the added content
    #[arg(long)]
    pub pin: bool,

    /// Only report the final root
    #[arg(long)]
    pub silent: bool,

    /// Report byte progress while adding
    #[arg(long)]
    pub progress: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AddError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("unknown hash function: {0}")]
    UnknownHash(String),
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to walk input: {0}")]
    Walk(#[from] tokio::task::JoinError),
}

impl Add {
    fn options(&self) -> Result<AddOptions, AddError> {
        let hash =
            hash_fn::code(&self.hash).ok_or_else(|| AddError::UnknownHash(self.hash.clone()))?;

        let mut options = AddOptions::new()
            .hash(hash)
            .chunker(self.chunker.clone())
            .inline(self.inline)
            .inline_limit(self.inline_limit)
            .no_copy(self.nocopy)
            .fs_cache(self.fscache)
            .only_hash(self.only_hash)
            .pin(self.pin)
            .silent(self.silent)
            .progress(self.progress);

        options.raw_leaves = RawLeaves::from(self.raw_leaves);
        if let Some(version) = self.cid_version {
            let version = if version == 0 {
                CidVersion::V0
            } else {
                CidVersion::V1
            };
            options = options.cid_version(version);
        }
        if self.trickle {
            options = options.layout(Layout::Trickle);
        }
        Ok(options)
    }
}

fn describe(event: &AddEvent) -> String {
    match &event.path {
        Some(path) => format!("added {} {}", path, event.name),
        None => format!("{}: {} bytes", event.name, event.bytes),
    }
}

#[async_trait::async_trait]
impl crate::op::Op for Add {
    type Error = AddError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let options = self.options()?;

        let path = self.path.clone();
        let hidden = self.hidden;
        let node = tokio::task::spawn_blocking(move || Node::from_path(&path, hidden))
            .await?
            .map_err(|source| AddError::Read {
                path: self.path.clone(),
                source,
            })?;

        // events are printed as they arrive, the sender closes with the add
        let (events, rx) = flume::unbounded();
        let printer = tokio::spawn(async move {
            while let Ok(event) = rx.recv_async().await {
                eprintln!("{}", describe(&event));
            }
        });

        let cancel = CancellationToken::new();
        let interrupt = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("interrupted, canceling add");
                    cancel.cancel();
                }
            })
        };

        let result = ctx
            .client
            .unixfs()
            .add(node, options.events(events), &cancel)
            .await;
        interrupt.abort();
        finish_printer(printer).await;

        Ok(result?.to_string())
    }
}

/// Wait for the event printer. Returns false if it panicked or was cancelled.
async fn finish_printer(printer: tokio::task::JoinHandle<()>) -> bool {
    match printer.await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("event printer failed: {}", e);
            false
        }
    }
}
