use std::error::Error;
use std::path::PathBuf;

use url::Url;

use client::{ApiClient, ApiError, ClientConfig, DEFAULT_API_URL};

use crate::state::AppState;

/// Resolve the remote URL for the API client.
///
/// Priority: explicit `--api` flag > config file `api_url` > hardcoded default.
pub fn resolve_remote(explicit: Option<Url>, state: Option<&AppState>) -> Url {
    if let Some(url) = explicit {
        return url;
    }
    if let Some(state) = state {
        return state.config.api_url.clone();
    }
    Url::parse(DEFAULT_API_URL).expect("hardcoded URL must parse")
}

#[derive(Clone)]
pub struct OpContext {
    /// API client (always initialized with default or custom URL)
    pub client: ApiClient,
    /// Optional custom config path (defaults to ~/.unixfs-rpc)
    pub config_path: Option<PathBuf>,
}

impl OpContext {
    /// Create context with the resolved remote URL and, if a config was
    /// loaded, its client settings
    pub fn new(
        remote: Url,
        state: Option<&AppState>,
        config_path: Option<PathBuf>,
    ) -> Result<Self, ApiError> {
        let config = match state {
            Some(state) => state.config.client_config()?,
            None => ClientConfig::default(),
        };
        Ok(Self {
            client: ApiClient::with_config(&remote, config)?,
            config_path,
        })
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
