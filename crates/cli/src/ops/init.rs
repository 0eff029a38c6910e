use clap::Args;
use url::Url;

use client::DEFAULT_API_URL;

use crate::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// RPC API base URL of the remote node
    #[arg(long = "api-url", default_value = DEFAULT_API_URL)]
    pub api_url: Url,

    /// Timeout for the remote version query, in seconds
    #[arg(long, default_value_t = 30)]
    pub version_timeout_secs: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            api_url: self.api_url.clone(),
            version_timeout_secs: self.version_timeout_secs,
            ..AppConfig::default()
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        Ok(format!(
            "Initialized config at: {}\n\
             - API URL: {}\n\
             - Version timeout: {}s",
            state.config_path.display(),
            state.config.api_url,
            state.config.version_timeout_secs
        ))
    }
}
