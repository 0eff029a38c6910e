use clap::Args;

use client::ApiError;
use common::prelude::build_info;

#[derive(Args, Debug, Clone)]
pub struct Version;

#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::op::Op for Version {
    type Error = VersionError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut lines = vec![format!("client: {}", build_info())];

        let base = ctx.client.base_url();
        match ctx.client.version_info().await {
            Ok(info) => {
                lines.push(format!("remote ({}): {}", base, info.version));
                if !info.commit.is_empty() {
                    lines.push(format!("  commit: {}", info.commit));
                }
                if !info.system.is_empty() {
                    lines.push(format!("  system: {}", info.system));
                }
            }
            Err(ApiError::Reqwest(e)) if e.is_connect() || e.is_timeout() => {
                lines.push(format!("remote ({}): NOT REACHABLE", base));
            }
            Err(e) => return Err(e.into()),
        }

        Ok(lines.join("\n"))
    }
}
