//! Remote version discovery and the wire conventions it selects.

use std::time::Duration;

use semver::{Prerelease, Version};
use serde::{Deserialize, Serialize};

use crate::request::{ApiRequest, Request};

/// First remote version that expects `abspath-encoded` multipart headers.
pub fn encoded_abs_path_version() -> Version {
    Version {
        pre: Prerelease::new("dev").expect("hardcoded prerelease must parse"),
        ..Version::new(0, 23, 0)
    }
}

/// Whether bodies sent to `remote` must carry raw (legacy) absolute paths.
pub fn uses_legacy_abs_paths(remote: &Version) -> bool {
    *remote < encoded_abs_path_version()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VersionInfo {
    pub version: String,
    #[serde(default)]
    pub commit: String,
    #[serde(default)]
    pub repo: String,
    #[serde(default)]
    pub system: String,
    #[serde(default)]
    pub golang: String,
}

#[derive(Debug, Clone)]
pub(crate) struct VersionRequest {
    pub timeout: Duration,
}

impl ApiRequest for VersionRequest {
    type Response = VersionInfo;

    fn build_request(self) -> Request {
        Request::new("version").timeout(self.timeout)
    }
}
