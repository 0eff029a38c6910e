use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use semver::Version;
use tokio::sync::OnceCell;
use url::Url;

use crate::error::ApiError;
use crate::request::{ApiRequest, Request};
use crate::unixfs::UnixfsApi;
use crate::version::{VersionInfo, VersionRequest};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5001";
pub const DEFAULT_VERSION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Upper bound for the remote version query.
    pub version_timeout: Duration,
    /// Extra headers sent with every request, e.g. `Authorization`.
    pub headers: HeaderMap,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version_timeout: DEFAULT_VERSION_TIMEOUT,
            headers: HeaderMap::new(),
            user_agent: concat!("unixfs-rpc/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, ApiError> {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        self.headers.insert(name, HeaderValue::from_str(value)?);
        Ok(self)
    }
}

/// Session with one remote node.
///
/// Clones share the connection pool and the cached remote version.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
    config: ClientConfig,
    version: Arc<OnceCell<Version>>,
}

impl ApiClient {
    pub fn new(remote: &Url) -> Result<Self, ApiError> {
        Self::with_config(remote, ClientConfig::default())
    }

    pub fn with_config(remote: &Url, config: ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .default_headers(config.headers.clone())
            .user_agent(config.user_agent.clone())
            .build()?;

        // joins are relative to the last path segment, keep the whole base
        let mut remote = remote.clone();
        if !remote.path().ends_with('/') {
            let path = format!("{}/", remote.path());
            remote.set_path(&path);
        }

        Ok(Self {
            remote,
            client,
            config,
            version: Arc::new(OnceCell::new()),
        })
    }

    /// Send a command and check the response status.
    ///
    /// The returned response body has not been read yet.
    pub async fn send(&self, request: Request) -> Result<Response, ApiError> {
        let command = request.command().to_string();
        let builder = request.build(&self.remote, &self.client)?;

        tracing::debug!(command = %command, remote = %self.remote, "sending request");
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(command = %command, "request failed: {}", e);
            e
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await?;
        let err = ApiError::remote(status, &body);
        tracing::warn!(command = %command, "remote returned an error: {}", err);
        Err(err)
    }

    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, ApiError> {
        let response = self.send(request.build_request()).await?;
        Ok(response.json::<T::Response>().await?)
    }

    /// Query the remote's full version report. Not cached.
    pub async fn version_info(&self) -> Result<VersionInfo, ApiError> {
        self.call(VersionRequest {
            timeout: self.config.version_timeout,
        })
        .await
    }

    /// The remote's version, queried once per session.
    ///
    /// Concurrent callers share a single query; a failed query is not
    /// cached and will be retried by the next caller.
    pub async fn remote_version(&self) -> Result<Version, ApiError> {
        let version = self
            .version
            .get_or_try_init(|| async {
                let info = self.version_info().await?;
                let version =
                    Version::parse(&info.version).map_err(|source| ApiError::Version {
                        raw: info.version.clone(),
                        source,
                    })?;
                tracing::debug!(remote_version = %version, "resolved remote version");
                Ok::<_, ApiError>(version)
            })
            .await?;
        Ok(version.clone())
    }

    pub fn unixfs(&self) -> UnixfsApi<'_> {
        UnixfsApi::new(self)
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }

    /// Get the underlying HTTP client for custom requests
    pub fn http_client(&self) -> &Client {
        &self.client
    }
}
