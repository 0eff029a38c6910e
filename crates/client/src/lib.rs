/**
 * Session with a remote node: HTTP client,
 *  default headers and the cached remote version.
 */
pub mod client;
/**
 * Error taxonomy shared by every command.
 */
pub mod error;
/**
 * Multipart bodies for file trees.
 */
pub mod multipart;
/**
 * Generic RPC command requests.
 */
pub mod request;
/**
 * Newline-delimited JSON response streams.
 */
pub mod stream;
/**
 * UnixFS add and ls pipelines.
 */
pub mod unixfs;
/**
 * Remote version discovery.
 */
pub mod version;

pub use client::{ApiClient, ClientConfig, DEFAULT_API_URL};
pub use error::{ApiError, ErrorKind};
pub use request::{ApiRequest, Request};
pub use stream::JsonLines;
pub use unixfs::UnixfsApi;
pub use version::VersionInfo;

pub use tokio_util::sync::CancellationToken;

pub mod prelude {
    pub use crate::{ApiClient, ApiError, CancellationToken, ClientConfig, ErrorKind};
    pub use common::prelude::*;
}
