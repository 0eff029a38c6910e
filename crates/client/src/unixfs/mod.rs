//! UnixFS commands: streaming `add` and `ls`.

mod add;
mod ls;
pub mod params;
pub mod project;
pub mod wire;

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::client::ApiClient;
use crate::error::ApiError;

pub use params::{add_params, ls_params, Params};
pub use project::file_type;

/// UnixFS operations bound to one client session.
#[derive(Debug, Clone, Copy)]
pub struct UnixfsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UnixfsApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &'a ApiClient {
        self.client
    }
}

/// Run `fut` unless `cancel` fires first.
async fn cancellable<F, T>(cancel: &CancellationToken, fut: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ApiError::Canceled),
        result = fut => result,
    }
}

/// Hand `item` to the consumer, waiting for room in bounded channels.
///
/// A consumer that dropped its receiver has given up, same as a cancel.
async fn deliver<T>(
    sink: &flume::Sender<T>,
    item: T,
    cancel: &CancellationToken,
) -> Result<(), ApiError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ApiError::Canceled),
        sent = sink.send_async(item) => sent.map_err(|_| ApiError::Canceled),
    }
}
