use tokio_util::sync::CancellationToken;

use common::prelude::{DirEntry, LsOptions, Path};

use super::params::ls_params;
use super::project::project_link;
use super::wire::LsOutput;
use super::{cancellable, deliver, UnixfsApi};
use crate::error::ApiError;
use crate::request::Request;
use crate::stream::JsonLines;

impl UnixfsApi<'_> {
    /// Stream the entries of the directory at `path` into `out`.
    ///
    /// `out` is dropped when this returns, whatever the outcome, which
    /// closes the channel for the consumer.
    pub async fn ls(
        &self,
        path: &Path,
        out: flume::Sender<DirEntry>,
        options: LsOptions,
        cancel: &CancellationToken,
    ) -> Result<(), ApiError> {
        let request = Request::new("ls")
            .arg(path.as_str())
            .options(ls_params(&options));

        let response = cancellable(cancel, self.client.send(request)).await?;
        let mut records: JsonLines<_, LsOutput> =
            JsonLines::new(Box::pin(response.bytes_stream()));

        let mut count = 0usize;
        while let Some(record) = cancellable(cancel, records.next_record()).await? {
            let entry = project_link(record.into_single_link()?)?;
            deliver(&out, entry, cancel).await?;
            count += 1;
        }

        tracing::debug!(path = %path, entries = count, "ls complete");
        Ok(())
    }
}
