use tokio_util::sync::CancellationToken;

use common::prelude::{parse_cid, AddOptions, ImmutablePath, Node};

use super::params::add_params;
use super::project::project_add;
use super::wire::AddRecord;
use super::{cancellable, deliver, UnixfsApi};
use crate::error::ApiError;
use crate::multipart;
use crate::request::Request;
use crate::stream::JsonLines;
use crate::version::uses_legacy_abs_paths;

impl UnixfsApi<'_> {
    /// Add a file tree and return the path of its root.
    ///
    /// Every record the remote streams back is projected onto
    /// `options.events`, if set, in arrival order. The last record names the
    /// root. Nothing is retried and a failure discards all progress.
    pub async fn add(
        &self,
        node: Node,
        options: AddOptions,
        cancel: &CancellationToken,
    ) -> Result<ImmutablePath, ApiError> {
        let params = add_params(&options)?;

        let version = cancellable(cancel, self.client.remote_version()).await?;
        let legacy_abs_paths = uses_legacy_abs_paths(&version);

        let root = node.wrap_root();
        let body = multipart::form(&root, legacy_abs_paths)?;
        let request = Request::new("add").options(params).body(body);

        let response = cancellable(cancel, self.client.send(request)).await?;
        let mut records: JsonLines<_, AddRecord> =
            JsonLines::new(Box::pin(response.bytes_stream()));

        let mut last: Option<AddRecord> = None;
        let mut count = 0usize;
        while let Some(record) = cancellable(cancel, records.next_record()).await? {
            count += 1;
            if let Some(sink) = &options.events {
                deliver(sink, project_add(&record)?, cancel).await?;
            }
            last = Some(record);
        }

        let hash = last.map(|record| record.hash).unwrap_or_default();
        let root = parse_cid(&hash).map_err(|e| {
            tracing::warn!(records = count, "add finished without a usable root: {}", e);
            e
        })?;

        tracing::debug!(records = count, root = %root, "add complete");
        Ok(ImmutablePath::from_cid(root))
    }
}
