//! Streams a file tree as a multipart request body.
//!
//! Every node becomes one part, depth first in name order. Parts are named
//! `file`, carry the node's slash-joined relative path (query-escaped) as the
//! filename, and a content type naming the node kind. Files read from disk
//! also carry their absolute path, whose header depends on the remote version.

use futures::{StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use tokio_util::io::ReaderStream;

use common::files::{Directory, File, FileSource, Node};

use crate::error::ApiError;

const PART_NAME: &str = "file";

const FILE_CONTENT_TYPE: &str = "application/octet-stream";
const DIRECTORY_CONTENT_TYPE: &str = "application/x-directory";
const SYMLINK_CONTENT_TYPE: &str = "application/symlink";

const ABS_PATH_HEADER: &str = "abspath";
const ENCODED_ABS_PATH_HEADER: &str = "abspath-encoded";

pub(crate) fn escape(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

fn join(prefix: &str, name: &str) -> String {
    match (prefix.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{}/{}", prefix, name),
    }
}

/// Build the body for `root`, a directory whose entries are the top-level
/// nodes of the upload.
pub fn form(root: &Directory, legacy_abs_paths: bool) -> Result<Form, ApiError> {
    // filenames are escaped here, reqwest must not encode them again
    let form = Form::new().percent_encode_noop();
    append_directory(form, root, "", legacy_abs_paths)
}

fn append_directory(
    mut form: Form,
    dir: &Directory,
    prefix: &str,
    legacy_abs_paths: bool,
) -> Result<Form, ApiError> {
    for (name, node) in dir.entries() {
        let path = join(prefix, name);
        let part = node_part(node)?
            .file_name(escape(&path))
            .headers(abs_path_headers(node, legacy_abs_paths)?);
        form = form.part(PART_NAME, part);

        if let Node::Directory(child) = node {
            form = append_directory(form, child, &path, legacy_abs_paths)?;
        }
    }
    Ok(form)
}

fn node_part(node: &Node) -> Result<Part, ApiError> {
    let part = match node {
        Node::File(file) => file_part(file).mime_str(FILE_CONTENT_TYPE)?,
        Node::Directory(_) => Part::bytes(Vec::<u8>::new()).mime_str(DIRECTORY_CONTENT_TYPE)?,
        Node::Symlink(link) => Part::text(link.target().to_string()).mime_str(SYMLINK_CONTENT_TYPE)?,
    };
    Ok(part)
}

fn file_part(file: &File) -> Part {
    match file.source() {
        FileSource::Bytes(data) => {
            let len = data.len() as u64;
            Part::stream_with_length(Body::from(data.clone()), len)
        }
        FileSource::Disk(path) => {
            // opened only when the body reaches this part
            let path = path.clone();
            let contents = futures::stream::once(async move { tokio::fs::File::open(path).await })
                .map_ok(ReaderStream::new)
                .try_flatten();
            Part::stream(Body::wrap_stream(contents.boxed()))
        }
    }
}

fn abs_path_headers(node: &Node, legacy_abs_paths: bool) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    // only regular files report where they live
    let Some(abs) = (match node {
        Node::File(file) => file.abs_path(),
        Node::Directory(_) | Node::Symlink(_) => None,
    }) else {
        return Ok(headers);
    };

    let abs = abs.to_string_lossy();
    if legacy_abs_paths {
        headers.insert(
            HeaderName::from_static(ABS_PATH_HEADER),
            HeaderValue::from_bytes(abs.as_bytes())?,
        );
    } else {
        headers.insert(
            HeaderName::from_static(ENCODED_ABS_PATH_HEADER),
            HeaderValue::from_str(&escape(&abs))?,
        );
    }
    Ok(headers)
}
