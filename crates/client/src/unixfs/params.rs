//! Translates caller options into query parameters.

use cid::Version as CidVersion;
use common::prelude::{AddOptions, Layout, LsOptions};

use crate::error::ApiError;

pub type Params = Vec<(&'static str, String)>;

/// Parameters for `add`, in a fixed order.
///
/// Raw leaves are only sent when the caller chose a value: the remote
/// derives its own default, and sending the resolved value would pin it.
pub fn add_params(options: &AddOptions) -> Result<Params, ApiError> {
    let resolved = options.validate()?;
    let cid_version = match resolved.cid_version {
        CidVersion::V0 => 0,
        CidVersion::V1 => 1,
    };

    let mut params: Params = vec![
        ("hash", options.hash_name()?),
        ("chunker", options.chunker.clone()),
        ("cid-version", cid_version.to_string()),
        ("fscache", options.fs_cache.to_string()),
        ("inline", options.inline.to_string()),
        ("inline-limit", options.inline_limit.to_string()),
        ("nocopy", options.no_copy.to_string()),
        ("only-hash", options.only_hash.to_string()),
        ("pin", options.pin.to_string()),
        ("silent", options.silent.to_string()),
        ("progress", options.progress.to_string()),
    ];

    if let Some(raw_leaves) = options.raw_leaves.get() {
        params.push(("raw-leaves", raw_leaves.to_string()));
    }
    if options.layout == Layout::Trickle {
        params.push(("trickle", "true".to_string()));
    }

    Ok(params)
}

pub fn ls_params(options: &LsOptions) -> Params {
    vec![
        ("resolve-type", options.resolve_children.to_string()),
        ("size", options.resolve_children.to_string()),
        ("stream", "true".to_string()),
    ]
}
