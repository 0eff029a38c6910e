//! Maps wire records to caller-facing values.

use common::prelude::{decode_cid, parse_cid, AddEvent, DirEntry, FileType, ImmutablePath};

use super::wire::{AddRecord, DataType, LsLink};
use crate::error::ApiError;

pub(crate) fn project_add(record: &AddRecord) -> Result<AddEvent, ApiError> {
    let path = if record.hash.is_empty() {
        None
    } else {
        Some(ImmutablePath::from_cid(parse_cid(&record.hash)?))
    };

    Ok(AddEvent {
        name: record.name.clone(),
        path,
        bytes: record.bytes,
        size: record.size.clone(),
    })
}

pub(crate) fn project_link(link: LsLink) -> Result<DirEntry, ApiError> {
    let cid = decode_cid(&link.hash)?;

    Ok(DirEntry {
        name: link.name,
        cid,
        size: link.size,
        file_type: file_type(link.type_code),
        target: link.target,
        mode: link.mode,
        mod_time: link.mod_time,
    })
}

/// Codes without a mapping fall back to [`FileType::Unknown`] silently.
pub fn file_type(code: i32) -> FileType {
    match DataType::from_code(code) {
        Some(DataType::Raw | DataType::File) => FileType::File,
        Some(DataType::HamtShard | DataType::Directory | DataType::Metadata) => {
            FileType::Directory
        }
        Some(DataType::Symlink) => FileType::Symlink,
        None => FileType::Unknown,
    }
}
