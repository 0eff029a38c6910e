use std::fmt;

use chrono::{DateTime, Utc};
use cid::Cid;

use crate::linked_data::ImmutablePath;

/// Progress or result of an add, as seen by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddEvent {
    pub name: String,
    /// Set once the remote has computed the item's CID.
    pub path: Option<ImmutablePath>,
    /// Bytes processed so far (progress events).
    pub bytes: i64,
    /// Human readable size, as reported by the remote.
    pub size: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FileType {
    /// The remote reported a type this client does not know.
    #[default]
    Unknown,
    File,
    Directory,
    Symlink,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileType::Unknown => "unknown",
            FileType::File => "file",
            FileType::Directory => "dir",
            FileType::Symlink => "symlink",
        };
        f.pad(s)
    }
}

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub cid: Cid,
    pub size: u64,
    pub file_type: FileType,
    /// Symlink target, empty for anything but symlinks.
    pub target: String,
    pub mode: u32,
    pub mod_time: Option<DateTime<Utc>>,
}
