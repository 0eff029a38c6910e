//! Records as the remote streams them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::ApiError;

/// UnixFS data types as numbered on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Raw = 0,
    Directory = 1,
    File = 2,
    Metadata = 3,
    Symlink = 4,
    HamtShard = 5,
}

impl DataType {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(DataType::Raw),
            1 => Some(DataType::Directory),
            2 => Some(DataType::File),
            3 => Some(DataType::Metadata),
            4 => Some(DataType::Symlink),
            5 => Some(DataType::HamtShard),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "Raw" => Some(DataType::Raw),
            "Directory" => Some(DataType::Directory),
            "File" => Some(DataType::File),
            "Metadata" => Some(DataType::Metadata),
            "Symlink" => Some(DataType::Symlink),
            "HAMTShard" => Some(DataType::HamtShard),
            _ => None,
        }
    }
}

/// One progress or result record of an add.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct AddRecord {
    pub name: String,
    pub hash: String,
    pub bytes: i64,
    pub size: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LsLink {
    pub name: String,
    pub hash: String,
    pub size: u64,
    #[serde(rename = "Type", deserialize_with = "type_code")]
    pub type_code: i32,
    pub target: String,
    pub mode: u32,
    pub mod_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LsObject {
    pub hash: String,
    pub links: Vec<LsLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LsOutput {
    pub objects: Vec<LsObject>,
}

impl LsOutput {
    /// The single link a streamed listing record must carry.
    ///
    /// Anything but exactly one object holding exactly one link means the
    /// stream can no longer be trusted.
    pub fn into_single_link(self) -> Result<LsLink, ApiError> {
        let [object] = <[LsObject; 1]>::try_from(self.objects).map_err(|objects| {
            ApiError::Protocol(format!("unexpected Objects len: {}", objects.len()))
        })?;
        let [link] = <[LsLink; 1]>::try_from(object.links).map_err(|links| {
            ApiError::Protocol(format!("unexpected Links len: {}", links.len()))
        })?;
        Ok(link)
    }
}

// Type codes normally arrive as numbers; names are accepted as well.
// Unknown names map to -1, which no data type uses.
fn type_code<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Number(i32),
        Name(String),
    }

    Ok(match Code::deserialize(deserializer)? {
        Code::Number(code) => code,
        Code::Name(name) => DataType::from_name(&name).map(|t| t as i32).unwrap_or(-1),
    })
}
