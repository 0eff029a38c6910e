//! Caller-facing options for `add` and `ls`.
//!
//! Options are plain values with builder-style setters. [`AddOptions::validate`]
//! applies the same defaulting rules the remote applies, so that a request
//! built from validated options reproduces remote behavior exactly.

use std::fmt;

pub use cid::Version as CidVersion;

use crate::entry::AddEvent;
use crate::hash_fn;

pub const DEFAULT_CHUNKER: &str = "size-262144";
pub const DEFAULT_INLINE_LIMIT: u32 = 32;

/// Whether leaf chunks are stored as bare blocks.
///
/// `Unset` leaves the decision to the remote. It must never be collapsed
/// into `False`: the two produce different DAGs (and CIDs) for CIDv1 adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawLeaves {
    #[default]
    Unset,
    True,
    False,
}

impl RawLeaves {
    pub fn is_set(&self) -> bool {
        !matches!(self, RawLeaves::Unset)
    }

    /// The explicit value, if any.
    pub fn get(&self) -> Option<bool> {
        match self {
            RawLeaves::Unset => None,
            RawLeaves::True => Some(true),
            RawLeaves::False => Some(false),
        }
    }
}

impl From<bool> for RawLeaves {
    fn from(value: bool) -> Self {
        if value {
            RawLeaves::True
        } else {
            RawLeaves::False
        }
    }
}

impl From<Option<bool>> for RawLeaves {
    fn from(value: Option<bool>) -> Self {
        value.map(RawLeaves::from).unwrap_or_default()
    }
}

/// DAG layout used to arrange chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Balanced,
    Trickle,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("unknown multihash function code {0:#x}")]
    UnknownHash(u64),
    #[error("CIDv0 only supports sha2-256")]
    CidV0RequiresSha256,
    #[error("nocopy option requires raw leaves to be enabled as well")]
    NoCopyRequiresRawLeaves,
}

#[derive(Clone)]
pub struct AddOptions {
    /// Multihash function code.
    pub hash: u64,
    pub chunker: String,
    /// `None` lets the hash function decide (v0 for sha2-256, v1 otherwise).
    pub cid_version: Option<CidVersion>,
    pub fs_cache: bool,
    pub inline: bool,
    pub inline_limit: u32,
    pub no_copy: bool,
    pub only_hash: bool,
    pub pin: bool,
    pub silent: bool,
    pub progress: bool,
    pub layout: Layout,
    pub raw_leaves: RawLeaves,
    /// Live event sink, owned by the caller.
    pub events: Option<flume::Sender<AddEvent>>,
}

impl Default for AddOptions {
    fn default() -> Self {
        Self {
            hash: hash_fn::SHA2_256,
            chunker: DEFAULT_CHUNKER.to_string(),
            cid_version: None,
            fs_cache: false,
            inline: false,
            inline_limit: DEFAULT_INLINE_LIMIT,
            no_copy: false,
            only_hash: false,
            pin: false,
            silent: false,
            progress: false,
            layout: Layout::Balanced,
            raw_leaves: RawLeaves::Unset,
            events: None,
        }
    }
}

impl fmt::Debug for AddOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddOptions")
            .field("hash", &self.hash)
            .field("chunker", &self.chunker)
            .field("cid_version", &self.cid_version)
            .field("fs_cache", &self.fs_cache)
            .field("inline", &self.inline)
            .field("inline_limit", &self.inline_limit)
            .field("no_copy", &self.no_copy)
            .field("only_hash", &self.only_hash)
            .field("pin", &self.pin)
            .field("silent", &self.silent)
            .field("progress", &self.progress)
            .field("layout", &self.layout)
            .field("raw_leaves", &self.raw_leaves)
            .field("events", &self.events.is_some())
            .finish()
    }
}

/// Options after the remote's defaulting rules have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAdd {
    pub cid_version: CidVersion,
    /// Raw leaves as the remote will apply them. Only the caller's explicit
    /// choice ([`AddOptions::raw_leaves`]) is ever put on the wire.
    pub raw_leaves: bool,
}

impl AddOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hash(mut self, code: u64) -> Self {
        self.hash = code;
        self
    }

    pub fn chunker(mut self, chunker: impl Into<String>) -> Self {
        self.chunker = chunker.into();
        self
    }

    pub fn cid_version(mut self, version: CidVersion) -> Self {
        self.cid_version = Some(version);
        self
    }

    pub fn fs_cache(mut self, enabled: bool) -> Self {
        self.fs_cache = enabled;
        self
    }

    pub fn inline(mut self, enabled: bool) -> Self {
        self.inline = enabled;
        self
    }

    pub fn inline_limit(mut self, limit: u32) -> Self {
        self.inline_limit = limit;
        self
    }

    pub fn no_copy(mut self, enabled: bool) -> Self {
        self.no_copy = enabled;
        self
    }

    pub fn only_hash(mut self, enabled: bool) -> Self {
        self.only_hash = enabled;
        self
    }

    pub fn pin(mut self, enabled: bool) -> Self {
        self.pin = enabled;
        self
    }

    pub fn silent(mut self, enabled: bool) -> Self {
        self.silent = enabled;
        self
    }

    pub fn progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn raw_leaves(mut self, enabled: bool) -> Self {
        self.raw_leaves = RawLeaves::from(enabled);
        self
    }

    pub fn events(mut self, sink: flume::Sender<AddEvent>) -> Self {
        self.events = Some(sink);
        self
    }

    /// Multihash name for the configured code.
    pub fn hash_name(&self) -> Result<String, OptionsError> {
        hash_fn::name(self.hash)
            .map(|name| name.into_owned())
            .ok_or(OptionsError::UnknownHash(self.hash))
    }

    /// Check option combinations and resolve remote defaults.
    pub fn validate(&self) -> Result<ResolvedAdd, OptionsError> {
        self.hash_name()?;

        let mut raw_leaves = self.raw_leaves.get().unwrap_or(false);
        if self.no_copy && !raw_leaves {
            if self.raw_leaves.is_set() {
                return Err(OptionsError::NoCopyRequiresRawLeaves);
            }
            raw_leaves = true;
        }

        let cid_version = if self.hash != hash_fn::SHA2_256 {
            match self.cid_version {
                Some(CidVersion::V0) => return Err(OptionsError::CidV0RequiresSha256),
                _ => CidVersion::V1,
            }
        } else {
            self.cid_version.unwrap_or(CidVersion::V0)
        };

        if cid_version == CidVersion::V1 && !self.raw_leaves.is_set() {
            raw_leaves = true;
        }

        Ok(ResolvedAdd {
            cid_version,
            raw_leaves,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LsOptions {
    /// Resolve child types and sizes. The remote exposes a single knob for both.
    pub resolve_children: bool,
}

impl Default for LsOptions {
    fn default() -> Self {
        Self {
            resolve_children: true,
        }
    }
}

impl LsOptions {
    pub fn resolve_children(mut self, enabled: bool) -> Self {
        self.resolve_children = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve_to_v0() {
        let resolved = AddOptions::default().validate().unwrap();
        assert_eq!(resolved.cid_version, CidVersion::V0);
        assert!(!resolved.raw_leaves);
    }

    #[test]
    fn test_non_sha256_forces_v1_and_raw_leaves() {
        let resolved = AddOptions::new()
            .hash(hash_fn::BLAKE3)
            .validate()
            .unwrap();
        assert_eq!(resolved.cid_version, CidVersion::V1);
        assert!(resolved.raw_leaves);

        let err = AddOptions::new()
            .hash(hash_fn::BLAKE3)
            .cid_version(CidVersion::V0)
            .validate()
            .unwrap_err();
        assert_eq!(err, OptionsError::CidV0RequiresSha256);
    }

    #[test]
    fn test_explicit_raw_leaves_false_survives_v1() {
        let resolved = AddOptions::new()
            .cid_version(CidVersion::V1)
            .raw_leaves(false)
            .validate()
            .unwrap();
        assert!(!resolved.raw_leaves);
    }

    #[test]
    fn test_nocopy_requires_raw_leaves() {
        let resolved = AddOptions::new().no_copy(true).validate().unwrap();
        assert!(resolved.raw_leaves);

        let err = AddOptions::new()
            .no_copy(true)
            .raw_leaves(false)
            .validate()
            .unwrap_err();
        assert_eq!(err, OptionsError::NoCopyRequiresRawLeaves);
    }

    #[test]
    fn test_unknown_hash_rejected() {
        let err = AddOptions::new().hash(0x9999).validate().unwrap_err();
        assert_eq!(err, OptionsError::UnknownHash(0x9999));
    }

    #[test]
    fn test_raw_leaves_tristate() {
        assert_eq!(RawLeaves::default(), RawLeaves::Unset);
        assert_eq!(RawLeaves::from(None), RawLeaves::Unset);
        assert_eq!(RawLeaves::from(Some(false)), RawLeaves::False);
        assert_eq!(RawLeaves::False.get(), Some(false));
        assert!(RawLeaves::False.is_set());
        assert!(!RawLeaves::Unset.is_set());
    }

    #[test]
    fn test_ls_defaults() {
        assert!(LsOptions::default().resolve_children);
        assert!(!LsOptions::default().resolve_children(false).resolve_children);
    }
}
