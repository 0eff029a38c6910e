//! Content identifiers and the content paths built from them.
//!
//! Two parsers are exposed on purpose:
//! - [`decode_cid`] accepts exactly one textual CID and nothing else.
//! - [`parse_cid`] additionally accepts a CID embedded in an `/ipfs/` path,
//!   which is how final add results are sometimes reported.
//!
//! Neither substitutes a default for malformed input.

use std::fmt;
use std::str::FromStr;

pub use cid::multibase;
pub use cid::Cid;

const IPFS_NAMESPACE: &str = "ipfs";
const IPNS_NAMESPACE: &str = "ipns";
const IPLD_NAMESPACE: &str = "ipld";

#[derive(Debug, thiserror::Error)]
pub enum CidError {
    #[error("empty content identifier")]
    Empty,
    #[error("invalid content identifier {input:?}: {source}")]
    Invalid {
        input: String,
        #[source]
        source: cid::Error,
    },
}

/// Decode a single textual CID (base58 v0 or any multibase v1).
pub fn decode_cid(text: &str) -> Result<Cid, CidError> {
    if text.is_empty() {
        return Err(CidError::Empty);
    }
    Cid::try_from(text).map_err(|source| CidError::Invalid {
        input: text.to_string(),
        source,
    })
}

/// Parse a CID, tolerating an `/ipfs/` prefix in front of it.
pub fn parse_cid(text: &str) -> Result<Cid, CidError> {
    match text.split_once("/ipfs/") {
        Some((_, rest)) => decode_cid(rest),
        None => decode_cid(text),
    }
}

/// A path permanently bound to one CID: `/ipfs/<cid>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImmutablePath {
    cid: Cid,
}

impl ImmutablePath {
    pub fn from_cid(cid: Cid) -> Self {
        Self { cid }
    }

    pub fn cid(&self) -> &Cid {
        &self.cid
    }
}

impl From<Cid> for ImmutablePath {
    fn from(cid: Cid) -> Self {
        Self::from_cid(cid)
    }
}

impl fmt::Display for ImmutablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", IPFS_NAMESPACE, self.cid)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("path {0:?} does not start with a known namespace (/ipfs/, /ipns/, /ipld/)")]
    UnknownNamespace(String),
    #[error("path {0:?} has no root segment")]
    MissingRoot(String),
    #[error("path root is not a valid content identifier: {0}")]
    InvalidRoot(#[from] CidError),
}

/// A validated content path, e.g. `/ipfs/<cid>/sub/dir` or `/ipns/<name>`.
///
/// Immutable namespaces (`ipfs`, `ipld`) require the root segment to be a CID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    inner: String,
    namespace_len: usize,
}

impl Path {
    pub fn new(text: &str) -> Result<Self, PathError> {
        // a bare CID is shorthand for /ipfs/<cid>
        if !text.starts_with('/') {
            let root = text.split('/').next().unwrap_or_default();
            decode_cid(root)?;
            return Self::new(&format!("/{}/{}", IPFS_NAMESPACE, text));
        }

        let mut segments = text[1..].splitn(3, '/');
        let namespace = segments.next().unwrap_or_default();
        if ![IPFS_NAMESPACE, IPNS_NAMESPACE, IPLD_NAMESPACE].contains(&namespace) {
            return Err(PathError::UnknownNamespace(text.to_string()));
        }
        let root = segments.next().unwrap_or_default();
        if root.is_empty() {
            return Err(PathError::MissingRoot(text.to_string()));
        }
        if namespace != IPNS_NAMESPACE {
            decode_cid(root)?;
        }

        Ok(Self {
            inner: text.to_string(),
            namespace_len: namespace.len(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.inner[1..1 + self.namespace_len]
    }

    /// True when the path cannot change what it points at.
    pub fn is_immutable(&self) -> bool {
        self.namespace() != IPNS_NAMESPACE
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl From<ImmutablePath> for Path {
    fn from(path: ImmutablePath) -> Self {
        Self {
            inner: path.to_string(),
            namespace_len: IPFS_NAMESPACE.len(),
        }
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}
