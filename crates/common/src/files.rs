//! Hierarchical file trees handed to `add`.
//!
//! A [`Node`] is either a leaf byte stream, a named collection of children,
//! or a symlink. File contents are never buffered by the tree itself:
//! on-disk files are only opened when the request body is streamed.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;

#[derive(Debug, Clone)]
pub enum Node {
    File(File),
    Directory(Directory),
    Symlink(Symlink),
}

#[derive(Debug, Clone)]
pub enum FileSource {
    Bytes(Bytes),
    Disk(PathBuf),
}

#[derive(Debug, Clone)]
pub struct File {
    source: FileSource,
    abs_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct Directory {
    entries: BTreeMap<String, Node>,
    abs_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Symlink {
    target: String,
    abs_path: Option<PathBuf>,
}

fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

impl File {
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self {
            source: FileSource::Bytes(data.into()),
            abs_path: None,
        }
    }

    /// A file whose contents are read from disk when the body is streamed.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let abs = absolute(path.as_ref())?;
        Ok(Self {
            source: FileSource::Disk(abs.clone()),
            abs_path: Some(abs),
        })
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    pub fn abs_path(&self) -> Option<&Path> {
        self.abs_path.as_deref()
    }
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, node: Node) -> Option<Node> {
        self.entries.insert(name.into(), node)
    }

    pub fn with(mut self, name: impl Into<String>, node: impl Into<Node>) -> Self {
        self.insert(name, node.into());
        self
    }

    /// Children in name order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn abs_path(&self) -> Option<&Path> {
        self.abs_path.as_deref()
    }
}

impl Symlink {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            abs_path: None,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn abs_path(&self) -> Option<&Path> {
        self.abs_path.as_deref()
    }
}

impl From<File> for Node {
    fn from(file: File) -> Self {
        Node::File(file)
    }
}

impl From<Directory> for Node {
    fn from(dir: Directory) -> Self {
        Node::Directory(dir)
    }
}

impl From<Symlink> for Node {
    fn from(link: Symlink) -> Self {
        Node::Symlink(link)
    }
}

impl Node {
    /// Build a tree from the filesystem. Symlinks are kept as links, never
    /// followed. Entries whose name starts with `.` are skipped unless
    /// `include_hidden` is set; the root itself is always included.
    pub fn from_path(path: impl AsRef<Path>, include_hidden: bool) -> io::Result<Self> {
        let abs = absolute(path.as_ref())?;
        Self::walk(abs, include_hidden)
    }

    fn walk(abs: PathBuf, include_hidden: bool) -> io::Result<Self> {
        let meta = fs::symlink_metadata(&abs)?;
        let file_type = meta.file_type();

        if file_type.is_symlink() {
            let target = fs::read_link(&abs)?;
            return Ok(Node::Symlink(Symlink {
                target: target.to_string_lossy().into_owned(),
                abs_path: Some(abs),
            }));
        }

        if file_type.is_dir() {
            let mut dir = Directory {
                entries: BTreeMap::new(),
                abs_path: Some(abs.clone()),
            };
            for entry in fs::read_dir(&abs)? {
                let entry = entry?;
                let name = entry.file_name().to_string_lossy().into_owned();
                if !include_hidden && is_hidden(&name) {
                    tracing::trace!("skipping hidden entry {}", entry.path().display());
                    continue;
                }
                let child = Self::walk(entry.path(), include_hidden)?;
                dir.entries.insert(name, child);
            }
            return Ok(Node::Directory(dir));
        }

        if file_type.is_file() {
            return Ok(Node::File(File {
                source: FileSource::Disk(abs.clone()),
                abs_path: Some(abs),
            }));
        }

        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("unsupported file type at {}", abs.display()),
        ))
    }

    /// Wrap this node as the single, anonymous entry of a synthetic root
    /// directory. The remote strips that root again, so a lone file and a
    /// whole tree travel with the same shape.
    pub fn wrap_root(self) -> Directory {
        Directory::new().with("", self)
    }

    pub fn abs_path(&self) -> Option<&Path> {
        match self {
            Node::File(file) => file.abs_path(),
            Node::Directory(dir) => dir.abs_path(),
            Node::Symlink(link) => link.abs_path(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory(_))
    }
}
