/**
 * Caller-facing results of add and ls:
 *  progress events, directory entries and
 *  the file type enumeration.
 */
pub mod entry;
/**
 * File trees to be added, either built in
 *  memory or walked from disk.
 */
pub mod files;
/**
 * Multihash function codes and their names.
 */
pub mod hash_fn;
/**
 * Content identifiers and content paths.
 */
pub mod linked_data;
/**
 * Validated options for add and ls.
 */
pub mod options;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::entry::{AddEvent, DirEntry, FileType};
    pub use crate::files::{Directory, File, Node, Symlink};
    pub use crate::linked_data::{
        decode_cid, multibase, parse_cid, Cid, CidError, ImmutablePath, Path, PathError,
    };
    pub use crate::options::{AddOptions, CidVersion, Layout, LsOptions, OptionsError, RawLeaves};
    pub use crate::version::build_info;
}
