//! Archive container layer.
//!
//! An [`ArchiveContainer`] is an open handle to one archive's entries. Resolvers
//! own exactly one container each and close it exactly once. Containers are
//! produced by an [`ArchiveOpener`]; the default opener reads zip/jar files.

use classpool_api::Result;
use std::path::Path;

pub mod discovery;
mod jar;

pub use discovery::{collect_archives, discover_archives};
pub use jar::{ZipContainer, ZipOpener};

pub trait ArchiveContainer: Send + Sync {
    /// File the container was opened from.
    fn path(&self) -> &Path;

    /// Names of all file entries, in archive order.
    fn entry_names(&self) -> std::io::Result<Vec<String>>;

    /// Raw bytes of one entry.
    fn read_entry(&self, entry: &str) -> std::io::Result<Vec<u8>>;

    /// Close the handle. Reads after this fail.
    fn close(&self) -> std::io::Result<()>;
}

pub trait ArchiveOpener: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn ArchiveContainer>>;
}
