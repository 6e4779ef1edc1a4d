//! Resolver implementations.
//!
//! - [`ArchiveResolver`]: one jar
//! - [`ClassFilesResolver`]: a directory of loose class files
//! - [`CompositeResolver`]: ordered union of other resolvers
//! - [`PlatformPoolResolver`]: every archive under a directory tree

mod archive;
mod classes_dir;
mod composite;
mod platform;

pub use archive::ArchiveResolver;
pub use classes_dir::ClassFilesResolver;
pub use composite::CompositeResolver;
pub use platform::PlatformPoolResolver;

use crate::archive::ZipOpener;
use crate::decode::BytecodeDecoder;
use classpool_api::Result;
use std::path::Path;
use std::sync::Arc;

/// Open every path as a jar and combine them in the given order.
pub fn make_resolver<P: AsRef<Path>>(
    label: impl Into<String>,
    paths: impl IntoIterator<Item = P>,
) -> Result<CompositeResolver> {
    CompositeResolver::open_archives(label, paths, &ZipOpener, Arc::new(BytecodeDecoder))
}
