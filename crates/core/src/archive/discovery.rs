//! Archive discovery under a directory tree.
//!
//! Traversal is depth-first. Entries of one directory are visited in file-name
//! order so that precedence between archives does not depend on the
//! filesystem's own listing order.

use crate::config::PoolConfig;
use classpool_api::{ResolverError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// All archives under `root` accepted by `config`, in traversal order.
pub fn discover_archives(root: &Path, config: &PoolConfig) -> Result<Vec<PathBuf>> {
    collect_archives(root, config, |_| true)
}

/// Like [`discover_archives`], with an extra caller filter on candidate archives.
pub fn collect_archives(
    root: &Path,
    config: &PoolConfig,
    filter: impl Fn(&Path) -> bool,
) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ResolverError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut walker = WalkDir::new(root)
        .follow_links(config.follow_links)
        .sort_by_file_name();
    if let Some(depth) = config.max_depth {
        walker = walker.max_depth(depth);
    }

    let mut archives = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.loop_ancestor().is_some() => {
                warn!("Skipping symlink cycle at {:?}", err.path().unwrap_or(root));
                continue;
            }
            Err(err) => {
                let path = err.path().unwrap_or(root).to_path_buf();
                return Err(ResolverError::io(path, err.into()));
            }
        };

        let path = entry.path();
        if entry.file_type().is_file() && config.is_archive(path) && filter(path) {
            archives.push(entry.into_path());
        }
    }

    debug!("Discovered {} archives under {}", archives.len(), root.display());
    Ok(archives)
}
