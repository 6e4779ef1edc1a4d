use classpool_api::{ResolverError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Controls which files a directory scan treats as archives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Archive extensions, compared case-insensitively.
    pub extensions: Vec<String>,
    /// Follow symbolic links. Link cycles are skipped.
    pub follow_links: bool,
    /// Ignore `-sources.jar` and `-javadoc.jar` archives.
    pub skip_source_archives: bool,
    /// Maximum traversal depth below the root; `None` means unlimited.
    pub max_depth: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["jar".to_string(), "zip".to_string()],
            follow_links: true,
            skip_source_archives: true,
            max_depth: None,
        }
    }
}

impl PoolConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ResolverError::io(path, e))?;
        serde_json::from_str(&content)
            .map_err(|e| ResolverError::Config(format!("{}: {e}", path.display())))
    }

    /// Only the directory itself, no subdirectories.
    pub fn shallow(mut self) -> Self {
        self.max_depth = Some(1);
        self
    }

    pub fn is_archive(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let file_name = file_name.to_lowercase();

        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        if !self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
            return false;
        }

        !(self.skip_source_archives
            && (file_name.ends_with("-sources.jar") || file_name.ends_with("-javadoc.jar")))
    }
}
