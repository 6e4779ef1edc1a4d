use crate::cache::ResolutionCache;
use crate::decode::{self, BytecodeDecoder, ClassDecoder};
use classpool_api::{
    ClassName, InvalidClassFile, ResolutionResult, Resolver, ResolverError, Result,
};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;
use walkdir::WalkDir;

/// Resolves classes from loose `.class` files under a directory such as a
/// build's `classes/` output.
pub struct ClassFilesResolver {
    root: PathBuf,
    label: String,
    files: IndexMap<ClassName, PathBuf>,
    decoder: Arc<dyn ClassDecoder>,
    cache: ResolutionCache,
    released: AtomicBool,
}

impl ClassFilesResolver {
    pub fn new(root: &Path) -> Result<Self> {
        Self::with_decoder(root, Arc::new(BytecodeDecoder))
    }

    pub fn with_decoder(root: &Path, decoder: Arc<dyn ClassDecoder>) -> Result<Self> {
        if !root.is_dir() {
            return Err(ResolverError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let mut files = IndexMap::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(root).to_path_buf();
                ResolverError::io(path, err.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let relative = relative.to_string_lossy().replace('\\', "/");
            if let Some(name) = ClassName::from_entry_path(&relative) {
                files.insert(name, entry.into_path());
            }
        }
        debug!("Indexed {} class files under {}", files.len(), root.display());

        Ok(Self {
            root: root.to_path_buf(),
            label: root.display().to_string(),
            files,
            decoder,
            cache: ResolutionCache::new(),
            released: AtomicBool::new(false),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load(&self, name: &ClassName, path: &Path) -> ResolutionResult {
        match std::fs::read(path) {
            Ok(bytes) => decode::decode_entry(self.decoder.as_ref(), name, bytes),
            Err(err) => ResolutionResult::Invalid(InvalidClassFile::new(
                name.clone(),
                format!("Failed to read {}: {err}", path.display()),
            )),
        }
    }
}

impl Resolver for ClassFilesResolver {
    fn label(&self) -> &str {
        &self.label
    }

    fn resolve(&self, name: &ClassName) -> ResolutionResult {
        let Some(path) = self.files.get(name) else {
            return ResolutionResult::NotFound;
        };
        if self.released.load(Ordering::Acquire) {
            return self.cache.get(name).unwrap_or_else(|| {
                ResolutionResult::Invalid(InvalidClassFile::new(
                    name.clone(),
                    format!("{} has been released", self.label),
                ))
            });
        }
        self.cache.get_or_compute(name, || self.load(name, path))
    }

    fn contains(&self, name: &ClassName) -> bool {
        self.files.contains_key(name)
    }

    fn all_names(&self) -> Box<dyn Iterator<Item = ClassName> + Send + '_> {
        Box::new(self.files.keys().cloned())
    }

    fn release(&self) -> Result<()> {
        self.released.store(true, Ordering::Release);
        Ok(())
    }
}
