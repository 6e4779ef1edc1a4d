use crate::archive::{ArchiveContainer, ArchiveOpener, ZipOpener};
use crate::cache::ResolutionCache;
use crate::decode::{self, BytecodeDecoder, ClassDecoder};
use classpool_api::{
    ClassName, InvalidClassFile, ResolutionResult, Resolver, ResolverError, Result,
};
use indexmap::IndexMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Resolves classes from a single archive (one jar).
///
/// The entry directory is indexed once at open; class bytes are read and
/// decoded on first request and memoized afterwards.
pub struct ArchiveResolver {
    label: String,
    container: Box<dyn ArchiveContainer>,
    /// Class name -> entry path, in archive order.
    entries: IndexMap<ClassName, String>,
    decoder: Arc<dyn ClassDecoder>,
    cache: ResolutionCache,
    released: AtomicBool,
}

impl ArchiveResolver {
    /// Open a jar with the default zip reader and bytecode decoder.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with(path, &ZipOpener, Arc::new(BytecodeDecoder))
    }

    pub fn open_with(
        path: &Path,
        opener: &dyn ArchiveOpener,
        decoder: Arc<dyn ClassDecoder>,
    ) -> Result<Self> {
        let container = opener.open(path)?;
        Self::from_container(container, decoder)
    }

    /// Takes ownership of an open container. If indexing fails the container is
    /// closed before the error is returned.
    pub fn from_container(
        container: Box<dyn ArchiveContainer>,
        decoder: Arc<dyn ClassDecoder>,
    ) -> Result<Self> {
        let path = container.path().to_path_buf();
        let names = match container.entry_names() {
            Ok(names) => names,
            Err(err) => {
                if let Err(close_err) = container.close() {
                    warn!("Failed to close {}: {}", path.display(), close_err);
                }
                return Err(ResolverError::io(path, err));
            }
        };

        let mut entries = IndexMap::new();
        for entry in names {
            if let Some(name) = ClassName::from_entry_path(&entry) {
                entries.entry(name).or_insert(entry);
            }
        }
        debug!("Indexed {} classes in {}", entries.len(), path.display());

        Ok(Self {
            label: path.display().to_string(),
            container,
            entries,
            decoder,
            cache: ResolutionCache::new(),
            released: AtomicBool::new(false),
        })
    }

    pub fn path(&self) -> &Path {
        self.container.path()
    }

    pub fn class_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    fn released_result(&self, name: &ClassName) -> ResolutionResult {
        ResolutionResult::Invalid(InvalidClassFile::new(
            name.clone(),
            format!("{} has been released", self.label),
        ))
    }

    /// Reads and decodes one entry. A read that fails because the archive was
    /// released mid-lookup comes back as `Err`, which the cache does not keep.
    fn load(
        &self,
        name: &ClassName,
        entry: &str,
    ) -> std::result::Result<ResolutionResult, ResolutionResult> {
        let bytes = match self.container.read_entry(entry) {
            Ok(bytes) => bytes,
            Err(_) if self.is_released() => return Err(self.released_result(name)),
            Err(err) => {
                return Ok(ResolutionResult::Invalid(InvalidClassFile::new(
                    name.clone(),
                    format!("Failed to read {entry} from {}: {err}", self.label),
                )));
            }
        };

        let result = decode::decode_entry(self.decoder.as_ref(), name, bytes);
        if let ResolutionResult::Invalid(invalid) = &result {
            debug!("{}", invalid);
        }
        Ok(result)
    }
}

impl Resolver for ArchiveResolver {
    fn label(&self) -> &str {
        &self.label
    }

    fn resolve(&self, name: &ClassName) -> ResolutionResult {
        let Some(entry) = self.entries.get(name) else {
            return ResolutionResult::NotFound;
        };

        if self.is_released() {
            // Not cached: the entry exists, it just can no longer be read
            return self
                .cache
                .get(name)
                .unwrap_or_else(|| self.released_result(name));
        }

        self.cache
            .get_or_try_compute(name, || self.load(name, entry))
            .unwrap_or_else(|uncached| uncached)
    }

    fn contains(&self, name: &ClassName) -> bool {
        self.entries.contains_key(name)
    }

    fn all_names(&self) -> Box<dyn Iterator<Item = ClassName> + Send + '_> {
        Box::new(self.entries.keys().cloned())
    }

    fn release(&self) -> Result<()> {
        if self.released.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.container.close().map_err(|e| ResolverError::Release {
            label: self.label.clone(),
            message: e.to_string(),
        })
    }
}

impl Drop for ArchiveResolver {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!("{}", err);
        }
    }
}
