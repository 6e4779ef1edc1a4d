use super::CompositeResolver;
use crate::archive::{ArchiveOpener, ZipOpener, discover_archives};
use crate::config::PoolConfig;
use crate::decode::{BytecodeDecoder, ClassDecoder};
use crate::jdk;
use classpool_api::{ClassName, DuplicateClass, ResolutionResult, Resolver, ResolverError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Every archive under a directory tree, combined in discovery order.
pub struct PlatformPoolResolver {
    root: PathBuf,
    archives: Vec<PathBuf>,
    inner: CompositeResolver,
}

impl PlatformPoolResolver {
    pub fn new(root: &Path) -> Result<Self> {
        Self::with_config(root, &PoolConfig::default())
    }

    pub fn with_config(root: &Path, config: &PoolConfig) -> Result<Self> {
        Self::with_opener(root, config, &ZipOpener, Arc::new(BytecodeDecoder))
    }

    pub fn with_opener(
        root: &Path,
        config: &PoolConfig,
        opener: &dyn ArchiveOpener,
        decoder: Arc<dyn ClassDecoder>,
    ) -> Result<Self> {
        Self::build(root.display().to_string(), root, config, opener, decoder)
    }

    /// Pool over a JDK home, labelled with the JDK version.
    pub fn jdk(home: &Path) -> Result<Self> {
        Self::build(
            jdk::jdk_label(home),
            home,
            &PoolConfig::default(),
            &ZipOpener,
            Arc::new(BytecodeDecoder),
        )
    }

    fn build(
        label: String,
        root: &Path,
        config: &PoolConfig,
        opener: &dyn ArchiveOpener,
        decoder: Arc<dyn ClassDecoder>,
    ) -> Result<Self> {
        let archives = discover_archives(root, config)?;
        if archives.is_empty() {
            return Err(ResolverError::NoArchives {
                root: root.to_path_buf(),
            });
        }

        let inner = CompositeResolver::open_archives(label, &archives, opener, decoder)?;
        info!(
            "Platform pool {} ready with {} archives",
            inner.label(),
            archives.len()
        );

        Ok(Self {
            root: root.to_path_buf(),
            archives,
            inner,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Archive paths in precedence order.
    pub fn archives(&self) -> &[PathBuf] {
        &self.archives
    }

    pub fn scan_duplicates(&self) {
        self.inner.scan_duplicates();
    }
}

impl Resolver for PlatformPoolResolver {
    fn label(&self) -> &str {
        self.inner.label()
    }

    fn resolve(&self, name: &ClassName) -> ResolutionResult {
        self.inner.resolve(name)
    }

    fn contains(&self, name: &ClassName) -> bool {
        self.inner.contains(name)
    }

    fn all_names(&self) -> Box<dyn Iterator<Item = ClassName> + Send + '_> {
        self.inner.all_names()
    }

    fn release(&self) -> Result<()> {
        self.inner.release()
    }

    fn duplicates(&self) -> Vec<DuplicateClass> {
        self.inner.duplicates()
    }
}
