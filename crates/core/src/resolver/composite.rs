use super::ArchiveResolver;
use crate::archive::ArchiveOpener;
use crate::cache::ResolutionCache;
use crate::decode::ClassDecoder;
use crate::ledger::{self, ResourceLedger};
use classpool_api::{
    ClassName, DuplicateClass, ResolutionResult, Resolver, ResolverError, Result,
};
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

#[derive(Default)]
struct DuplicateLog {
    recorded: HashSet<ClassName>,
    entries: Vec<DuplicateClass>,
}

/// Ordered union of resolvers. Earlier children take precedence.
pub struct CompositeResolver {
    label: String,
    children: Vec<Box<dyn Resolver>>,
    cache: ResolutionCache,
    duplicates: Mutex<DuplicateLog>,
    released: AtomicBool,
}

impl CompositeResolver {
    pub fn new(label: impl Into<String>, children: Vec<Box<dyn Resolver>>) -> Result<Self> {
        let label = label.into();
        if children.is_empty() {
            return Err(ResolverError::EmptyComposite { label });
        }
        Ok(Self {
            label,
            children,
            cache: ResolutionCache::new(),
            duplicates: Mutex::new(DuplicateLog::default()),
            released: AtomicBool::new(false),
        })
    }

    /// Open one [`ArchiveResolver`] per path, in order, and combine them.
    ///
    /// All-or-nothing: if any archive fails to open, the ones already opened are
    /// released and the failure is reported against the offending path.
    pub fn open_archives<P: AsRef<Path>>(
        label: impl Into<String>,
        paths: impl IntoIterator<Item = P>,
        opener: &dyn ArchiveOpener,
        decoder: Arc<dyn ClassDecoder>,
    ) -> Result<Self> {
        let label = label.into();
        let mut ledger = ResourceLedger::new(label.clone());

        for path in paths {
            let path = path.as_ref();
            let archive = ArchiveResolver::open_with(path, opener, decoder.clone()).map_err(
                |err| ResolverError::CreateResolver {
                    name: path.display().to_string(),
                    source: Box::new(err),
                },
            )?;
            ledger.acquire(Box::new(archive));
        }

        info!("Opened {} archives for {}", ledger.len(), label);
        Self::new(label, ledger.into_inner())
    }

    pub fn children(&self) -> &[Box<dyn Resolver>] {
        &self.children
    }

    /// Record every shadowed class now, using only the children's indexes.
    pub fn scan_duplicates(&self) {
        for name in self.all_names() {
            if let Some(winner) = self.children.iter().position(|c| c.contains(&name)) {
                self.record_shadowed(&name, winner);
            }
        }
    }

    fn first_match(&self, name: &ClassName) -> (ResolutionResult, Option<usize>) {
        for (index, child) in self.children.iter().enumerate() {
            let result = child.resolve(name);
            if !result.is_not_found() {
                return (result, Some(index));
            }
        }
        (ResolutionResult::NotFound, None)
    }

    fn record_shadowed(&self, name: &ClassName, winner: usize) {
        let shadowed: Vec<String> = self.children[winner + 1..]
            .iter()
            .filter(|child| child.contains(name))
            .map(|child| child.label().to_string())
            .collect();
        if shadowed.is_empty() {
            return;
        }

        let mut log = self.duplicates.lock().unwrap_or_else(PoisonError::into_inner);
        if !log.recorded.insert(name.clone()) {
            return;
        }
        let duplicate = DuplicateClass {
            class_name: name.clone(),
            chosen: self.children[winner].label().to_string(),
            shadowed,
        };
        warn!("Duplicate class in {}: {}", self.label, duplicate);
        log.entries.push(duplicate);
    }
}

impl Resolver for CompositeResolver {
    fn label(&self) -> &str {
        &self.label
    }

    fn resolve(&self, name: &ClassName) -> ResolutionResult {
        if let Some(hit) = self.cache.get(name) {
            return hit;
        }
        if self.released.load(Ordering::Acquire) {
            return self.first_match(name).0;
        }

        self.cache.get_or_compute(name, || {
            let (result, winner) = self.first_match(name);
            if let Some(winner) = winner {
                self.record_shadowed(name, winner);
            }
            result
        })
    }

    fn contains(&self, name: &ClassName) -> bool {
        self.children.iter().any(|child| child.contains(name))
    }

    fn all_names(&self) -> Box<dyn Iterator<Item = ClassName> + Send + '_> {
        let mut seen = HashSet::new();
        Box::new(
            self.children
                .iter()
                .flat_map(|child| child.all_names())
                .filter(move |name| seen.insert(name.clone())),
        )
    }

    fn release(&self) -> Result<()> {
        if self.released.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        ledger::release_all(&self.children)
    }

    fn duplicates(&self) -> Vec<DuplicateClass> {
        let mut all = self
            .duplicates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .clone();
        for child in &self.children {
            all.extend(child.duplicates());
        }
        all
    }
}

impl Drop for CompositeResolver {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!("{}", err);
        }
    }
}
