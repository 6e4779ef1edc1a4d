//! Per-resolver memoization of resolution results.
//!
//! Each class name maps to its own once-cell. The map shard lock is held only
//! long enough to fetch or insert the cell, so lookups of different names never
//! wait on each other's decoding, while callers racing on the same name block
//! on the cell until the single computation finishes.

use classpool_api::{ClassName, ResolutionResult};
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::sync::Arc;

#[derive(Default)]
pub struct ResolutionCache {
    cells: DashMap<ClassName, Arc<OnceCell<ResolutionResult>>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached result for `name`, running `compute` if this is the first request.
    ///
    /// `compute` runs at most once per name for the lifetime of the cache.
    pub fn get_or_compute<F>(&self, name: &ClassName, compute: F) -> ResolutionResult
    where
        F: FnOnce() -> ResolutionResult,
    {
        self.cell(name).get_or_init(compute).clone()
    }

    /// Like [`get_or_compute`](Self::get_or_compute), but an `Err` from
    /// `compute` is handed back to the caller and leaves `name` uncached, so a
    /// later request computes again.
    pub fn get_or_try_compute<F, E>(
        &self,
        name: &ClassName,
        compute: F,
    ) -> Result<ResolutionResult, E>
    where
        F: FnOnce() -> Result<ResolutionResult, E>,
    {
        self.cell(name).get_or_try_init(compute).cloned()
    }

    fn cell(&self, name: &ClassName) -> Arc<OnceCell<ResolutionResult>> {
        match self.cells.get(name) {
            Some(cell) => Arc::clone(&cell),
            None => Arc::clone(&self.cells.entry(name.clone()).or_default()),
        }
    }

    /// Cached result without computing anything.
    pub fn get(&self, name: &ClassName) -> Option<ResolutionResult> {
        self.cells.get(name).and_then(|cell| cell.get().cloned())
    }

    /// Number of names with a completed result.
    pub fn len(&self) -> usize {
        self.cells
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
