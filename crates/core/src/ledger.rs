//! Bookkeeping for resolvers acquired while a resolver tree is being built.
//!
//! A [`ResourceLedger`] lives for one construction attempt. Every resolver
//! opened along the way is recorded; if construction bails out early, dropping
//! the ledger releases them all. On success, [`ResourceLedger::into_inner`]
//! hands them to their new owner and disarms the ledger.

use classpool_api::{Resolver, Result};
use tracing::warn;

pub struct ResourceLedger {
    label: String,
    acquired: Vec<Box<dyn Resolver>>,
    armed: bool,
}

impl ResourceLedger {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            acquired: Vec::new(),
            armed: true,
        }
    }

    pub fn acquire(&mut self, resolver: Box<dyn Resolver>) {
        self.acquired.push(resolver);
    }

    pub fn len(&self) -> usize {
        self.acquired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acquired.is_empty()
    }

    /// Take ownership of everything acquired; nothing is released afterwards.
    pub fn into_inner(mut self) -> Vec<Box<dyn Resolver>> {
        self.armed = false;
        std::mem::take(&mut self.acquired)
    }
}

impl Drop for ResourceLedger {
    fn drop(&mut self) {
        if !self.armed || self.acquired.is_empty() {
            return;
        }
        warn!(
            "Construction of {} did not complete, releasing {} acquired resolvers",
            self.label,
            self.acquired.len()
        );
        // Reverse acquisition order
        let _ = release_all(self.acquired.iter().rev());
    }
}

/// Release every resolver, continuing past failures. Returns the first error.
pub fn release_all<'a>(resolvers: impl IntoIterator<Item = &'a Box<dyn Resolver>>) -> Result<()> {
    let mut first_error = None;
    for resolver in resolvers {
        if let Err(err) = resolver.release() {
            warn!("Failed to release {}: {}", resolver.label(), err);
            first_error.get_or_insert(err);
        }
    }
    first_error.map_or(Ok(()), Err)
}
