//! The resolver capability shared by every class source.
//!
//! A resolver answers "does class X exist, and what does it look like" against
//! one or more archives. Archive-backed, directory-backed and composite
//! resolvers all implement the same trait, so they nest freely behind
//! `Box<dyn Resolver>`.

use crate::error::Result;
use crate::models::{ClassName, DuplicateClass, ResolutionResult};
use std::collections::BTreeSet;

pub trait Resolver: Send + Sync {
    /// Human-readable origin (archive path, directory, JDK label). Diagnostics only.
    fn label(&self) -> &str;

    /// Look a class up. Never fails: broken entries come back as
    /// [`ResolutionResult::Invalid`], missing ones as [`ResolutionResult::NotFound`].
    fn resolve(&self, name: &ClassName) -> ResolutionResult;

    /// Whether an entry for `name` exists, without decoding it.
    fn contains(&self, name: &ClassName) -> bool;

    /// Every class name this resolver can answer for.
    ///
    /// Each call starts a fresh iteration; names are yielded lazily and once.
    fn all_names(&self) -> Box<dyn Iterator<Item = ClassName> + Send + '_>;

    /// Close underlying handles. Idempotent: calls after the first are no-ops.
    fn release(&self) -> Result<()>;

    /// Shadowed class definitions recorded so far. Only unions record any.
    fn duplicates(&self) -> Vec<DuplicateClass> {
        Vec::new()
    }

    /// Packages of all known classes, skipping the default package.
    fn package_names(&self) -> BTreeSet<String> {
        self.all_names()
            .filter_map(|name| name.package_name().map(str::to_string))
            .collect()
    }

    /// Resolve every known class in [`Resolver::all_names`] order.
    ///
    /// Stops as soon as `visitor` returns `false`. Returns `true` when every
    /// class was visited.
    fn process_all_classes(
        &self,
        visitor: &mut dyn FnMut(&ClassName, ResolutionResult) -> bool,
    ) -> bool {
        for name in self.all_names() {
            let result = self.resolve(&name);
            if !visitor(&name, result) {
                return false;
            }
        }
        true
    }
}
