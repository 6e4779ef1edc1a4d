use super::class::ClassDefinition;
use super::name::ClassName;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A class entry that exists but could not be turned into a [`ClassDefinition`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct InvalidClassFile {
    pub class_name: ClassName,
    pub message: String,
}

impl InvalidClassFile {
    pub fn new(class_name: ClassName, message: impl Into<String>) -> Self {
        Self {
            class_name,
            message: message.into(),
        }
    }
}

impl fmt::Display for InvalidClassFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid class file {}: {}", self.class_name, self.message)
    }
}

impl std::error::Error for InvalidClassFile {}

/// Outcome of looking a class name up in a resolver.
#[derive(Debug, Clone)]
pub enum ResolutionResult {
    Found(Arc<ClassDefinition>),
    NotFound,
    Invalid(InvalidClassFile),
}

impl ResolutionResult {
    pub fn is_found(&self) -> bool {
        matches!(self, ResolutionResult::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolutionResult::NotFound)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ResolutionResult::Invalid(_))
    }

    pub fn definition(&self) -> Option<&Arc<ClassDefinition>> {
        match self {
            ResolutionResult::Found(class) => Some(class),
            _ => None,
        }
    }

    pub fn into_definition(self) -> Option<Arc<ClassDefinition>> {
        match self {
            ResolutionResult::Found(class) => Some(class),
            _ => None,
        }
    }
}

impl PartialEq for ResolutionResult {
    /// `Found` values compare by identity first, so two results served from the
    /// same cache entry are equal without a deep comparison.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ResolutionResult::Found(a), ResolutionResult::Found(b)) => Arc::ptr_eq(a, b) || a == b,
            (ResolutionResult::NotFound, ResolutionResult::NotFound) => true,
            (ResolutionResult::Invalid(a), ResolutionResult::Invalid(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ResolutionResult {}

/// A class name provided by more than one child of a composite resolver.
///
/// Only `chosen` is ever returned by resolution; the rest are shadowed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct DuplicateClass {
    pub class_name: ClassName,
    pub chosen: String,
    pub shadowed: Vec<String>,
}

impl fmt::Display for DuplicateClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} from {} shadows {}",
            self.class_name,
            self.chosen,
            self.shadowed.join(", ")
        )
    }
}
