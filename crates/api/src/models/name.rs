use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

const CLASS_SUFFIX: &str = ".class";
const META_INF: &str = "META-INF/";

/// Fully-qualified binary class name, e.g. `com.example.Outer$Inner`.
///
/// Slash-separated internal names (`com/example/Outer$Inner`) and archive entry
/// paths (`com/example/Outer$Inner.class`) normalize to the same dotted form, so
/// two names compare equal exactly when they denote the same class.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema)]
#[serde(from = "String", into = "String")]
pub struct ClassName(String);

impl ClassName {
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref().trim().trim_start_matches('/');
        let raw = raw.strip_suffix(CLASS_SUFFIX).unwrap_or(raw);
        Self(raw.replace('/', "."))
    }

    /// Name for an archive entry, or `None` when the entry is not a class file.
    ///
    /// Entries under `META-INF/`, including multi-release overlays in
    /// `META-INF/versions/<n>/`, are not classes of the archive's own namespace.
    pub fn from_entry_path(entry: &str) -> Option<Self> {
        let entry = entry.trim_start_matches('/');
        if entry.starts_with(META_INF)
            || entry.ends_with('/')
            || !entry.ends_with(CLASS_SUFFIX)
        {
            return None;
        }
        let stem = &entry[..entry.len() - CLASS_SUFFIX.len()];
        if stem.is_empty() || stem.ends_with('/') {
            return None;
        }
        Some(Self::new(stem))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// JVM internal form: `com/example/Outer$Inner`.
    pub fn internal_name(&self) -> String {
        self.0.replace('.', "/")
    }

    /// Path of the class file inside an archive: `com/example/Outer$Inner.class`.
    pub fn entry_path(&self) -> String {
        let mut path = self.internal_name();
        path.push_str(CLASS_SUFFIX);
        path
    }

    /// Package part of the name, `None` for classes in the default package.
    pub fn package_name(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(package, _)| package)
    }

    pub fn simple_name(&self) -> &str {
        self.0.rsplit_once('.').map_or(self.0.as_str(), |(_, name)| name)
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClassName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClassName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for ClassName {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<ClassName> for String {
    fn from(name: ClassName) -> Self {
        name.0
    }
}
