use super::name::ClassName;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Module,
}

/// A declared method, keyed by name and JVM descriptor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct MethodSignature {
    pub name: String,
    /// Raw JVM descriptor, e.g. `(Ljava/lang/String;I)V`.
    pub descriptor: String,
    pub modifiers: Vec<String>,
    /// Parameter types in Java source spelling (`java.lang.String`, `int[]`).
    pub parameter_types: Vec<String>,
    pub return_type: String,
}

impl MethodSignature {
    pub fn is_constructor(&self) -> bool {
        self.name == "<init>"
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.iter().any(|m| m == "static")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct FieldSignature {
    pub name: String,
    pub descriptor: String,
    pub modifiers: Vec<String>,
    pub type_name: String,
}

/// Structured view of one decoded class file.
///
/// Produced once per archive entry and shared behind an `Arc`; nothing mutates
/// it after decoding.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct ClassDefinition {
    pub name: ClassName,
    pub kind: ClassKind,
    pub modifiers: Vec<String>,
    /// `None` for `java.lang.Object` and module descriptors.
    pub super_name: Option<ClassName>,
    pub interfaces: Vec<ClassName>,
    pub methods: Vec<MethodSignature>,
    pub fields: Vec<FieldSignature>,
}

impl ClassDefinition {
    /// Empty public class extending `java.lang.Object`.
    pub fn new(name: impl Into<ClassName>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Class,
            modifiers: vec!["public".to_string()],
            super_name: Some(ClassName::new("java.lang.Object")),
            interfaces: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, ClassKind::Interface | ClassKind::Annotation)
    }

    pub fn method(&self, name: &str, descriptor: &str) -> Option<&MethodSignature> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.descriptor == descriptor)
    }

    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodSignature> {
        self.methods.iter().filter(move |m| m.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSignature> {
        self.fields.iter().find(|f| f.name == name)
    }
}
