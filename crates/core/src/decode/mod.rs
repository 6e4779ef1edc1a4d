//! Class-file decoding.
//!
//! Resolvers never parse bytecode themselves; they hand raw entry bytes to a
//! [`ClassDecoder`]. The default [`BytecodeDecoder`] is backed by
//! `ristretto_classfile`.

use classpool_api::{
    ClassDefinition, ClassKind, ClassName, FieldSignature, InvalidClassFile, MethodSignature,
    ResolutionResult,
};
use ristretto_classfile::{ClassFile, ConstantPool};
use std::io::Cursor;
use std::sync::Arc;

mod converter;
pub use converter::{ModifierConverter, TypeConverter};

pub trait ClassDecoder: Send + Sync {
    /// Decode the bytes of the entry registered under `name`.
    fn decode(&self, name: &ClassName, bytes: Vec<u8>) -> Result<ClassDefinition, InvalidClassFile>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BytecodeDecoder;

impl BytecodeDecoder {
    fn parse(bytes: Vec<u8>) -> Result<ClassDefinition, ristretto_classfile::Error> {
        let class = ClassFile::from_bytes(&mut Cursor::new(bytes))?;
        let pool = &class.constant_pool;

        let name = ClassName::new(class.class_name()?);
        let super_name = match class.super_class {
            0 => None,
            index => Some(class_ref(pool, index)?),
        };
        let interfaces = class
            .interfaces
            .iter()
            .map(|&index| class_ref(pool, index))
            .collect::<Result<Vec<_>, _>>()?;

        let mut fields = Vec::with_capacity(class.fields.len());
        for field in &class.fields {
            fields.push(FieldSignature {
                name: pool.try_get_utf8(field.name_index)?.to_string(),
                descriptor: TypeConverter::descriptor(&field.field_type),
                modifiers: ModifierConverter::parse_field(field.access_flags),
                type_name: TypeConverter::java_name(&field.field_type),
            });
        }

        let mut methods = Vec::with_capacity(class.methods.len());
        for method in &class.methods {
            let descriptor = pool.try_get_utf8(method.descriptor_index)?;
            let (parameter_types, return_type) = TypeConverter::convert_method(descriptor)?;
            methods.push(MethodSignature {
                name: pool.try_get_utf8(method.name_index)?.to_string(),
                descriptor: descriptor.to_string(),
                modifiers: ModifierConverter::parse_method(method.access_flags),
                parameter_types,
                return_type,
            });
        }

        let kind = if name.simple_name() == "module-info" {
            ClassKind::Module
        } else {
            ModifierConverter::class_kind(class.access_flags)
        };

        Ok(ClassDefinition {
            name,
            kind,
            modifiers: ModifierConverter::parse_class(class.access_flags),
            super_name,
            interfaces,
            methods,
            fields,
        })
    }
}

impl ClassDecoder for BytecodeDecoder {
    fn decode(
        &self,
        name: &ClassName,
        bytes: Vec<u8>,
    ) -> Result<ClassDefinition, InvalidClassFile> {
        Self::parse(bytes).map_err(|e| {
            InvalidClassFile::new(name.clone(), format!("Failed to parse class: {e:?}"))
        })
    }
}

fn class_ref(pool: &ConstantPool, index: u16) -> Result<ClassName, ristretto_classfile::Error> {
    Ok(ClassName::new(pool.try_get_class(index)?))
}

/// Decode the entry registered under `name` into a resolution result.
///
/// The class must declare the name it is registered under; a jar entry
/// `com/x/A.class` holding `com.x.B` is invalid rather than a definition of
/// `com.x.A`.
pub fn decode_entry(
    decoder: &dyn ClassDecoder,
    name: &ClassName,
    bytes: Vec<u8>,
) -> ResolutionResult {
    match decoder.decode(name, bytes) {
        Ok(class) if class.name == *name => ResolutionResult::Found(Arc::new(class)),
        Ok(class) => ResolutionResult::Invalid(InvalidClassFile::new(
            name.clone(),
            format!("entry declares class {}", class.name),
        )),
        Err(invalid) => ResolutionResult::Invalid(invalid),
    }
}
