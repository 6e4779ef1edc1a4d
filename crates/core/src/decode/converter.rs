use classpool_api::ClassKind;
use ristretto_classfile::{
    BaseType, ClassAccessFlags, FieldAccessFlags, FieldType, MethodAccessFlags,
};

pub struct TypeConverter;

impl TypeConverter {
    /// Parses a method descriptor into Java-spelled parameter and return types.
    pub fn convert_method(
        descriptor: &str,
    ) -> Result<(Vec<String>, String), ristretto_classfile::Error> {
        let (params, ret) = FieldType::parse_method_descriptor(descriptor)?;
        let return_type = match ret {
            None => "void".to_string(),
            Some(field_type) => Self::java_name(&field_type),
        };
        let parameters = params.iter().map(Self::java_name).collect();
        Ok((parameters, return_type))
    }

    pub fn java_name(ty: &FieldType) -> String {
        match ty {
            FieldType::Base(base) => Self::base_name(base).to_string(),
            FieldType::Object(name) => name.replace('/', "."),
            FieldType::Array(component) => {
                let mut dimensions = 1usize;
                let mut current = component.as_ref();
                while let FieldType::Array(inner) = current {
                    dimensions += 1;
                    current = inner.as_ref();
                }
                format!("{}{}", Self::java_name(current), "[]".repeat(dimensions))
            }
        }
    }

    /// JVM descriptor spelling, e.g. `[Ljava/lang/String;`.
    pub fn descriptor(ty: &FieldType) -> String {
        match ty {
            FieldType::Base(base) => Self::base_code(base).to_string(),
            FieldType::Object(name) => format!("L{name};"),
            FieldType::Array(component) => format!("[{}", Self::descriptor(component)),
        }
    }

    fn base_name(base: &BaseType) -> &'static str {
        match base {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        }
    }

    fn base_code(base: &BaseType) -> char {
        match base {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
        }
    }
}

pub struct ModifierConverter;

impl ModifierConverter {
    pub fn class_kind(flags: ClassAccessFlags) -> ClassKind {
        if flags.contains(ClassAccessFlags::ANNOTATION) {
            ClassKind::Annotation
        } else if flags.contains(ClassAccessFlags::INTERFACE) {
            ClassKind::Interface
        } else if flags.contains(ClassAccessFlags::ENUM) {
            ClassKind::Enum
        } else {
            ClassKind::Class
        }
    }

    pub fn parse_class(flags: ClassAccessFlags) -> Vec<String> {
        // Interfaces are implicitly abstract
        spell(CLASS_MODIFIERS, |flag| {
            flags.contains(flag)
                && !(flag.contains(ClassAccessFlags::ABSTRACT)
                    && flags.contains(ClassAccessFlags::INTERFACE))
        })
    }

    pub fn parse_field(flags: FieldAccessFlags) -> Vec<String> {
        spell(FIELD_MODIFIERS, |flag| flags.contains(flag))
    }

    pub fn parse_method(flags: MethodAccessFlags) -> Vec<String> {
        spell(METHOD_MODIFIERS, |flag| flags.contains(flag))
    }
}

/// Source-order modifier keywords for each access flag.
const CLASS_MODIFIERS: &[(ClassAccessFlags, &str)] = &[
    (ClassAccessFlags::PUBLIC, "public"),
    (ClassAccessFlags::FINAL, "final"),
    (ClassAccessFlags::ABSTRACT, "abstract"),
];

const FIELD_MODIFIERS: &[(FieldAccessFlags, &str)] = &[
    (FieldAccessFlags::PUBLIC, "public"),
    (FieldAccessFlags::PRIVATE, "private"),
    (FieldAccessFlags::PROTECTED, "protected"),
    (FieldAccessFlags::STATIC, "static"),
    (FieldAccessFlags::FINAL, "final"),
    (FieldAccessFlags::VOLATILE, "volatile"),
    (FieldAccessFlags::TRANSIENT, "transient"),
];

const METHOD_MODIFIERS: &[(MethodAccessFlags, &str)] = &[
    (MethodAccessFlags::PUBLIC, "public"),
    (MethodAccessFlags::PRIVATE, "private"),
    (MethodAccessFlags::PROTECTED, "protected"),
    (MethodAccessFlags::STATIC, "static"),
    (MethodAccessFlags::FINAL, "final"),
    (MethodAccessFlags::SYNCHRONIZED, "synchronized"),
    (MethodAccessFlags::NATIVE, "native"),
    (MethodAccessFlags::ABSTRACT, "abstract"),
    (MethodAccessFlags::VARARGS, "varargs"),
];

fn spell<F: Copy>(table: &[(F, &str)], has: impl Fn(F) -> bool) -> Vec<String> {
    table
        .iter()
        .filter(|(flag, _)| has(*flag))
        .map(|(_, word)| word.to_string())
        .collect()
}
