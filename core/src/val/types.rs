use std::{fmt, sync::Arc};

use super::{ForeignType, RecordType};

/// Declared type of an extension handler parameter, return value or record
/// field.
#[derive(Debug, Clone)]
pub enum TypeInfo {
    Any,
    Boolean,
    Number,
    String,
    Data,
    Array,
    ProperList,
    Record(Arc<RecordType>),
    Foreign(Arc<ForeignType>),
    Optional(Box<TypeInfo>),
}

/// Resolves record and foreign type names that appear in signature text.
pub trait TypeResolver {
    fn resolve_type(&self, name: &str) -> Option<TypeInfo>;
}

/// Resolver that knows no named types.
pub struct NoTypes;

impl TypeResolver for NoTypes {
    fn resolve_type(&self, _name: &str) -> Option<TypeInfo> {
        None
    }
}

impl TypeInfo {
    pub fn optional(inner: TypeInfo) -> Self {
        match inner {
            TypeInfo::Optional(_) => inner,
            other => TypeInfo::Optional(Box::new(other)),
        }
    }

    /// Strip an optional wrapper, reporting whether there was one.
    pub fn resolve(&self) -> (&TypeInfo, bool) {
        match self {
            TypeInfo::Optional(inner) => (inner.as_ref(), true),
            other => (other, false),
        }
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        matches!(self, TypeInfo::Optional(_))
    }

    /// Parse a type name: `any`, `boolean`, `number`, `string`, `data`,
    /// `array`, `list`, `optional <T>`, or a name known to `resolver`.
    pub fn parse(text: &str, resolver: &dyn TypeResolver) -> Option<TypeInfo> {
        let text = text.trim();
        if let Some(rest) = strip_keyword(text, "optional") {
            return TypeInfo::parse(rest, resolver).map(TypeInfo::optional);
        }
        let ty = match text.to_ascii_lowercase().as_str() {
            "any" => TypeInfo::Any,
            "boolean" | "bool" => TypeInfo::Boolean,
            "number" => TypeInfo::Number,
            "string" => TypeInfo::String,
            "data" => TypeInfo::Data,
            "array" => TypeInfo::Array,
            "list" => TypeInfo::ProperList,
            "" => return None,
            _ => return resolver.resolve_type(text),
        };
        Some(ty)
    }
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let head = text.get(..keyword.len())?;
    let rest = &text[keyword.len()..];
    if head.eq_ignore_ascii_case(keyword) && rest.starts_with(|c: char| c.is_whitespace()) {
        Some(rest)
    } else {
        None
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        use TypeInfo::*;
        match (self, other) {
            (Any, Any)
            | (Boolean, Boolean)
            | (Number, Number)
            | (String, String)
            | (Data, Data)
            | (Array, Array)
            | (ProperList, ProperList) => true,
            (Record(a), Record(b)) => Arc::ptr_eq(a, b),
            (Foreign(a), Foreign(b)) => Arc::ptr_eq(a, b),
            (Optional(a), Optional(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeInfo::Any => f.write_str("any"),
            TypeInfo::Boolean => f.write_str("boolean"),
            TypeInfo::Number => f.write_str("number"),
            TypeInfo::String => f.write_str("string"),
            TypeInfo::Data => f.write_str("data"),
            TypeInfo::Array => f.write_str("array"),
            TypeInfo::ProperList => f.write_str("list"),
            TypeInfo::Record(ty) => write!(f, "{}", ty.name()),
            TypeInfo::Foreign(ty) => f.write_str(ty.name()),
            TypeInfo::Optional(inner) => write!(f, "optional {}", inner),
        }
    }
}
