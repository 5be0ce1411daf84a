//! The script value model.
//!
//! [`Val`] is the boxed, reference-counted runtime value. Scalars are cheap to
//! clone; containers share their storage and copy it on the first write through
//! an aliased handle.

use std::{fmt, sync::Arc};

use crate::error::NativeError;

mod array;
mod convert;
mod foreign;
mod name;
mod number;
mod record;
mod string;
mod types;


pub use array::ArrayValue;
pub use foreign::{ExportFn, ForeignPayload, ForeignType, ForeignValue, ImportFn};
pub use name::Name;
pub use number::{
    Number, format_integer, format_real, i32_to_u32, parse_number, parse_number_bytes, real_to_f32, real_to_i32,
    real_to_u32, u32_to_i32,
};
pub use record::{RecordField, RecordType, RecordValue};
pub use string::StrValue;
pub use types::{NoTypes, TypeInfo, TypeResolver};

/// Raw bytes; each byte is one native character.
pub type Data = Arc<[u8]>;

/// Reference to a script handler. Opaque to the conversion engine.
#[derive(Debug, PartialEq, Eq)]
pub struct HandlerRef {
    pub name: Name,
}

/// Host-defined opaque value.
#[derive(Debug)]
pub struct CustomValue {
    pub tag: String,
}

#[derive(Debug, Clone, Default)]
pub enum Val {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    Str(StrValue),
    Name(Name),
    Data(Data),
    Array(ArrayValue),
    List(Arc<[Val]>),
    Record(RecordValue),
    Foreign(ForeignValue),
    Handler(Arc<HandlerRef>),
    Error(Arc<NativeError>),
    Custom(Arc<CustomValue>),
}

impl Val {
    pub const TRUE: Val = Val::Bool(true);
    pub const FALSE: Val = Val::Bool(false);

    #[inline]
    pub fn int(value: i64) -> Val {
        Val::Number(Number::Int(value))
    }

    #[inline]
    pub fn real(value: f64) -> Val {
        Val::Number(Number::Real(value))
    }

    #[inline]
    pub fn str(text: &str) -> Val {
        Val::Str(StrValue::new(text))
    }

    #[inline]
    pub fn name(text: &str) -> Val {
        Val::Name(Name::new(text))
    }

    #[inline]
    pub fn data(bytes: &[u8]) -> Val {
        Val::Data(Arc::from(bytes))
    }

    pub fn list(values: Vec<Val>) -> Val {
        Val::List(Arc::from(values))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Val::Null => "null",
            Val::Bool(_) => "boolean",
            Val::Number(_) => "number",
            Val::Str(_) => "string",
            Val::Name(_) => "name",
            Val::Data(_) => "data",
            Val::Array(_) => "array",
            Val::List(_) => "list",
            Val::Record(_) => "record",
            Val::Foreign(_) => "foreign",
            Val::Handler(_) => "handler",
            Val::Error(_) => "error",
            Val::Custom(_) => "custom",
        }
    }

    /// Null, the empty string, the empty name, empty data and the empty array.
    pub fn is_empty_value(&self) -> bool {
        match self {
            Val::Null => true,
            Val::Str(s) => s.is_empty(),
            Val::Name(n) => n.is_empty(),
            Val::Data(d) => d.is_empty(),
            Val::Array(a) => a.is_empty(),
            _ => false,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Val::Null)
    }

    /// Borrow the text of a string or name.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Val::Str(s) => Some(s.as_str()),
            Val::Name(n) => Some(n.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Val::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Val::Array(a) => Some(a),
            _ => None,
        }
    }
}

impl PartialEq for Val {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Val::Null, Val::Null) => true,
            (Val::Bool(a), Val::Bool(b)) => a == b,
            (Val::Number(a), Val::Number(b)) => a == b,
            (Val::Str(a), Val::Str(b)) => a == b,
            (Val::Name(a), Val::Name(b)) => a == b,
            (Val::Data(a), Val::Data(b)) => a == b,
            (Val::Array(a), Val::Array(b)) => a == b,
            (Val::List(a), Val::List(b)) => a == b,
            (Val::Record(a), Val::Record(b)) => a == b,
            (Val::Foreign(a), Val::Foreign(b)) => a == b,
            (Val::Handler(a), Val::Handler(b)) => Arc::ptr_eq(a, b),
            (Val::Error(a), Val::Error(b)) => Arc::ptr_eq(a, b),
            (Val::Custom(a), Val::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Val::Null => f.write_str("null"),
            Val::Bool(b) => write!(f, "{}", b),
            Val::Number(n) => write!(f, "{}", n),
            Val::Str(s) => f.write_str(s.as_str()),
            Val::Name(n) => f.write_str(n.as_str()),
            Val::Data(d) => write!(f, "<data {} bytes>", d.len()),
            Val::Array(a) => {
                // Keys are unordered; sort them so the rendering is stable.
                let mut entries: Vec<_> = a.iter().collect();
                entries.sort_by(|(x, _), (y, _)| match (x.as_index(), y.as_index()) {
                    (Some(i), Some(j)) => i.cmp(&j),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => x.as_str().cmp(y.as_str()),
                });
                f.write_str("{")?;
                for (i, (key, value)) in entries.into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
            Val::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Val::Record(r) => {
                write!(f, "{} {{", r.record_type().name())?;
                for (i, (field, value)) in r.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {}: {}", field, value)?;
                }
                f.write_str(" }")
            }
            Val::Foreign(v) => write!(f, "{:?}", v),
            Val::Handler(h) => write!(f, "<handler {}>", h.name),
            Val::Error(e) => write!(f, "<error {}>", e),
            Val::Custom(c) => write!(f, "<custom {}>", c.tag),
        }
    }
}
