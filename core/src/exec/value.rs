use std::fmt;

use crate::val::{ArrayValue, Data, Name, Number, StrValue, Val};

use super::{Color, Point, Rectangle};

/// Tag of an [`ExecValue`] slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecValueType {
    Value,
    BooleanRef,
    StringRef,
    NameRef,
    DataRef,
    ArrayRef,
    NumberRef,
    UInt,
    Int,
    Bool,
    Double,
    Float,
    Char,
    Point,
    Color,
    Rectangle,
}

impl ExecValueType {
    pub fn name(self) -> &'static str {
        match self {
            ExecValueType::Value => "value",
            ExecValueType::BooleanRef => "boolean",
            ExecValueType::StringRef => "string",
            ExecValueType::NameRef => "name",
            ExecValueType::DataRef => "data",
            ExecValueType::ArrayRef => "array",
            ExecValueType::NumberRef => "number",
            ExecValueType::UInt => "unsigned integer",
            ExecValueType::Int => "integer",
            ExecValueType::Bool => "bool",
            ExecValueType::Double => "double",
            ExecValueType::Float => "float",
            ExecValueType::Char => "char",
            ExecValueType::Point => "point",
            ExecValueType::Color => "color",
            ExecValueType::Rectangle => "rectangle",
        }
    }

    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ExecValueType::UInt
                | ExecValueType::Int
                | ExecValueType::Double
                | ExecValueType::Float
                | ExecValueType::NumberRef
        )
    }
}

impl fmt::Display for ExecValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Transient evaluation result.
///
/// Either owns one boxed value (the `*Ref` variants pin its shape, `Value`
/// leaves it open) or holds an unboxed primitive. It is moved into whatever
/// consumes it, so it is released exactly once on every path.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecValue {
    Value(Val),
    BooleanRef(bool),
    StringRef(StrValue),
    NameRef(Name),
    DataRef(Data),
    ArrayRef(ArrayValue),
    NumberRef(Number),
    UInt(u32),
    Int(i32),
    Bool(bool),
    Double(f64),
    Float(f32),
    Char(char),
    Point(Point),
    Color(Color),
    Rectangle(Rectangle),
}

impl ExecValue {
    pub fn value_type(&self) -> ExecValueType {
        match self {
            ExecValue::Value(_) => ExecValueType::Value,
            ExecValue::BooleanRef(_) => ExecValueType::BooleanRef,
            ExecValue::StringRef(_) => ExecValueType::StringRef,
            ExecValue::NameRef(_) => ExecValueType::NameRef,
            ExecValue::DataRef(_) => ExecValueType::DataRef,
            ExecValue::ArrayRef(_) => ExecValueType::ArrayRef,
            ExecValue::NumberRef(_) => ExecValueType::NumberRef,
            ExecValue::UInt(_) => ExecValueType::UInt,
            ExecValue::Int(_) => ExecValueType::Int,
            ExecValue::Bool(_) => ExecValueType::Bool,
            ExecValue::Double(_) => ExecValueType::Double,
            ExecValue::Float(_) => ExecValueType::Float,
            ExecValue::Char(_) => ExecValueType::Char,
            ExecValue::Point(_) => ExecValueType::Point,
            ExecValue::Color(_) => ExecValueType::Color,
            ExecValue::Rectangle(_) => ExecValueType::Rectangle,
        }
    }

    #[inline]
    pub fn string(text: &str) -> Self {
        ExecValue::StringRef(StrValue::new(text))
    }

    #[inline]
    pub fn empty() -> Self {
        ExecValue::StringRef(StrValue::empty())
    }

    /// The empty string or an empty boxed value. Unboxed primitives are never
    /// empty.
    pub fn is_empty(&self) -> bool {
        match self {
            ExecValue::Value(v) => v.is_empty_value(),
            ExecValue::StringRef(s) => s.is_empty(),
            ExecValue::NameRef(n) => n.is_empty(),
            ExecValue::DataRef(d) => d.is_empty(),
            ExecValue::ArrayRef(a) => a.is_empty(),
            _ => false,
        }
    }

    /// Numeric payload of a numeric slot, as a real.
    pub fn numeric(&self) -> Option<f64> {
        match *self {
            ExecValue::UInt(u) => Some(u as f64),
            ExecValue::Int(i) => Some(i as f64),
            ExecValue::Double(d) => Some(d),
            ExecValue::Float(f) => Some(f as f64),
            ExecValue::NumberRef(n) => Some(n.as_real()),
            _ => None,
        }
    }
}

impl From<Val> for ExecValue {
    #[inline]
    fn from(value: Val) -> Self {
        ExecValue::Value(value)
    }
}
