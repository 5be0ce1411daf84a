use std::sync::Arc;

use super::{ArrayValue, Name, Number, RecordValue, StrValue, Val};

impl From<bool> for Val {
    #[inline]
    fn from(value: bool) -> Self {
        Val::Bool(value)
    }
}

impl From<i64> for Val {
    #[inline]
    fn from(value: i64) -> Self {
        Val::Number(Number::Int(value))
    }
}

impl From<i32> for Val {
    #[inline]
    fn from(value: i32) -> Self {
        Val::Number(Number::Int(value as i64))
    }
}

impl From<u32> for Val {
    #[inline]
    fn from(value: u32) -> Self {
        Val::Number(Number::Int(value as i64))
    }
}

impl From<f64> for Val {
    #[inline]
    fn from(value: f64) -> Self {
        Val::Number(Number::Real(value))
    }
}

impl From<Number> for Val {
    #[inline]
    fn from(value: Number) -> Self {
        Val::Number(value)
    }
}

impl From<&str> for Val {
    #[inline]
    fn from(value: &str) -> Self {
        Val::Str(StrValue::new(value))
    }
}

impl From<String> for Val {
    #[inline]
    fn from(value: String) -> Self {
        Val::Str(StrValue::new(value))
    }
}

impl From<StrValue> for Val {
    #[inline]
    fn from(value: StrValue) -> Self {
        Val::Str(value)
    }
}

impl From<Name> for Val {
    #[inline]
    fn from(value: Name) -> Self {
        Val::Name(value)
    }
}

impl From<ArrayValue> for Val {
    #[inline]
    fn from(value: ArrayValue) -> Self {
        Val::Array(value)
    }
}

impl From<RecordValue> for Val {
    #[inline]
    fn from(value: RecordValue) -> Self {
        Val::Record(value)
    }
}

impl From<Vec<Val>> for Val {
    fn from(values: Vec<Val>) -> Self {
        Val::List(Arc::from(values))
    }
}

impl<T: Into<Val>> From<Option<T>> for Val {
    fn from(value: Option<T>) -> Self {
        value.map_or(Val::Null, Into::into)
    }
}

/// JSON objects become arrays, JSON arrays become sequences keyed `1..n`.
impl From<serde_json::Value> for Val {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match value {
            Json::Null => Val::Null,
            Json::Bool(b) => Val::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Val::int(i),
                None => Val::real(n.as_f64().unwrap_or(0.0)),
            },
            Json::String(s) => Val::from(s),
            Json::Array(items) => Val::Array(ArrayValue::from_sequence(items.into_iter().map(Val::from))),
            Json::Object(map) => Val::Array(map.into_iter().map(|(k, v)| (Name::new(&k), Val::from(v))).collect()),
        }
    }
}
