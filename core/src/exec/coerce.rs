//! The value conversion family. Every conversion is pure and reports failure
//! as `None`; callers decide which error to raise.

use tracing::trace;

use crate::val::{
    ArrayValue, Data, Name, Number, StrValue, Val, format_integer, format_real, parse_number, parse_number_bytes,
};

use super::ExecContext;

impl ExecContext {
    pub fn convert_to_string(&self, value: &Val) -> Option<StrValue> {
        let out = match value {
            Val::Null | Val::Array(_) => StrValue::empty(),
            Val::Bool(true) => StrValue::new("true"),
            Val::Bool(false) => StrValue::new("false"),
            Val::Name(name) => StrValue::new(name.as_str()),
            Val::Str(s) => s.clone(),
            Val::Data(bytes) => StrValue::new(decode_native(bytes)),
            Val::Number(Number::Int(i)) => StrValue::with_number(format_integer(*i), *i as f64),
            Val::Number(Number::Real(r)) => StrValue::new(format_real(*r, self.number_format())),
            Val::List(_)
            | Val::Record(_)
            | Val::Foreign(_)
            | Val::Handler(_)
            | Val::Error(_)
            | Val::Custom(_) => return None,
        };
        Some(out)
    }

    pub fn convert_to_number(&self, value: &Val) -> Option<f64> {
        match value {
            Val::Null => Some(0.0),
            Val::Number(n) => Some(n.as_real()),
            Val::Str(s) => self.string_to_number(s),
            Val::Name(name) => parse_number(name.as_str(), self.convert_octals()),
            Val::Data(bytes) => parse_number_bytes(bytes, self.convert_octals()),
            _ => None,
        }
    }

    /// Parse a string as a number, consulting and filling its numeric cache.
    pub fn string_to_number(&self, text: &StrValue) -> Option<f64> {
        if let Some(cached) = text.cached_number() {
            return Some(cached);
        }
        let parsed = parse_number(text.as_str(), self.convert_octals())?;
        trace!(target: "strand::exec", text = text.as_str(), parsed, "memoizing numeric value");
        text.remember_number(parsed);
        Some(parsed)
    }

    pub fn convert_to_bool(&self, value: &Val) -> Option<bool> {
        match value {
            Val::Bool(b) => Some(*b),
            Val::Str(s) => parse_bool(s.as_str()),
            Val::Name(name) => parse_bool(name.as_str()),
            Val::Data(bytes) => parse_bool(&decode_native(bytes)),
            _ => None,
        }
    }

    /// Convert to an array. In lax mode anything that stringifies becomes an
    /// empty array; strict mode accepts only arrays and empty values.
    pub fn convert_to_array(&self, value: &Val, strict: bool) -> Option<ArrayValue> {
        if let Val::Array(array) = value {
            return Some(array.clone());
        }
        if strict {
            return value.is_empty_value().then(ArrayValue::new);
        }
        self.convert_to_string(value).map(|_| ArrayValue::new())
    }

    pub fn convert_to_data(&self, value: &Val) -> Option<Data> {
        if let Val::Data(bytes) = value {
            return Some(bytes.clone());
        }
        let text = self.convert_to_string(value)?;
        Some(encode_native(text.as_str()))
    }

    pub fn convert_to_name(&self, value: &Val) -> Option<Name> {
        match value {
            Val::Name(name) => Some(name.clone()),
            Val::Str(s) => Some(Name::new(s.as_str())),
            Val::Number(Number::Int(i)) => Some(Name::new(itoa::Buffer::new().format(*i))),
            other => self.convert_to_string(other).map(|s| Name::new(s.as_str())),
        }
    }

    pub fn convert_to_char(&self, value: &Val) -> Option<char> {
        let text = self.convert_to_string(value)?;
        let mut chars = text.as_str().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Bytes to text, one character per byte.
pub fn decode_native(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Text to bytes, one byte per character. Characters above U+00FF become `?`.
pub fn encode_native(text: &str) -> Data {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
