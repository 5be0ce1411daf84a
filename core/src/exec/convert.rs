//! Universal ExecValue conversion.
//!
//! Same-tag conversions move the payload, numeric pairs narrow directly,
//! strings and names parse straight to numbers, and everything else pivots
//! through a boxed [`Val`].

use tracing::trace;

use crate::{
    error::{RuntimeError, RuntimeResult},
    val::{Number, StrValue, Val, i32_to_u32, parse_number, real_to_f32, real_to_i32, real_to_u32, u32_to_i32},
};

use super::{Color, ExecContext, ExecValue, ExecValueType, Point, Rectangle};

impl ExecContext {
    /// Convert `from` into a slot tagged `to`. The source is consumed on every
    /// path.
    pub fn convert(&self, from: ExecValue, to: ExecValueType) -> RuntimeResult<ExecValue> {
        let from_type = from.value_type();
        if from_type == to {
            return Ok(from);
        }

        if to.is_numeric() {
            if from_type.is_numeric() {
                return Ok(narrow(from, to));
            }
            if let Some(parsed) = self.parse_textual(&from) {
                return match parsed {
                    Some(real) => Ok(narrow(ExecValue::Double(real), to)),
                    None => Err(RuntimeError::not_a_number()),
                };
            }
        }

        trace!(target: "strand::exec", from = from_type.name(), to = to.name(), "pivot conversion");
        let from_kind = match &from {
            ExecValue::Value(v) => v.kind_name(),
            other => other.value_type().name(),
        };
        let boxed = self.box_value(from);
        self.unbox(boxed, to).map_err(|err| match err {
            RuntimeError::CannotConvert { to, .. } => RuntimeError::CannotConvert { from: from_kind, to },
            other => other,
        })
    }

    // `Some(result)` when `from` holds text; `None` when it does not.
    fn parse_textual(&self, from: &ExecValue) -> Option<Option<f64>> {
        match from {
            ExecValue::StringRef(s) | ExecValue::Value(Val::Str(s)) => Some(self.string_to_number(s)),
            ExecValue::NameRef(n) | ExecValue::Value(Val::Name(n)) => {
                Some(parse_number(n.as_str(), self.convert_octals()))
            }
            _ => None,
        }
    }

    /// Box a slot into its canonical script value.
    pub fn box_value(&self, from: ExecValue) -> Val {
        match from {
            ExecValue::Value(v) => v,
            ExecValue::BooleanRef(b) | ExecValue::Bool(b) => Val::Bool(b),
            ExecValue::StringRef(s) => Val::Str(s),
            ExecValue::NameRef(n) => Val::Name(n),
            ExecValue::DataRef(d) => Val::Data(d),
            ExecValue::ArrayRef(a) => Val::Array(a),
            ExecValue::NumberRef(n) => Val::Number(n),
            ExecValue::UInt(u) => Val::int(u as i64),
            ExecValue::Int(i) => Val::int(i as i64),
            ExecValue::Double(d) => Val::real(d),
            ExecValue::Float(f) => Val::real(f as f64),
            ExecValue::Char(c) => Val::Str(StrValue::new(c.to_string())),
            ExecValue::Point(p) => Val::Str(StrValue::new(p.to_string())),
            ExecValue::Color(c) => Val::Str(StrValue::new(c.to_string())),
            ExecValue::Rectangle(r) => Val::Str(StrValue::new(r.to_string())),
        }
    }

    /// Unbox a script value into a slot tagged `to`.
    pub fn unbox(&self, value: Val, to: ExecValueType) -> RuntimeResult<ExecValue> {
        let fail = |value: &Val| RuntimeError::CannotConvert {
            from: value.kind_name(),
            to: to.name(),
        };
        let out = match to {
            ExecValueType::Value => ExecValue::Value(value),
            ExecValueType::BooleanRef => ExecValue::BooleanRef(self.convert_to_bool(&value).ok_or_else(|| fail(&value))?),
            ExecValueType::Bool => ExecValue::Bool(self.convert_to_bool(&value).ok_or_else(|| fail(&value))?),
            ExecValueType::StringRef => ExecValue::StringRef(self.convert_to_string(&value).ok_or_else(|| fail(&value))?),
            ExecValueType::NameRef => ExecValue::NameRef(self.convert_to_name(&value).ok_or_else(|| fail(&value))?),
            ExecValueType::DataRef => ExecValue::DataRef(self.convert_to_data(&value).ok_or_else(|| fail(&value))?),
            ExecValueType::ArrayRef => {
                ExecValue::ArrayRef(self.convert_to_array(&value, false).ok_or_else(|| fail(&value))?)
            }
            ExecValueType::NumberRef => match value {
                Val::Number(n) => ExecValue::NumberRef(n),
                other => {
                    let real = self.convert_to_number(&other).ok_or_else(RuntimeError::not_a_number)?;
                    ExecValue::NumberRef(Number::Real(real))
                }
            },
            ExecValueType::UInt | ExecValueType::Int | ExecValueType::Double | ExecValueType::Float => {
                let real = self.convert_to_number(&value).ok_or_else(RuntimeError::not_a_number)?;
                narrow(ExecValue::Double(real), to)
            }
            ExecValueType::Char => ExecValue::Char(self.convert_to_char(&value).ok_or_else(|| fail(&value))?),
            ExecValueType::Point => {
                ExecValue::Point(self.parse_shape(&value, Point::parse).ok_or_else(|| fail(&value))?)
            }
            ExecValueType::Color => {
                ExecValue::Color(self.parse_shape(&value, Color::parse).ok_or_else(|| fail(&value))?)
            }
            ExecValueType::Rectangle => {
                ExecValue::Rectangle(self.parse_shape(&value, Rectangle::parse).ok_or_else(|| fail(&value))?)
            }
        };
        Ok(out)
    }

    fn parse_shape<S>(&self, value: &Val, parse: fn(&str) -> Option<S>) -> Option<S> {
        let text = self.convert_to_string(value)?;
        parse(text.as_str())
    }
}

/// Numeric to numeric conversion without boxing. `from` must be numeric.
fn narrow(from: ExecValue, to: ExecValueType) -> ExecValue {
    match (from, to) {
        (ExecValue::Int(i), ExecValueType::UInt) => ExecValue::UInt(i32_to_u32(i)),
        (ExecValue::UInt(u), ExecValueType::Int) => ExecValue::Int(u32_to_i32(u)),
        (ExecValue::Int(i), ExecValueType::NumberRef) => ExecValue::NumberRef(Number::Int(i as i64)),
        (ExecValue::UInt(u), ExecValueType::NumberRef) => ExecValue::NumberRef(Number::Int(u as i64)),
        (from, to) => {
            let real = from.numeric().unwrap_or(0.0);
            match to {
                ExecValueType::UInt => ExecValue::UInt(real_to_u32(real)),
                ExecValueType::Int => ExecValue::Int(real_to_i32(real)),
                ExecValueType::Float => ExecValue::Float(real_to_f32(real)),
                ExecValueType::NumberRef => ExecValue::NumberRef(Number::Real(real)),
                _ => ExecValue::Double(real),
            }
        }
    }
}
