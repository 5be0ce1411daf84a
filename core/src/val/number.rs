use std::fmt;

use crate::config::NumberFormat;

/// Values closer to zero than this format as `0` rather than `-0`.
const FORMAT_EPSILON: f64 = 1e-9;

/// Script number: stored as an integer when it came from one, exposed
/// uniformly as a real.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Real(f64),
}

impl Number {
    #[inline]
    pub fn as_real(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Real(r) => r,
        }
    }

    #[inline]
    pub fn is_integer(self) -> bool {
        matches!(self, Number::Int(_))
    }

    /// Integral value if the number is an integer, or a real with no fraction
    /// that fits in an `i64`.
    pub fn as_exact_int(self) -> Option<i64> {
        match self {
            Number::Int(i) => Some(i),
            Number::Real(r) if r.fract() == 0.0 && r >= i64::MIN as f64 && r <= i64::MAX as f64 => Some(r as i64),
            Number::Real(_) => None,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            _ => self.as_real() == other.as_real(),
        }
    }
}

impl From<i64> for Number {
    #[inline]
    fn from(i: i64) -> Self {
        Number::Int(i)
    }
}

impl From<f64> for Number {
    #[inline]
    fn from(r: f64) -> Self {
        Number::Real(r)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => f.write_str(itoa::Buffer::new().format(*i)),
            Number::Real(r) if r.is_finite() => f.write_str(ryu::Buffer::new().format_finite(*r)),
            Number::Real(r) => write!(f, "{}", r),
        }
    }
}

// Narrowing follows round-half-away-from-zero and saturates at the bounds of
// the target; NaN narrows to zero.

#[inline]
pub fn real_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let rounded = value.round();
    if rounded <= i32::MIN as f64 {
        i32::MIN
    } else if rounded >= i32::MAX as f64 {
        i32::MAX
    } else {
        rounded as i32
    }
}

#[inline]
pub fn real_to_u32(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    let rounded = value.round();
    if rounded >= u32::MAX as f64 { u32::MAX } else { rounded as u32 }
}

#[inline]
pub fn real_to_f32(value: f64) -> f32 {
    value as f32
}

#[inline]
pub fn i32_to_u32(value: i32) -> u32 {
    if value < 0 { 0 } else { value as u32 }
}

#[inline]
pub fn u32_to_i32(value: u32) -> i32 {
    if value > i32::MAX as u32 { i32::MAX } else { value as i32 }
}

/// Render an integer the way integer-valued numbers are stringified.
#[inline]
pub fn format_integer(value: i64) -> String {
    itoa::Buffer::new().format(value).to_owned()
}

/// Render a real using the caller's number format.
pub fn format_real(value: f64, format: NumberFormat) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_owned()
        } else if value > 0.0 {
            "inf".to_owned()
        } else {
            "-inf".to_owned()
        };
    }
    let value = if value < 0.0 && value >= -FORMAT_EPSILON { 0.0 } else { value };
    let width = format.width as usize;
    let trailing = format.trailing as usize;
    let mut out = format!("{:0width$.trailing$}", value, width = width, trailing = trailing);
    strip_trailing_zeros(&mut out, trailing, format.force as usize);

    // A rounded negative fraction may come out as "-0" or "-0.00".
    if let Some(rest) = out.strip_prefix('-')
        && rest.bytes().all(|b| b == b'0' || b == b'.')
    {
        out.remove(0);
    }
    out
}

fn strip_trailing_zeros(text: &mut String, trailing: usize, force: usize) {
    if trailing == 0 {
        return;
    }
    let Some(dot) = text.find('.') else {
        return;
    };
    let keep_until = dot + force;
    while text.len() > keep_until + 1 && text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
}

/// Parse script text as a number.
///
/// Surrounding whitespace is ignored. `0x` introduces a hexadecimal integer;
/// with `octals` a leading zero introduces an octal integer. Anything else must
/// be a complete decimal real.
pub fn parse_number(text: &str, octals: bool) -> Option<f64> {
    let trimmed = text.trim_matches(|c: char| c.is_ascii_whitespace());
    if trimmed.is_empty() {
        return None;
    }
    let (negative, digits) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    if digits.is_empty() {
        return None;
    }
    let sign = if negative { -1.0 } else { 1.0 };

    if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        return u64::from_str_radix(hex, 16).ok().map(|v| sign * v as f64);
    }

    if octals && digits.len() > 1 && digits.starts_with('0') && digits.bytes().all(|b| b.is_ascii_digit()) {
        return u64::from_str_radix(&digits[1..], 8).ok().map(|v| sign * v as f64);
    }

    if !is_decimal_literal(digits) {
        return None;
    }
    digits.parse::<f64>().ok().map(|v| sign * v)
}

/// Parse raw bytes as a number; each byte is one native character.
pub fn parse_number_bytes(bytes: &[u8], octals: bool) -> Option<f64> {
    if bytes.is_ascii() {
        // ASCII bytes are valid UTF-8 and map one-to-one onto characters.
        std::str::from_utf8(bytes).ok().and_then(|text| parse_number(text, octals))
    } else {
        None
    }
}

// digits [ '.' digits ] [ ('e'|'E') [sign] digits ], with at least one digit
// in the mantissa.
fn is_decimal_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    let mut mantissa_digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        mantissa_digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return false;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == bytes.len()
}
