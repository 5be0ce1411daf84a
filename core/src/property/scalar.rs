//! Conversions between property payloads and evaluation slots.

use crate::{
    error::{RuntimeError, RuntimeResult},
    exec::{Color, ExecContext, ExecValue, ExecValueType, Point, Rectangle},
    val::{ArrayValue, Data, Name, StrValue, Val},
};

/// Sentinel a mixed property fetches as when its targets disagree.
pub const MIXED: &str = "mixed";

/// A payload a getter hands back, ready to become a fetch result.
pub trait IntoExec {
    fn into_exec(self, ctx: &ExecContext) -> RuntimeResult<ExecValue>;
}

/// A payload a setter accepts, produced from an incoming value before the
/// setter runs.
pub trait FromExec: Sized {
    fn from_exec(ctx: &ExecContext, value: ExecValue) -> RuntimeResult<Self>;
}

/// Getter result of a property spanning several targets.
#[derive(Debug, Clone, PartialEq)]
pub struct Mixed<X> {
    pub value: X,
    pub differs: bool,
}

impl<X> Mixed<X> {
    pub fn same(value: X) -> Self {
        Mixed { value, differs: false }
    }

    pub fn differing(value: X) -> Self {
        Mixed { value, differs: true }
    }

    /// Fold the per-target values: the first value, flagged when any other
    /// differs from it.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = X>,
        X: PartialEq,
    {
        let mut iter = values.into_iter();
        let first = iter.next()?;
        let differs = iter.any(|v| v != first);
        Some(Mixed { value: first, differs })
    }
}

/// `u16` restricted to `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Bounded<const MIN: u16, const MAX: u16>(pub u16);

pub(crate) fn convert_real(ctx: &ExecContext, value: ExecValue) -> RuntimeResult<f64> {
    match ctx.convert(value, ExecValueType::Double)? {
        ExecValue::Double(d) if !d.is_nan() => Ok(d),
        ExecValue::Double(_) => Err(RuntimeError::not_a_number()),
        other => Err(unexpected(ExecValueType::Double, &other)),
    }
}

/// Round and range-check an integral property value.
pub(crate) fn integral_in(real: f64, lo: i64, hi: i64) -> RuntimeResult<i64> {
    let rounded = real.round();
    if rounded < lo as f64 || rounded > hi as f64 {
        return Err(RuntimeError::out_of_range(lo, hi));
    }
    Ok(rounded as i64)
}

pub(crate) fn convert_string(ctx: &ExecContext, value: ExecValue) -> RuntimeResult<StrValue> {
    match ctx.convert(value, ExecValueType::StringRef)? {
        ExecValue::StringRef(s) => Ok(s),
        other => Err(unexpected(ExecValueType::StringRef, &other)),
    }
}

fn unexpected(wanted: ExecValueType, got: &ExecValue) -> RuntimeError {
    RuntimeError::Internal(format!(
        "conversion to {} produced {}",
        wanted.name(),
        got.value_type().name()
    ))
}

macro_rules! integral_property {
    ($($ty:ty => $slot:ident),* $(,)?) => {
        $(
            impl IntoExec for $ty {
                #[inline]
                fn into_exec(self, _ctx: &ExecContext) -> RuntimeResult<ExecValue> {
                    Ok(ExecValue::$slot(self.into()))
                }
            }

            impl FromExec for $ty {
                fn from_exec(ctx: &ExecContext, value: ExecValue) -> RuntimeResult<Self> {
                    let real = convert_real(ctx, value)?;
                    let int = integral_in(real, <$ty>::MIN as i64, <$ty>::MAX as i64)?;
                    Ok(int as $ty)
                }
            }
        )*
    };
}

integral_property! {
    i16 => Int,
    i32 => Int,
    u8 => UInt,
    u16 => UInt,
    u32 => UInt,
}

impl<const MIN: u16, const MAX: u16> IntoExec for Bounded<MIN, MAX> {
    #[inline]
    fn into_exec(self, _ctx: &ExecContext) -> RuntimeResult<ExecValue> {
        Ok(ExecValue::UInt(self.0 as u32))
    }
}

impl<const MIN: u16, const MAX: u16> FromExec for Bounded<MIN, MAX> {
    fn from_exec(ctx: &ExecContext, value: ExecValue) -> RuntimeResult<Self> {
        let real = convert_real(ctx, value)?;
        let int = integral_in(real, MIN as i64, MAX as i64)?;
        Ok(Bounded(int as u16))
    }
}

impl IntoExec for f64 {
    #[inline]
    fn into_exec(self, _ctx: &ExecContext) -> RuntimeResult<ExecValue> {
        Ok(ExecValue::Double(self))
    }
}

impl FromExec for f64 {
    fn from_exec(ctx: &ExecContext, value: ExecValue) -> RuntimeResult<Self> {
        convert_real(ctx, value)
    }
}

impl IntoExec for StrValue {
    #[inline]
    fn into_exec(self, _ctx: &ExecContext) -> RuntimeResult<ExecValue> {
        Ok(ExecValue::StringRef(self))
    }
}

impl FromExec for StrValue {
    fn from_exec(ctx: &ExecContext, value: ExecValue) -> RuntimeResult<Self> {
        convert_string(ctx, value)
    }
}

impl IntoExec for String {
    #[inline]
    fn into_exec(self, _ctx: &ExecContext) -> RuntimeResult<ExecValue> {
        Ok(ExecValue::StringRef(StrValue::new(self)))
    }
}

impl FromExec for String {
    fn from_exec(ctx: &ExecContext, value: ExecValue) -> RuntimeResult<Self> {
        Ok(convert_string(ctx, value)?.as_str().to_owned())
    }
}

// Slot-shaped payloads: the fetch result is the payload in its own slot, and a
// store converts the incoming value to that slot.
macro_rules! slot_property {
    ($($ty:ty => $slot:ident),* $(,)?) => {
        $(
            impl IntoExec for $ty {
                #[inline]
                fn into_exec(self, _ctx: &ExecContext) -> RuntimeResult<ExecValue> {
                    Ok(ExecValue::$slot(self))
                }
            }

            impl FromExec for $ty {
                fn from_exec(ctx: &ExecContext, value: ExecValue) -> RuntimeResult<Self> {
                    match ctx.convert(value, ExecValueType::$slot)? {
                        ExecValue::$slot(v) => Ok(v),
                        other => Err(unexpected(ExecValueType::$slot, &other)),
                    }
                }
            }
        )*
    };
}

slot_property! {
    Val => Value,
    bool => Bool,
    char => Char,
    Data => DataRef,
    Name => NameRef,
    ArrayValue => ArrayRef,
    Color => Color,
    Rectangle => Rectangle,
    Point => Point,
}

/// Fixed-size integer tuples (`Int16X2`, `Int32X4`, ...) travel as
/// comma-separated text.
macro_rules! tuple_property {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<const N: usize> IntoExec for [$ty; N] {
                fn into_exec(self, _ctx: &ExecContext) -> RuntimeResult<ExecValue> {
                    let mut out = String::new();
                    let mut buf = itoa::Buffer::new();
                    for (i, v) in self.iter().enumerate() {
                        if i > 0 {
                            out.push(',');
                        }
                        out.push_str(buf.format(*v));
                    }
                    Ok(ExecValue::StringRef(StrValue::new(out)))
                }
            }

            impl<const N: usize> FromExec for [$ty; N] {
                fn from_exec(ctx: &ExecContext, value: ExecValue) -> RuntimeResult<Self> {
                    let text = convert_string(ctx, value)?;
                    let mut out = [0 as $ty; N];
                    let mut parts = text.as_str().split(',');
                    for slot in out.iter_mut() {
                        let part = parts.next().ok_or_else(RuntimeError::not_a_number)?;
                        let real = ctx
                            .string_to_number(&StrValue::new(part))
                            .ok_or_else(RuntimeError::not_a_number)?;
                        *slot = integral_in(real, <$ty>::MIN as i64, <$ty>::MAX as i64)? as $ty;
                    }
                    if parts.next().is_some() {
                        return Err(RuntimeError::CannotConvert { from: "string", to: "integer tuple" });
                    }
                    Ok(out)
                }
            }
        )*
    };
}

tuple_property!(i16, i32, u32);

/// Absent fetches as the empty string; an empty value stores as absent.
impl<X: IntoExec> IntoExec for Option<X> {
    fn into_exec(self, ctx: &ExecContext) -> RuntimeResult<ExecValue> {
        match self {
            Some(x) => x.into_exec(ctx),
            None => Ok(ExecValue::empty()),
        }
    }
}

impl<X: FromExec> FromExec for Option<X> {
    fn from_exec(ctx: &ExecContext, value: ExecValue) -> RuntimeResult<Self> {
        if value.is_empty() {
            return Ok(None);
        }
        X::from_exec(ctx, value).map(Some)
    }
}

impl<X: IntoExec> IntoExec for Mixed<X> {
    fn into_exec(self, ctx: &ExecContext) -> RuntimeResult<ExecValue> {
        if self.differs {
            return Ok(ExecValue::string(MIXED));
        }
        self.value.into_exec(ctx)
    }
}
