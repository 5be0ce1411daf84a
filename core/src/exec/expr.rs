use crate::{
    error::{RuntimeError, RuntimeResult},
    val::{ArrayValue, Data, Name, StrValue, Val},
};

use super::{Color, ExecContext, ExecValue, ExecValueType, Point, Rectangle};

/// An evaluable node supplied by the parser layer.
pub trait Expression {
    fn evaluate(&self, ctx: &mut ExecContext) -> RuntimeResult<ExecValue>;
}

/// A constant expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal(pub ExecValue);

impl Literal {
    pub fn new(value: impl Into<Val>) -> Self {
        Literal(ExecValue::Value(value.into()))
    }
}

impl Expression for Literal {
    fn evaluate(&self, _ctx: &mut ExecContext) -> RuntimeResult<ExecValue> {
        Ok(self.0.clone())
    }
}

macro_rules! eval_as {
    ($( $(#[$meta:meta])* $fn_name:ident => $variant:ident : $ty:ty ),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $fn_name(&mut self, expr: &dyn Expression) -> RuntimeResult<$ty> {
                match self.eval_expr_as(expr, ExecValueType::$variant)? {
                    ExecValue::$variant(v) => Ok(v),
                    other => Err(RuntimeError::Internal(format!(
                        "conversion to {} produced {}",
                        ExecValueType::$variant.name(),
                        other.value_type().name()
                    ))),
                }
            }
        )*
    };
}

impl ExecContext {
    /// Evaluate inside one level of nesting.
    pub fn eval_expr(&mut self, expr: &dyn Expression) -> RuntimeResult<ExecValue> {
        let _guard = self.enter()?;
        expr.evaluate(self)
    }

    /// Evaluate then convert in one step.
    pub fn eval_expr_as(&mut self, expr: &dyn Expression, to: ExecValueType) -> RuntimeResult<ExecValue> {
        let value = self.eval_expr(expr)?;
        self.convert(value, to)
    }

    eval_as! {
        eval_expr_as_bool => Bool: bool,
        eval_expr_as_int => Int: i32,
        eval_expr_as_uint => UInt: u32,
        eval_expr_as_double => Double: f64,
        eval_expr_as_string => StringRef: StrValue,
        eval_expr_as_name => NameRef: Name,
        eval_expr_as_data => DataRef: Data,
        /// Lax: non-array values that stringify become an empty array.
        eval_expr_as_array => ArrayRef: ArrayValue,
        eval_expr_as_point => Point: Point,
        eval_expr_as_color => Color: Color,
        eval_expr_as_rectangle => Rectangle: Rectangle,
        eval_expr_as_value => Value: Val,
    }
}
