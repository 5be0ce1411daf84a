use anyhow::Result;
use strand_core::{
    error::NativeError,
    invoke::HandlerSignature,
    module::{ExtensionModule, HandlerTable},
    val::{NoTypes, Val},
};

use crate::{number_arg, number_val};

const DOMAIN: &str = "math";

#[derive(Debug)]
pub struct MathModule {
    handlers: HandlerTable,
}

impl MathModule {
    pub fn new() -> Result<Self> {
        let mut handlers = HandlerTable::new();
        handlers
            .add(
                "clampNumber",
                "(in number, in number, in number) -> number",
                &NoTypes,
                Self::clamp_number,
            )?
            .add(
                "divMod",
                "(in number, in number, out number, out number) -> any",
                &NoTypes,
                Self::div_mod,
            )?
            .add("sumList", "(in list) -> number", &NoTypes, Self::sum_list)?;
        Ok(Self { handlers })
    }

    /// `clampNumber(value, min, max)`
    fn clamp_number(args: &mut [Val]) -> Result<Val, NativeError> {
        let value = number_arg(DOMAIN, args, 0)?;
        let min = number_arg(DOMAIN, args, 1)?;
        let max = number_arg(DOMAIN, args, 2)?;
        if min.is_nan() || max.is_nan() || min > max {
            return Err(NativeError::new(DOMAIN, "clampNumber: min must not exceed max")
                .with_frame("clampNumber", 1, 1));
        }
        Ok(number_val(value.max(min).min(max)))
    }

    /// Floored division: the remainder takes the divisor's sign.
    fn div_mod(args: &mut [Val]) -> Result<Val, NativeError> {
        let dividend = number_arg(DOMAIN, args, 0)?;
        let divisor = number_arg(DOMAIN, args, 1)?;
        if divisor == 0.0 {
            return Err(NativeError::new(DOMAIN, "divMod: division by zero").with_frame("divMod", 1, 1));
        }
        let quotient = (dividend / divisor).floor();
        let remainder = dividend - divisor * quotient;
        args[2] = number_val(quotient);
        args[3] = number_val(remainder);
        Ok(Val::Null)
    }

    fn sum_list(args: &mut [Val]) -> Result<Val, NativeError> {
        let Some(Val::List(items)) = args.first() else {
            return Err(NativeError::new(DOMAIN, "sumList expects a list"));
        };
        let mut total = 0.0;
        for (i, item) in items.iter().enumerate() {
            match item {
                Val::Number(n) => total += n.as_real(),
                other => {
                    return Err(NativeError::new(
                        DOMAIN,
                        format!("sumList: item {} is a {}, not a number", i + 1, other.kind_name()),
                    ));
                }
            }
        }
        Ok(number_val(total))
    }
}

impl ExtensionModule for MathModule {
    fn name(&self) -> &str {
        "math"
    }

    fn description(&self) -> &str {
        "Numeric helpers"
    }

    fn handler_names(&self) -> Vec<&str> {
        self.handlers.names()
    }

    fn signature(&self, handler: &str) -> Option<&HandlerSignature> {
        self.handlers.signature(handler)
    }

    fn call(&mut self, handler: &str, args: &mut [Val]) -> Result<Val, NativeError> {
        self.handlers.call(DOMAIN, handler, args)
    }
}
