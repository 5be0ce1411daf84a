pub mod failing;
pub mod geometry;
pub mod math;
pub mod text;
pub mod widget;

#[cfg(test)]
mod text_test;

use anyhow::{Context, Result};
use strand_core::{
    error::NativeError,
    module::ModuleRegistry,
    val::{Number, Val},
};

/// Register all stdlib modules with the given registry
pub fn register_stdlib_modules(registry: &mut ModuleRegistry) -> Result<()> {
    registry
        .add_module("stdlib:math", Box::new(math::MathModule::new()?))
        .context("registering math")?;
    registry
        .add_module("stdlib:text", Box::new(text::TextModule::new()?))
        .context("registering text")?;
    registry
        .add_module("stdlib:geometry", Box::new(geometry::GeometryModule::new()?))
        .context("registering geometry")?;
    registry
        .add_module("stdlib:failing", Box::new(failing::FailingModule::new()?))
        .context("registering failing")?;
    registry
        .add_module("stdlib:widget", Box::new(widget::WidgetModule))
        .context("registering widget")?;
    tracing::debug!(target: "strand::module", modules = registry.module_names().len(), "stdlib registered");
    Ok(())
}

/// Numeric argument `index`, already marshaled to a number by the signature.
pub(crate) fn number_arg(domain: &str, args: &[Val], index: usize) -> Result<f64, NativeError> {
    match args.get(index) {
        Some(Val::Number(n)) => Ok(n.as_real()),
        Some(other) => Err(NativeError::new(
            domain,
            format!("argument {} must be a number, got {}", index + 1, other.kind_name()),
        )),
        None => Err(NativeError::new(domain, format!("missing argument {}", index + 1))),
    }
}

/// Integral results come back as integers.
pub(crate) fn number_val(value: f64) -> Val {
    match Number::Real(value).as_exact_int() {
        Some(i) => Val::Number(Number::Int(i)),
        None => Val::Number(Number::Real(value)),
    }
}
