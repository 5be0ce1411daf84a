//! Extension handler invocation.
//!
//! A call resolves the handler through the [`ModuleRegistry`], marshals the
//! script arguments into the handler's declared types, runs it, and writes
//! `out`/`inout` arguments and the result back into script form. Native
//! failures are replayed into the context's error channel and may be offered
//! to an attached debugger for a retry.

use tracing::debug;

use crate::{
    bridge::{from_script_type, to_script_type},
    error::{RuntimeError, RuntimeResult},
    exec::{Container, ExecContext, ExecValue, Expression},
    module::ModuleRegistry,
    val::Val,
};

mod signature;


pub use signature::{HandlerParam, HandlerSignature, ParamMode};

/// Where a script argument comes from.
pub enum ParamSource<'a> {
    /// An already evaluated value.
    Value(Val),
    Expression(&'a dyn Expression),
    /// A variable or array element that `out`/`inout` results are stored into.
    Container(&'a mut dyn Container),
}

/// One script argument of a handler call.
pub struct Parameter<'a> {
    source: ParamSource<'a>,
    written: Option<Val>,
}

impl<'a> Parameter<'a> {
    pub fn value(value: impl Into<Val>) -> Self {
        Self::new(ParamSource::Value(value.into()))
    }

    pub fn expression(expr: &'a dyn Expression) -> Self {
        Self::new(ParamSource::Expression(expr))
    }

    pub fn container(container: &'a mut dyn Container) -> Self {
        Self::new(ParamSource::Container(container))
    }

    fn new(source: ParamSource<'a>) -> Self {
        Self { source, written: None }
    }

    /// The value written back to a parameter that is not a container.
    #[inline]
    pub fn written(&self) -> Option<&Val> {
        self.written.as_ref()
    }

    fn eval(&self, ctx: &mut ExecContext) -> RuntimeResult<Val> {
        match &self.source {
            ParamSource::Value(v) => Ok(v.clone()),
            ParamSource::Expression(expr) => {
                let value = ctx.eval_expr(*expr)?;
                Ok(ctx.box_value(value))
            }
            ParamSource::Container(container) => Ok(container.get()),
        }
    }

    fn write_back(&mut self, ctx: &ExecContext, value: Val) -> RuntimeResult<()> {
        match &mut self.source {
            ParamSource::Container(container) => container.set(ctx, value),
            _ => {
                self.written = Some(value);
                Ok(())
            }
        }
    }
}

/// Call the extension handler `name` with `params`, publishing the converted
/// result through [`ExecContext::set_result`].
pub fn invoke_handler(
    ctx: &mut ExecContext,
    registry: &mut ModuleRegistry,
    name: &str,
    params: &mut [Parameter<'_>],
) -> RuntimeResult<Val> {
    let _guard = ctx.enter()?;
    loop {
        debug!(target: "strand::invoke", handler = name, args = params.len(), "invoking handler");
        let err = match attempt(ctx, registry, name, params) {
            Ok(result) => return Ok(result),
            Err(err) => err,
        };
        debug!(target: "strand::invoke", handler = name, error = %err, "handler invocation failed");

        let (row, column) = match &err {
            RuntimeError::Native(native) => {
                ctx.replay_native_error(native);
                native.position()
            }
            RuntimeError::HandlerNotFound(_) => return Err(err),
            _ => (0, 0),
        };
        if !ctx.offer_to_debugger(name, row, column) {
            return Err(err);
        }
        debug!(target: "strand::invoke", handler = name, "retrying after debugger");
    }
}

/// Entry point for statement classes holding already evaluated arguments.
pub fn invoke_with_values(
    ctx: &mut ExecContext,
    registry: &mut ModuleRegistry,
    name: &str,
    values: Vec<ExecValue>,
) -> RuntimeResult<Val> {
    let mut params: Vec<Parameter<'_>> = values
        .into_iter()
        .map(|value| Parameter::value(ctx.box_value(value)))
        .collect();
    invoke_handler(ctx, registry, name, &mut params)
}

fn attempt(
    ctx: &mut ExecContext,
    registry: &mut ModuleRegistry,
    name: &str,
    params: &mut [Parameter<'_>],
) -> RuntimeResult<Val> {
    let not_found = || RuntimeError::HandlerNotFound(name.to_owned());
    let id = registry.lookup(name).ok_or_else(not_found)?;
    let signature = registry
        .module(id)
        .and_then(|module| module.signature(name))
        .cloned()
        .ok_or_else(not_found)?;

    let expected = signature.params.len();
    let mut args = Vec::with_capacity(expected);
    for (index, param) in signature.params.iter().enumerate() {
        let Some(source) = params.get(index) else {
            return Err(RuntimeError::TooFewArguments {
                handler: name.to_owned(),
                expected,
                given: params.len(),
            });
        };
        if param.mode.reads() {
            let raw = source.eval(ctx)?;
            let marshaled = from_script_type(ctx, raw, &param.ty).map_err(|err| RuntimeError::TypeError {
                index: index + 1,
                source: Box::new(err),
            })?;
            args.push(marshaled);
        } else {
            args.push(Val::Null);
        }
    }
    if params.len() > expected {
        return Err(RuntimeError::TooManyArguments {
            handler: name.to_owned(),
            expected,
            given: params.len(),
        });
    }

    let module = registry.module_mut(id).ok_or_else(not_found)?;
    let result = module.call(name, &mut args)?;

    for (index, param) in signature.params.iter().enumerate() {
        if param.mode.writes() {
            let value = to_script_type(std::mem::take(&mut args[index]))?;
            params[index].write_back(ctx, value)?;
        }
    }
    let result = to_script_type(result)?;
    ctx.set_result(result.clone());
    Ok(result)
}
