use std::path::{Component, Path, PathBuf};
use std::sync::Once;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use strand_core::{
    config::RuntimeConfig,
    exec::{ExecContext, ExecValue, ExecValueType},
    invoke::{Parameter, invoke_handler},
    module::ModuleRegistry,
    val::Val,
};
use strand_stdlib::{register_stdlib_modules, widget::Widget};
use tracing::debug;

#[cfg(test)]
mod main_test;

static TRACE_INIT: Once = Once::new();
const DEFAULT_TRACE_FILTER: &str = "strand_core=info,strand_cli=info";

#[derive(Debug, Parser)]
#[command(name = "strand", author, version, about = "CLI for the Strand runtime core", long_about = None)]
struct CliArgs {
    /// Runtime configuration (TOML)
    #[arg(long, global = true, value_name = "FILE", value_parser = parse_sanitized_path)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Slot a `convert` run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TargetKind {
    Bool,
    Int,
    Uint,
    Double,
    Float,
    Char,
    Name,
    Data,
    Array,
    Point,
    Color,
    Rect,
    String,
}

impl From<TargetKind> for ExecValueType {
    fn from(value: TargetKind) -> Self {
        match value {
            TargetKind::Bool => ExecValueType::Bool,
            TargetKind::Int => ExecValueType::Int,
            TargetKind::Uint => ExecValueType::UInt,
            TargetKind::Double => ExecValueType::Double,
            TargetKind::Float => ExecValueType::Float,
            TargetKind::Char => ExecValueType::Char,
            TargetKind::Name => ExecValueType::NameRef,
            TargetKind::Data => ExecValueType::DataRef,
            TargetKind::Array => ExecValueType::ArrayRef,
            TargetKind::Point => ExecValueType::Point,
            TargetKind::Color => ExecValueType::Color,
            TargetKind::Rect => ExecValueType::Rectangle,
            TargetKind::String => ExecValueType::StringRef,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert a string to another evaluation slot.
    Convert {
        value: String,
        #[arg(long, value_enum)]
        to: TargetKind,
    },
    /// Invoke a stdlib handler. Arguments are JSON; anything that is not
    /// valid JSON is passed as a string.
    Call {
        handler: String,
        #[arg(value_name = "ARGS", allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Store then fetch properties on a sample widget.
    Prop {
        #[arg(long = "set", value_name = "NAME=VALUE")]
        sets: Vec<String>,
        /// Properties to print (all when omitted)
        names: Vec<String>,
    },
    /// List registered handlers with their signatures.
    Handlers,
}

fn sanitize_path(raw: &str) -> anyhow::Result<PathBuf> {
    let p = Path::new(raw);

    for comp in p.components() {
        if matches!(comp, Component::ParentDir) {
            return Err(anyhow!("Parent directory components ('..') are not allowed in file paths."));
        }
    }

    Ok(p.to_path_buf())
}

fn parse_sanitized_path(raw: &str) -> Result<PathBuf, String> {
    sanitize_path(raw).map_err(|e| e.to_string())
}

fn env_toggle_enabled(raw: &str) -> bool {
    let trimmed = raw.trim();
    !(trimmed.eq_ignore_ascii_case("0") || trimmed.eq_ignore_ascii_case("false") || trimmed.eq_ignore_ascii_case("off"))
}

fn filter_expr_from(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("1")
        || trimmed.eq_ignore_ascii_case("true")
        || trimmed.eq_ignore_ascii_case("on")
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// `STRAND_TRACE` wins over `RUST_LOG`; `STRAND_TRACE=0` silences tracing.
fn init_tracing() {
    let strand_trace = std::env::var("STRAND_TRACE").ok();
    if strand_trace.as_deref().is_some_and(|raw| !env_toggle_enabled(raw)) {
        return;
    }

    TRACE_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::fmt;

        let filter_expr = strand_trace
            .as_deref()
            .and_then(filter_expr_from)
            .or_else(|| std::env::var("RUST_LOG").ok());

        let builder = fmt().with_writer(std::io::stderr);

        let builder = match filter_expr.and_then(|expr| EnvFilter::try_new(expr).ok()) {
            Some(filter) => builder.with_env_filter(filter),
            None => builder.with_env_filter(DEFAULT_TRACE_FILTER),
        };

        let _ = builder.try_init();
    });
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RuntimeConfig> {
    match path {
        Some(path) => RuntimeConfig::load(path),
        None => Ok(RuntimeConfig::default()),
    }
}

/// A command-line argument as a script value.
pub(crate) fn parse_arg(raw: &str) -> Val {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => Val::from(json),
        Err(_) => Val::str(raw),
    }
}

/// Split `name=value`.
pub(crate) fn parse_assignment(raw: &str) -> anyhow::Result<(&str, &str)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=VALUE, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("empty property name in '{}'", raw);
    }
    Ok((name, value))
}

fn render_val(ctx: &ExecContext, value: &Val) -> String {
    match value {
        Val::Array(_) | Val::List(_) | Val::Record(_) | Val::Data(_) => value.to_string(),
        _ => ctx
            .convert_to_string(value)
            .map(|s| s.as_str().to_owned())
            .unwrap_or_else(|| value.to_string()),
    }
}

fn render(ctx: &ExecContext, value: ExecValue) -> String {
    let boxed = ctx.box_value(value);
    render_val(ctx, &boxed)
}

fn run_convert(ctx: &ExecContext, value: &str, to: TargetKind) -> anyhow::Result<()> {
    let converted = ctx
        .convert(ExecValue::string(value), to.into())
        .with_context(|| format!("cannot convert '{}' to {:?}", value, to))?;
    println!("{}", render(ctx, converted));
    Ok(())
}

fn run_call(ctx: &mut ExecContext, registry: &mut ModuleRegistry, handler: &str, args: &[String]) -> anyhow::Result<()> {
    let mut params: Vec<Parameter<'_>> = args.iter().map(|raw| Parameter::value(parse_arg(raw))).collect();
    debug!(target: "strand::cli", handler, args = params.len(), "calling handler");
    match invoke_handler(ctx, registry, handler, &mut params) {
        Ok(result) => {
            println!("{}", render_val(ctx, &result));
            for (index, param) in params.iter().enumerate() {
                if let Some(written) = param.written() {
                    println!("arg {} = {}", index + 1, render_val(ctx, written));
                }
            }
            Ok(())
        }
        Err(err) => {
            for entry in ctx.take_errors() {
                eprintln!("{}", entry);
            }
            Err(anyhow!(err)).with_context(|| format!("call to '{}' failed", handler))
        }
    }
}

fn run_prop(ctx: &ExecContext, sets: &[String], names: &[String]) -> anyhow::Result<()> {
    let table = Widget::properties();
    let mut widget = Widget::new(1, "sample");
    for raw in sets {
        let (name, value) = parse_assignment(raw)?;
        debug!(target: "strand::cli", property = name, value, "storing property");
        table
            .set_property(ctx, &mut widget, name, ExecValue::string(value))
            .with_context(|| format!("cannot set '{}'", name))?;
    }

    let names: Vec<&str> = if names.is_empty() {
        table.names().collect()
    } else {
        names.iter().map(String::as_str).collect()
    };
    for name in names {
        let value = table
            .get_property(ctx, &widget, name)
            .with_context(|| format!("cannot read '{}'", name))?;
        println!("{}: {}", name, render(ctx, value).replace('\n', "\\n"));
    }
    Ok(())
}

fn run_handlers(registry: &mut ModuleRegistry) {
    for (handler, module) in registry.handler_names() {
        let signature = registry
            .lookup(&handler)
            .and_then(|id| registry.module(id))
            .and_then(|m| m.signature(&handler))
            .map(|sig| sig.to_string())
            .unwrap_or_default();
        println!("{}{}  [{}]", handler, signature, module);
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let CliArgs { config, command } = CliArgs::parse();
    let config = load_config(config.as_deref())?;
    let mut ctx = ExecContext::new(config);

    match command {
        Commands::Convert { value, to } => run_convert(&ctx, &value, to),
        Commands::Call { handler, args } => {
            let mut registry = ModuleRegistry::new();
            register_stdlib_modules(&mut registry)?;
            run_call(&mut ctx, &mut registry, &handler, &args)
        }
        Commands::Prop { sets, names } => run_prop(&ctx, &sets, &names),
        Commands::Handlers => {
            let mut registry = ModuleRegistry::new();
            register_stdlib_modules(&mut registry)?;
            run_handlers(&mut registry);
            Ok(())
        }
    }
}
