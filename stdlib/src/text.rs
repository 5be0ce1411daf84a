use anyhow::Result;
use strand_core::{
    config::NumberFormat,
    error::NativeError,
    invoke::HandlerSignature,
    module::{ExtensionModule, HandlerTable},
    val::{NoTypes, Number, Val, format_integer, format_real},
};

const DOMAIN: &str = "text";

#[derive(Debug)]
pub struct TextModule {
    handlers: HandlerTable,
}

fn text_arg(args: &[Val], index: usize) -> Result<&str, NativeError> {
    args.get(index)
        .and_then(Val::as_text)
        .ok_or_else(|| NativeError::new(DOMAIN, format!("argument {} must be a string", index + 1)))
}

/// Numbers render in the default script number format.
fn item_text(item: &Val) -> String {
    match item {
        Val::Number(Number::Int(i)) => format_integer(*i),
        Val::Number(Number::Real(r)) => format_real(*r, NumberFormat::default()),
        other => other.to_string(),
    }
}

impl TextModule {
    pub fn new() -> Result<Self> {
        let mut handlers = HandlerTable::new();
        handlers
            .add("joinItems", "(in list, in string) -> string", &NoTypes, Self::join_items)?
            .add("splitItems", "(in string, in string) -> list", &NoTypes, Self::split_items)?
            .add("upperInPlace", "(inout string)", &NoTypes, Self::upper_in_place)?
            .add("toggle", "(in optional boolean) -> boolean", &NoTypes, Self::toggle)?;
        Ok(Self { handlers })
    }

    fn join_items(args: &mut [Val]) -> Result<Val, NativeError> {
        let separator = text_arg(args, 1)?;
        let Some(Val::List(items)) = args.first() else {
            return Err(NativeError::new(DOMAIN, "joinItems expects a list"));
        };
        let joined = items.iter().map(item_text).collect::<Vec<_>>().join(separator);
        Ok(Val::from(joined))
    }

    /// An empty string splits into an empty list.
    fn split_items(args: &mut [Val]) -> Result<Val, NativeError> {
        let text = text_arg(args, 0)?;
        let separator = text_arg(args, 1)?;
        if separator.is_empty() {
            return Err(NativeError::new(DOMAIN, "splitItems: empty separator"));
        }
        if text.is_empty() {
            return Ok(Val::list(Vec::new()));
        }
        Ok(Val::list(text.split(separator).map(Val::str).collect()))
    }

    fn upper_in_place(args: &mut [Val]) -> Result<Val, NativeError> {
        let upper = text_arg(args, 0)?.to_uppercase();
        args[0] = Val::from(upper);
        Ok(Val::Null)
    }

    /// Absent toggles to `true`.
    fn toggle(args: &mut [Val]) -> Result<Val, NativeError> {
        match args.first() {
            Some(Val::Bool(b)) => Ok(Val::Bool(!b)),
            Some(Val::Null) | None => Ok(Val::TRUE),
            Some(other) => Err(NativeError::new(
                DOMAIN,
                format!("toggle expects a boolean, got {}", other.kind_name()),
            )),
        }
    }
}

impl ExtensionModule for TextModule {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "String and item-list helpers"
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
