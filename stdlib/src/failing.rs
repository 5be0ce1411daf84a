use anyhow::Result;
use strand_core::{
    error::NativeError,
    invoke::HandlerSignature,
    module::{ExtensionModule, HandlerTable},
    val::{NoTypes, Val},
};

const DOMAIN: &str = "failing";

/// A library whose only handler always fails, used to exercise error replay.
#[derive(Debug)]
pub struct FailingModule {
    handlers: HandlerTable,
}

impl FailingModule {
    pub fn new() -> Result<Self> {
        let mut handlers = HandlerTable::new();
        handlers.add("explode", "(in string)", &NoTypes, Self::explode)?;
        Ok(Self { handlers })
    }

    fn explode(args: &mut [Val]) -> Result<Val, NativeError> {
        let reason = args.first().and_then(Val::as_text).unwrap_or_default();
        Err(NativeError::new(DOMAIN, format!("explode: {}", reason))
            .with_frame("detonate", 3, 9)
            .with_frame("fuse", 12, 5)
            .with_frame("explode", 20, 1))
    }
}

impl ExtensionModule for FailingModule {
    fn name(&self) -> &str {
        "failing"
    }

    fn description(&self) -> &str {
        "Always fails"
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
