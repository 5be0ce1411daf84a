use std::{cell::Cell, fmt, rc::Rc};

use tracing::debug;

use crate::{
    config::{NumberFormat, RuntimeConfig},
    error::{NativeError, RuntimeError, RuntimeResult, ScriptErrorEntry, replay_entries},
    val::Val,
};

/// Called when an error is raised during interactive evaluation. Returning
/// `true` asks the caller to retry the failed operation.
pub trait DebuggerHook {
    fn on_error(&mut self, ctx: &mut ExecContext, handler: &str, row: u32, column: u32) -> bool;
}

/// Per-thread evaluation state: configuration, the script error channel, the
/// last published result and the re-entrancy counter.
pub struct ExecContext {
    config: RuntimeConfig,
    depth: Rc<Cell<usize>>,
    errors: Vec<ScriptErrorEntry>,
    result: Option<Val>,
    debugger: Option<Box<dyn DebuggerHook>>,
}

impl Default for ExecContext {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

impl fmt::Debug for ExecContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecContext")
            .field("config", &self.config)
            .field("depth", &self.depth.get())
            .field("errors", &self.errors)
            .field("result", &self.result)
            .field("debugger", &self.debugger.is_some())
            .finish()
    }
}

impl ExecContext {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            depth: Rc::new(Cell::new(0)),
            errors: Vec::new(),
            result: None,
            debugger: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    #[inline]
    pub fn number_format(&self) -> NumberFormat {
        self.config.number_format
    }

    #[inline]
    pub fn set_number_format(&mut self, format: NumberFormat) {
        self.config.number_format = format;
    }

    #[inline]
    pub fn convert_octals(&self) -> bool {
        self.config.convert_octals
    }

    #[inline]
    pub fn is_interactive(&self) -> bool {
        self.config.interactive
    }

    #[inline]
    pub fn set_interactive(&mut self, interactive: bool) {
        self.config.interactive = interactive;
    }

    /// Current nesting depth of evaluation.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Enter one level of nested evaluation. The level is left when the
    /// returned guard is dropped.
    pub fn enter(&self) -> RuntimeResult<ReentrancyGuard> {
        let depth = self.depth.get();
        let limit = self.config.max_reentrancy_depth;
        if depth >= limit {
            return Err(RuntimeError::RecursionLimit(limit));
        }
        self.depth.set(depth + 1);
        Ok(ReentrancyGuard {
            depth: self.depth.clone(),
        })
    }

    pub fn set_result(&mut self, value: Val) {
        self.result = Some(value);
    }

    #[inline]
    pub fn result(&self) -> Option<&Val> {
        self.result.as_ref()
    }

    pub fn take_result(&mut self) -> Option<Val> {
        self.result.take()
    }

    #[inline]
    pub fn errors(&self) -> &[ScriptErrorEntry] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<ScriptErrorEntry> {
        std::mem::take(&mut self.errors)
    }

    pub fn raise(&mut self, message: impl Into<String>) {
        self.errors.push(ScriptErrorEntry::Message(message.into()));
    }

    /// Unpack a native failure into the error channel, one entry for the
    /// domain and message and one per frame.
    pub fn replay_native_error(&mut self, error: &NativeError) {
        debug!(
            target: "strand::invoke",
            domain = %error.domain,
            frames = error.frames.len(),
            "replaying native error"
        );
        self.errors.extend(replay_entries(error));
    }

    pub fn attach_debugger(&mut self, hook: Box<dyn DebuggerHook>) {
        self.debugger = Some(hook);
    }

    pub fn detach_debugger(&mut self) -> Option<Box<dyn DebuggerHook>> {
        self.debugger.take()
    }

    /// Offer a failure to the attached debugger. Returns whether the caller
    /// should retry. The hook may re-enter this context while it runs.
    pub fn offer_to_debugger(&mut self, handler: &str, row: u32, column: u32) -> bool {
        if !self.config.interactive {
            return false;
        }
        let Some(mut hook) = self.debugger.take() else {
            return false;
        };
        let retry = hook.on_error(self, handler, row, column);
        // A hook attached while this one ran takes precedence.
        if self.debugger.is_none() {
            self.debugger = Some(hook);
        }
        retry
    }
}

/// Marks one level of nested evaluation; dropping it leaves the level.
#[derive(Debug)]
pub struct ReentrancyGuard {
    depth: Rc<Cell<usize>>,
}

impl Drop for ReentrancyGuard {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}
