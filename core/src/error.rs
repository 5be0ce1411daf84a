//! Error taxonomy of the runtime core.
//!
//! Conversion and arity failures are returned at the point of detection; native
//! failures raised by extension handlers carry their own frame stack so they can
//! be replayed into the script error channel entry by entry.

use std::fmt;

use thiserror::Error;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("cannot convert value from {from} to {to}")]
    CannotConvert { from: &'static str, to: &'static str },
    #[error("not a number{}", range_suffix(.range))]
    NotANumber { range: Option<(i64, i64)> },
    #[error("bad enumerated value '{value}' for {type_name}")]
    BadEnumeratedValue { type_name: &'static str, value: String },
    #[error("bad set element '{tag}' for {type_name}")]
    BadSetElement { type_name: &'static str, tag: String },
    #[error("unrepresentable value of kind {kind}")]
    Unrepresentable { kind: &'static str },
    #[error("type error in argument {index}: {source}")]
    TypeError { index: usize, source: Box<RuntimeError> },
    #[error("too few arguments: '{handler}' expects {expected}, got {given}")]
    TooFewArguments { handler: String, expected: usize, given: usize },
    #[error("too many arguments: '{handler}' expects {expected}, got {given}")]
    TooManyArguments { handler: String, expected: usize, given: usize },
    #[error("no extension handler named '{0}'")]
    HandlerNotFound(String),
    #[error("property '{0}' is read-only")]
    ReadOnlyProperty(&'static str),
    #[error("no property named '{0}'")]
    UnknownProperty(String),
    #[error("re-entrancy depth limit of {0} exceeded")]
    RecursionLimit(usize),
    #[error(transparent)]
    Native(#[from] NativeError),
    #[error("internal error: {0}")]
    Internal(String),
}

fn range_suffix(range: &Option<(i64, i64)>) -> String {
    match range {
        Some((lo, hi)) => format!(" in range {}..{}", lo, hi),
        None => String::new(),
    }
}

impl RuntimeError {
    #[inline]
    pub fn not_a_number() -> Self {
        RuntimeError::NotANumber { range: None }
    }

    #[inline]
    pub fn out_of_range(lo: i64, hi: i64) -> Self {
        RuntimeError::NotANumber { range: Some((lo, hi)) }
    }

    /// Whether this failure came from a value conversion (as opposed to arity,
    /// lookup or a native module failure).
    pub fn is_conversion(&self) -> bool {
        matches!(
            self,
            RuntimeError::CannotConvert { .. }
                | RuntimeError::NotANumber { .. }
                | RuntimeError::BadEnumeratedValue { .. }
                | RuntimeError::BadSetElement { .. }
                | RuntimeError::Unrepresentable { .. }
        )
    }
}

/// One entry of a native error's propagation stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorFrame {
    pub target: String,
    pub row: u32,
    pub column: u32,
}

/// Structured failure raised by a compiled extension handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
    pub domain: String,
    pub message: String,
    pub frames: Vec<ErrorFrame>,
}

impl NativeError {
    pub fn new(domain: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            message: message.into(),
            frames: Vec::new(),
        }
    }

    pub fn with_frame(mut self, target: impl Into<String>, row: u32, column: u32) -> Self {
        self.frames.push(ErrorFrame {
            target: target.into(),
            row,
            column,
        });
        self
    }

    /// Row/column of the innermost frame, used for debugger callbacks.
    pub fn position(&self) -> (u32, u32) {
        self.frames.first().map(|f| (f.row, f.column)).unwrap_or((0, 0))
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.domain, self.message)?;
        if let Some(frame) = self.frames.first() {
            write!(f, " (at {}:{}:{})", frame.target, frame.row, frame.column)?;
        }
        Ok(())
    }
}

impl std::error::Error for NativeError {}

/// An entry in the script error channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptErrorEntry {
    DomainMessage { domain: String, message: String },
    Frame { target: String, row: u32, column: u32 },
    Message(String),
}

impl fmt::Display for ScriptErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptErrorEntry::DomainMessage { domain, message } => write!(f, "{}: {}", domain, message),
            ScriptErrorEntry::Frame { target, row, column } => write!(f, "  at {} ({}:{})", target, row, column),
            ScriptErrorEntry::Message(msg) => f.write_str(msg),
        }
    }
}

/// Unpack a native failure into the ordered entries it renders as: the
/// domain/message pair first, then one entry per frame in stack order.
pub fn replay_entries(error: &NativeError) -> Vec<ScriptErrorEntry> {
    let mut entries = Vec::with_capacity(error.frames.len() + 1);
    entries.push(ScriptErrorEntry::DomainMessage {
        domain: error.domain.clone(),
        message: error.message.clone(),
    });
    for frame in &error.frames {
        entries.push(ScriptErrorEntry::Frame {
            target: frame.target.clone(),
            row: frame.row,
            column: frame.column,
        });
    }
    entries
}
