use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use once_cell::sync::OnceCell;

struct StrInner {
    text: Box<str>,
    // Parsed numeric value of `text`; a cache, not part of the value's identity.
    numeric: OnceCell<f64>,
}

/// Immutable shared string with a memoized numeric interpretation.
#[derive(Clone)]
pub struct StrValue(Arc<StrInner>);

impl StrValue {
    pub fn new(text: impl Into<Box<str>>) -> Self {
        StrValue(Arc::new(StrInner {
            text: text.into(),
            numeric: OnceCell::new(),
        }))
    }

    /// A string whose numeric interpretation is already known.
    pub fn with_number(text: impl Into<Box<str>>, number: f64) -> Self {
        StrValue(Arc::new(StrInner {
            text: text.into(),
            numeric: OnceCell::with_value(number),
        }))
    }

    #[inline]
    pub fn empty() -> Self {
        StrValue::new("")
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0.text
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.text.is_empty()
    }

    #[inline]
    pub fn cached_number(&self) -> Option<f64> {
        self.0.numeric.get().copied()
    }

    /// Record the parsed value; losing a race to another writer is harmless.
    #[inline]
    pub fn remember_number(&self, value: f64) {
        let _ = self.0.numeric.set(value);
    }

    #[inline]
    pub fn ptr_eq(&self, other: &StrValue) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for StrValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0.text == other.0.text
    }
}

impl Eq for StrValue {}

impl Hash for StrValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.text.hash(state);
    }
}

impl From<&str> for StrValue {
    fn from(text: &str) -> Self {
        StrValue::new(text)
    }
}

impl From<String> for StrValue {
    fn from(text: String) -> Self {
        StrValue::new(text)
    }
}

impl fmt::Debug for StrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0.text, f)
    }
}

impl fmt::Display for StrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.text)
    }
}
