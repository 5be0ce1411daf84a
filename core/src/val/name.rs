use std::{
    borrow::Borrow,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use dashmap::DashSet;
use once_cell::sync::Lazy;

use crate::util::fast_map::eq_caseless;

// Process-wide name table. Entries live as long as the process, so lookups go
// through `Borrow<str>` and only stored keys get interned.
static NAME_TABLE: Lazy<DashSet<Arc<str>>> = Lazy::new(DashSet::new);

/// Interned string. Equality and hashing are exact; use [`Name::eq_caseless`]
/// where the language compares names without regard to case.
#[derive(Clone)]
pub struct Name(Arc<str>);

impl Name {
    pub fn new(text: &str) -> Self {
        if let Some(existing) = NAME_TABLE.get(text) {
            return Name(existing.key().clone());
        }
        let interned: Arc<str> = Arc::from(text);
        NAME_TABLE.insert(interned.clone());
        Name(interned)
    }

    #[inline]
    pub fn empty() -> Self {
        Name::new("")
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn eq_caseless(&self, other: &str) -> bool {
        eq_caseless(&self.0, other)
    }

    /// Dense index this name denotes as an array key, if it is one (`"1"`,
    /// `"2"`, ... without sign or leading zeros).
    pub fn as_index(&self) -> Option<usize> {
        let bytes = self.0.as_bytes();
        if bytes.is_empty() || bytes[0] == b'0' || !bytes.iter().all(u8::is_ascii_digit) {
            return None;
        }
        self.0.parse().ok()
    }
}

impl PartialEq for Name {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl From<&str> for Name {
    #[inline]
    fn from(text: &str) -> Self {
        Name::new(text)
    }
}

impl From<usize> for Name {
    fn from(index: usize) -> Self {
        Name::new(itoa::Buffer::new().format(index))
    }
}

impl Borrow<str> for Name {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
pub(crate) fn is_interned(text: &str) -> bool {
    NAME_TABLE.contains(text)
}

impl AsRef<str> for Name {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", &*self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
