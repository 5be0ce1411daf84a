use std::sync::Arc;

use crate::util::fast_map::{FastHashMap, fast_hash_map_new, fast_hash_map_with_capacity};

use super::{Name, Val};

/// Script array: an unordered mapping from names to values.
///
/// The map is shared behind an `Arc`; writers go through `Arc::make_mut`, so a
/// store on an aliased array snapshots it instead of mutating the other owner.
#[derive(Debug, Clone, Default)]
pub struct ArrayValue(Arc<FastHashMap<Name, Val>>);

impl ArrayValue {
    pub fn new() -> Self {
        ArrayValue(Arc::new(fast_hash_map_new()))
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ArrayValue(Arc::new(fast_hash_map_with_capacity(capacity)))
    }

    /// Build a sequence: keys `1..=n` in order.
    pub fn from_sequence<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Val>,
    {
        let iter = values.into_iter();
        let mut map = fast_hash_map_with_capacity(iter.size_hint().0);
        for (i, value) in iter.enumerate() {
            map.insert(Name::from(i + 1), value);
        }
        ArrayValue(Arc::new(map))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fetch(&self, key: &str, case_sensitive: bool) -> Option<&Val> {
        if let Some(value) = self.0.get(key) {
            return Some(value);
        }
        if case_sensitive {
            return None;
        }
        self.0
            .iter()
            .find(|(name, _)| name.eq_caseless(key))
            .map(|(_, value)| value)
    }

    #[inline]
    pub fn fetch_index(&self, index: usize) -> Option<&Val> {
        self.0.get(itoa::Buffer::new().format(index))
    }

    /// Store `value` under `key`. A caseless store replaces an existing entry
    /// whose key differs only in case, keeping that entry's spelling.
    pub fn store(&mut self, key: &str, case_sensitive: bool, value: Val) {
        let map = Arc::make_mut(&mut self.0);
        let name = if case_sensitive {
            Name::new(key)
        } else {
            map.keys()
                .find(|existing| existing.eq_caseless(key))
                .cloned()
                .unwrap_or_else(|| Name::new(key))
        };
        map.insert(name, value);
    }

    #[inline]
    pub fn store_index(&mut self, index: usize, value: Val) {
        Arc::make_mut(&mut self.0).insert(Name::from(index), value);
    }

    pub fn remove(&mut self, key: &str, case_sensitive: bool) -> Option<Val> {
        let name = if case_sensitive {
            self.0.get_key_value(key).map(|(name, _)| name.clone())?
        } else {
            self.0.keys().find(|existing| existing.eq_caseless(key)).cloned()?
        };
        Arc::make_mut(&mut self.0).remove(&name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Val)> {
        self.0.iter()
    }

    /// True when the keys are exactly `1..=len`.
    pub fn is_sequence(&self) -> bool {
        let len = self.0.len();
        self.0
            .keys()
            .all(|name| matches!(name.as_index(), Some(i) if i >= 1 && i <= len))
    }

    /// Elements of a sequence in key order.
    pub fn sequence_values(&self) -> Option<Vec<Val>> {
        if !self.is_sequence() {
            return None;
        }
        (1..=self.len()).map(|i| self.fetch_index(i).cloned()).collect()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &ArrayValue) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ArrayValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0 == *other.0
    }
}

impl FromIterator<(Name, Val)> for ArrayValue {
    fn from_iter<I: IntoIterator<Item = (Name, Val)>>(iter: I) -> Self {
        ArrayValue(Arc::new(iter.into_iter().collect()))
    }
}
