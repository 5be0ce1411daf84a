pub type FastHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

#[inline]
pub fn fast_hash_map_new<K, V>() -> FastHashMap<K, V> {
    rustc_hash::FxHashMap::default()
}

#[inline]
pub fn fast_hash_map_with_capacity<K, V>(capacity: usize) -> FastHashMap<K, V> {
    rustc_hash::FxHashMap::with_capacity_and_hasher(capacity, Default::default())
}

/// Fold a key for caseless lookup tables.
#[inline]
pub fn fold_key(key: &str) -> String {
    if key.bytes().all(|b| !b.is_ascii_uppercase() && b.is_ascii()) {
        key.to_owned()
    } else {
        key.to_lowercase()
    }
}

/// Compare two strings without regard to case.
#[inline]
pub fn eq_caseless(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
