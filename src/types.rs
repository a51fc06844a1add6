//! Utility types.

type BuildHasher = std::hash::BuildHasherDefault<rustc_hash::FxHasher>;

/// A hash map with a deterministic (insertion-ordered) iteration order.
pub type Map<K, V> = indexmap::IndexMap<K, V, BuildHasher>;

/// A hash set with a deterministic (insertion-ordered) iteration order.
pub type Set<T> = indexmap::IndexSet<T, BuildHasher>;
