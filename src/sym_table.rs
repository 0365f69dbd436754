//! SymbolTable: the contract shared by the hash and list tables.

use crate::fault::{self, Site};
use thiserror::Error;

/// Why a `put` did not add a binding. The table is unchanged in both cases.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum PutError {
    #[error("key is already bound")]
    DuplicateKey,
    #[error("insufficient memory to store the binding")]
    OutOfMemory,
}

/// The bucket array for a new table could not be allocated.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
#[error("insufficient memory to allocate {buckets} buckets")]
pub struct AllocError {
    pub buckets: usize,
}

/// String-keyed associative container.
///
/// `put` reports success as a plain `bool`: a duplicate key and an
/// allocation failure both yield `false`. Implementations expose a
/// `try_put` that keeps the reason.
pub trait SymbolTable<V> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a binding for `key` unless one exists. Returns true if added.
    fn put(&mut self, key: &str, value: V) -> bool;

    fn get(&self, key: &str) -> Option<&V>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Swap in `value` for an existing binding and return the old value.
    /// Returns `None` and drops `value` if `key` is unbound.
    fn replace(&mut self, key: &str, value: V) -> Option<V>;

    /// Unbind `key`, handing back its value.
    fn remove(&mut self, key: &str) -> Option<V>;

    /// Call `visit` once per binding. Order is unspecified.
    fn map<F>(&self, visit: F)
    where
        F: FnMut(&str, &V);
}

/// Copy `key` into a fresh allocation, or `None` if the allocation fails.
pub(crate) fn copy_key(key: &str) -> Option<Box<str>> {
    if fault::injected(Site::KeyCopy) {
        return None;
    }
    let mut copy = String::new();
    copy.try_reserve_exact(key.len()).ok()?;
    copy.push_str(key);
    Some(copy.into_boxed_str())
}
