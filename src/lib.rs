//! symtable: a string-keyed symbol table.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: an associative container from text keys to values with put,
//!   get, contains, replace, remove, length and traversal.
//! - Layers:
//!   - `hash`: the 65599 multiplicative string hash, exposed as a
//!     `BuildHasher` so tables can be built with another hasher.
//!   - `HashSymTable<V, S>`: separate chaining over an entry arena. The
//!     bucket count steps through `BUCKET_COUNTS`, a fixed sequence of
//!     primes, as bindings are added.
//!   - `ListSymTable<V>`: singly linked list with the same contract and
//!     O(n) operations; a baseline the hash table is tested against.
//!   - `SymbolTable<V>`: the trait both tables implement.
//!
//! Constraints
//! - Single-threaded; no internal locking.
//! - Keys are copied into the table on insert and immutable afterwards.
//! - Unique keys: a duplicate `put` fails and leaves the table unchanged.
//! - Values are never inspected. Store `&T` or `Rc<T>` when the table
//!   should not own the referent.
//! - `get` returns `Option<&V>`, so "absent" and "present" never collide.
//!
//! Chains
//! - Each bucket holds the arena key of its first node; each node holds
//!   the arena key of the next node in its bucket. New nodes go to the
//!   head of their chain.
//! - Growth allocates the next tier's bucket array and relinks every
//!   node under the new modulus. Nodes and key copies are reused.
//! - Growth happens inside `put` when `len + 1` would exceed the bucket
//!   count, until the last tier; after that chains lengthen.
//!
//! Allocation failure
//! - `try_put` reports `PutError::OutOfMemory` if the key copy or the
//!   arena slot cannot be allocated, with the table unchanged.
//! - A failed growth allocation is logged and skipped; the put proceeds
//!   against the current buckets.
//! - `try_new` reports `AllocError` if the first bucket array cannot be
//!   allocated.
//!
//! Notes and non-goals
//! - No removal while traversing; `map` and `iter` borrow the table.
//! - Traversal order is bucket order, then chain order, and changes when
//!   the table grows.

mod fault;
pub mod hash;
pub mod hash_sym_table;
#[cfg(test)]
mod hash_sym_table_proptest;
pub mod list_sym_table;
mod sym_table;

// Public surface
pub use hash_sym_table::{HashSymTable, BUCKET_COUNTS};
pub use list_sym_table::ListSymTable;
pub use sym_table::{AllocError, PutError, SymbolTable};
