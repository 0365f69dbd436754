//! Allocation sites that tests can force to fail.
//!
//! Outside of tests `injected` is a constant `false`.

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Site {
    /// A table's bucket array, at creation or growth.
    Buckets,
    /// The table's copy of a key.
    KeyCopy,
    /// The arena slot for a new entry.
    EntrySlot,
}

#[cfg(not(test))]
#[inline(always)]
pub(crate) fn injected(_site: Site) -> bool {
    false
}

#[cfg(test)]
pub(crate) use inject::{fail, injected};
