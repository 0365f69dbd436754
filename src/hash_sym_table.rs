//! HashSymTable: separate-chaining hash table over an entry arena.
//!
//! Buckets hold the arena key of their chain head; each node holds the
//! arena key of its successor. New nodes are linked at the head of their
//! chain. The bucket count steps through `BUCKET_COUNTS` as the table
//! fills, and every step relinks all nodes under the new modulus.

use crate::fault::{self, Site};
use crate::hash::{bucket_index, BuildHasher65599};
use crate::sym_table::{copy_key, AllocError, PutError, SymbolTable};
use core::fmt;
use core::hash::BuildHasher;
use log::{debug, trace, warn};
use slotmap::{DefaultKey, SlotMap};

/// Bucket counts the table steps through. Each is a prime roughly double
/// the previous one.
pub const BUCKET_COUNTS: [usize; 8] = [509, 1021, 2039, 4093, 8191, 16381, 32749, 65521];

#[derive(Debug)]
struct Node<V> {
    key: Box<str>,
    value: V,
    next: Option<DefaultKey>,
}

/// Symbol table mapping string keys to values of type `V`, using
/// separate chaining and the hasher built by `S`.
pub struct HashSymTable<V, S = BuildHasher65599> {
    hasher: S,
    buckets: Vec<Option<DefaultKey>>,
    nodes: SlotMap<DefaultKey, Node<V>>, // len() is the binding count
    tier: usize,
}

impl<V> HashSymTable<V> {
    /// Empty table at the first tier, hashing with the 65599 hash.
    pub fn new() -> Self {
        Self::with_hasher(BuildHasher65599)
    }

    /// Like `new`, but reports a failed bucket allocation instead of aborting.
    pub fn try_new() -> Result<Self, AllocError> {
        Self::try_with_hasher(BuildHasher65599)
    }
}

impl<V> Default for HashSymTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn alloc_buckets(n: usize) -> Result<Vec<Option<DefaultKey>>, AllocError> {
    if fault::injected(Site::Buckets) {
        return Err(AllocError { buckets: n });
    }
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(n)
        .map_err(|_| AllocError { buckets: n })?;
    buckets.resize(n, None);
    Ok(buckets)
}

impl<V, S> HashSymTable<V, S>
where
    S: BuildHasher,
{
    /// Empty table at the first tier, placing keys with `hasher`.
    pub fn with_hasher(hasher: S) -> Self {
        let n = BUCKET_COUNTS[0];
        trace!("symbol table created with {} buckets", n);
        Self {
            hasher,
            buckets: vec![None; n],
            nodes: SlotMap::with_key(),
            tier: 0,
        }
    }

    /// Like `with_hasher`, but reports a failed bucket allocation.
    pub fn try_with_hasher(hasher: S) -> Result<Self, AllocError> {
        let buckets = alloc_buckets(BUCKET_COUNTS[0])?;
        trace!("symbol table created with {} buckets", buckets.len());
        Ok(Self {
            hasher,
            buckets,
            nodes: SlotMap::with_key(),
            tier: 0,
        })
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Current number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Position of the current bucket count within `BUCKET_COUNTS`.
    pub fn tier(&self) -> usize {
        self.tier
    }

    #[inline]
    fn index_of(&self, key: &str) -> usize {
        bucket_index(&self.hasher, key, self.buckets.len())
    }

    fn find(&self, key: &str) -> Option<DefaultKey> {
        let mut cur = self.buckets[self.index_of(key)];
        while let Some(k) = cur {
            let node = &self.nodes[k];
            if &*node.key == key {
                return Some(k);
            }
            cur = node.next;
        }
        None
    }

    /// Add a binding for `key`, copying the key. On error the table is
    /// unchanged and `value` is dropped.
    pub fn try_put(&mut self, key: &str, value: V) -> Result<(), PutError> {
        if self.find(key).is_some() {
            return Err(PutError::DuplicateKey);
        }

        // Allocate everything the entry needs before touching the buckets.
        let Some(key_copy) = copy_key(key) else {
            warn!("put: could not copy key of {} bytes", key.len());
            return Err(PutError::OutOfMemory);
        };
        if fault::injected(Site::EntrySlot) || self.nodes.try_reserve(1).is_err() {
            // key_copy is released on return
            warn!("put: could not reserve an entry slot");
            return Err(PutError::OutOfMemory);
        }

        if self.nodes.len() + 1 > self.buckets.len() && self.tier + 1 < BUCKET_COUNTS.len() {
            self.grow();
        }

        let b = self.index_of(key);
        let k = self.nodes.insert(Node {
            key: key_copy,
            value,
            next: self.buckets[b],
        });
        self.buckets[b] = Some(k);
        Ok(())
    }

    /// Add a binding for `key` unless one exists. Returns true if added.
    pub fn put(&mut self, key: &str, value: V) -> bool {
        self.try_put(key, value).is_ok()
    }

    // Step to the next tier and relink every node. Nodes and key copies
    // are reused. If the new bucket array cannot be allocated the table
    // stays at its current tier.
    fn grow(&mut self) {
        let tier = self.tier + 1;
        let count = BUCKET_COUNTS[tier];
        let mut buckets = match alloc_buckets(count) {
            Ok(b) => b,
            Err(e) => {
                warn!("grow: {}; staying at {} buckets", e, self.buckets.len());
                return;
            }
        };

        let old = core::mem::take(&mut self.buckets);
        let old_count = old.len();
        for head in old {
            let mut cur = head;
            while let Some(k) = cur {
                let node = &mut self.nodes[k];
                cur = node.next;
                let b = bucket_index(&self.hasher, &node.key, count);
                node.next = buckets[b];
                buckets[b] = Some(k);
            }
        }
        self.buckets = buckets;
        self.tier = tier;
        debug!(
            "grew symbol table from {} to {} buckets ({} bindings)",
            old_count,
            count,
            self.nodes.len()
        );
    }

    /// Value bound to `key`, if any.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.find(key).map(|k| &self.nodes[k].value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let k = self.find(key)?;
        Some(&mut self.nodes[k].value)
    }

    /// Whether `key` is bound.
    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Swap in `value` for the binding of `key`, returning the old value.
    /// If `key` is unbound the table is unchanged and `value` comes back
    /// as `Err`.
    pub fn replace(&mut self, key: &str, value: V) -> Result<V, V> {
        match self.find(key) {
            Some(k) => Ok(core::mem::replace(&mut self.nodes[k].value, value)),
            None => Err(value),
        }
    }

    /// Unbind `key` and return its value. The key copy is freed.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let b = self.index_of(key);
        let mut prev: Option<DefaultKey> = None;
        let mut cur = self.buckets[b];
        while let Some(k) = cur {
            let node = &self.nodes[k];
            if &*node.key == key {
                let next = node.next;
                match prev {
                    None => self.buckets[b] = next,
                    Some(p) => self.nodes[p].next = next,
                }
                return self.nodes.remove(k).map(|n| n.value);
            }
            prev = cur;
            cur = node.next;
        }
        None
    }

    /// Drop every binding. The bucket count is kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.buckets.fill(None);
    }

    /// Visit every binding in bucket order, then chain order.
    pub fn map<F>(&self, mut visit: F)
    where
        F: FnMut(&str, &V),
    {
        for (k, v) in self.iter() {
            visit(k, v);
        }
    }

    /// Like `map`, with mutable access to each value.
    pub fn map_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(&str, &mut V),
    {
        for &head in &self.buckets {
            let mut cur = head;
            while let Some(k) = cur {
                let node = &mut self.nodes[k];
                visit(&*node.key, &mut node.value);
                cur = node.next;
            }
        }
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            nodes: &self.nodes,
            cur: None,
            remaining: self.nodes.len(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Number of nodes in each bucket, in bucket order.
    #[cfg(any(test, feature = "bench_internal"))]
    pub fn chain_lengths(&self) -> Vec<usize> {
        self.buckets
            .iter()
            .map(|&head| {
                let mut n = 0;
                let mut cur = head;
                while let Some(k) = cur {
                    n += 1;
                    cur = self.nodes[k].next;
                }
                n
            })
            .collect()
    }

    /// Panics unless every node is reachable exactly once and sits in the
    /// bucket its key hashes to.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let mut seen = 0;
        for (b, &head) in self.buckets.iter().enumerate() {
            let mut cur = head;
            while let Some(k) = cur {
                let node = &self.nodes[k];
                assert_eq!(self.index_of(&node.key), b, "key {:?} misplaced", node.key);
                seen += 1;
                assert!(seen <= self.nodes.len(), "cycle in chains");
                cur = node.next;
            }
        }
        assert_eq!(seen, self.nodes.len(), "unreachable nodes");
        assert_eq!(self.buckets.len(), BUCKET_COUNTS[self.tier]);
    }
}

/// Iterator over `(key, value)` bindings of a `HashSymTable`.
pub struct Iter<'a, V> {
    buckets: core::slice::Iter<'a, Option<DefaultKey>>,
    nodes: &'a SlotMap<DefaultKey, Node<V>>,
    cur: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(k) = self.cur {
                let node = &self.nodes[k];
                self.cur = node.next;
                self.remaining -= 1;
                return Some((&*node.key, &node.value));
            }
            self.cur = *self.buckets.next()?;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<'a, V, S> IntoIterator for &'a HashSymTable<V, S>
where
    S: BuildHasher,
{
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: fmt::Debug, S: BuildHasher> fmt::Debug for HashSymTable<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V, S> SymbolTable<V> for HashSymTable<V, S>
where
    S: BuildHasher,
{
    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn put(&mut self, key: &str, value: V) -> bool {
        HashSymTable::try_put(self, key, value).is_ok()
    }

    fn get(&self, key: &str) -> Option<&V> {
        HashSymTable::get(self, key)
    }

    fn contains(&self, key: &str) -> bool {
        HashSymTable::contains(self, key)
    }

    fn replace(&mut self, key: &str, value: V) -> Option<V> {
        HashSymTable::replace(self, key, value).ok()
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        HashSymTable::remove(self, key)
    }

    fn map<F>(&self, visit: F)
    where
        F: FnMut(&str, &V),
    {
        HashSymTable::map(self, visit)
    }
}
