//! ListSymTable: singly linked list with the same contract as HashSymTable.
//!
//! Every operation walks the list from the head, so costs are O(n). Kept
//! as a simple baseline for checking the hash table against.

use crate::sym_table::{copy_key, PutError, SymbolTable};
use core::fmt;
use log::warn;

struct Node<V> {
    key: Box<str>,
    value: V,
    next: Link<V>,
}

type Link<V> = Option<Box<Node<V>>>;

pub struct ListSymTable<V> {
    head: Link<V>,
    len: usize,
}

impl<V> ListSymTable<V> {
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn find(&self, key: &str) -> Option<&Node<V>> {
        let mut cur = self.head.as_deref();
        while let Some(node) = cur {
            if &*node.key == key {
                return Some(node);
            }
            cur = node.next.as_deref();
        }
        None
    }

    fn find_mut(&mut self, key: &str) -> Option<&mut Node<V>> {
        let mut cur = self.head.as_deref_mut();
        while let Some(node) = cur {
            if &*node.key == key {
                return Some(node);
            }
            cur = node.next.as_deref_mut();
        }
        None
    }

    /// Add a binding at the head of the list. On error the list is
    /// unchanged and `value` is dropped.
    pub fn try_put(&mut self, key: &str, value: V) -> Result<(), PutError> {
        if self.find(key).is_some() {
            return Err(PutError::DuplicateKey);
        }
        let Some(key_copy) = copy_key(key) else {
            warn!("put: could not copy key of {} bytes", key.len());
            return Err(PutError::OutOfMemory);
        };
        let node = Box::new(Node {
            key: key_copy,
            value,
            next: self.head.take(),
        });
        self.head = Some(node);
        self.len += 1;
        Ok(())
    }

    pub fn put(&mut self, key: &str, value: V) -> bool {
        self.try_put(key, value).is_ok()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.find(key).map(|n| &n.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.find_mut(key).map(|n| &mut n.value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Swap in `value` for the binding of `key`, returning the old value,
    /// or hand `value` back if `key` is unbound.
    pub fn replace(&mut self, key: &str, value: V) -> Result<V, V> {
        match self.find_mut(key) {
            Some(node) => Ok(core::mem::replace(&mut node.value, value)),
            None => Err(value),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let mut link = &mut self.head;
        while link.as_ref().map_or(false, |n| &*n.key != key) {
            if let Some(node) = link {
                link = &mut node.next;
            }
        }
        let mut node = link.take()?;
        *link = node.next.take();
        self.len -= 1;
        Some(node.value)
    }

    pub fn clear(&mut self) {
        let mut cur = self.head.take();
        while let Some(mut node) = cur {
            cur = node.next.take();
        }
        self.len = 0;
    }

    pub fn map<F>(&self, mut visit: F)
    where
        F: FnMut(&str, &V),
    {
        for (k, v) in self.iter() {
            visit(k, v);
        }
    }

    pub fn map_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(&str, &mut V),
    {
        let mut cur = self.head.as_deref_mut();
        while let Some(node) = cur {
            visit(&*node.key, &mut node.value);
            cur = node.next.as_deref_mut();
        }
    }

    /// Bindings from most to least recently added.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            cur: self.head.as_deref(),
            remaining: self.len,
        }
    }
}

impl<V> Default for ListSymTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

// Unlink iteratively; the default recursive drop of Box chains can
// overflow the stack on long lists.
impl<V> Drop for ListSymTable<V> {
    fn drop(&mut self) {
        self.clear();
    }
}

pub struct Iter<'a, V> {
    cur: Option<&'a Node<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cur?;
        self.cur = node.next.as_deref();
        self.remaining -= 1;
        Some((&*node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<'a, V> IntoIterator for &'a ListSymTable<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: fmt::Debug> fmt::Debug for ListSymTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> SymbolTable<V> for ListSymTable<V> {
    fn len(&self) -> usize {
        self.len
    }

    fn put(&mut self, key: &str, value: V) -> bool {
        ListSymTable::try_put(self, key, value).is_ok()
    }

    fn get(&self, key: &str) -> Option<&V> {
        ListSymTable::get(self, key)
    }

    fn contains(&self, key: &str) -> bool {
        ListSymTable::contains(self, key)
    }

    fn replace(&mut self, key: &str, value: V) -> Option<V> {
        ListSymTable::replace(self, key, value).ok()
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        ListSymTable::remove(self, key)
    }

    fn map<F>(&self, visit: F)
    where
        F: FnMut(&str, &V),
    {
        ListSymTable::map(self, visit)
    }
}
