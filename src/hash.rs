//! Multiplicative string hash used to place keys into buckets.
//!
//! `hash = hash * 65599 + byte` over every byte of the key, in wrapping
//! 64-bit arithmetic. The bucket index is the hash reduced modulo the
//! table's current bucket count.
//!
//! Each byte is read as a signed `i8` and sign-extended, so bytes at or
//! above 0x80 (every byte of a non-ASCII UTF-8 character) contribute
//! `2^64 - (256 - b)` rather than `b`, the way a hash over a signed C
//! `char` does. ASCII keys hash the same under either reading.

use core::hash::{BuildHasher, Hasher};

/// Multiplier applied to the running hash before each byte is added.
pub const HASH_MULTIPLIER: u64 = 65599;

/// Streaming form of the 65599 hash.
#[derive(Debug, Default, Clone, Copy)]
pub struct Hasher65599 {
    hash: u64,
}

impl Hasher65599 {
    pub const fn new() -> Self {
        Self { hash: 0 }
    }
}

impl Hasher for Hasher65599 {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.hash = self
                .hash
                .wrapping_mul(HASH_MULTIPLIER)
                .wrapping_add(b as i8 as u64);
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }
}

/// Default `BuildHasher` for `HashSymTable`. Stateless, so every table
/// built with it places a given key identically.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildHasher65599;

impl BuildHasher for BuildHasher65599 {
    type Hasher = Hasher65599;

    fn build_hasher(&self) -> Self::Hasher {
        Hasher65599::new()
    }
}

/// Hash the raw bytes of `key` with `build`.
///
/// Bytes go through `Hasher::write` directly rather than `str: Hash`,
/// which would append a terminator byte and change the bucket layout.
#[inline]
pub fn hash_key<S: BuildHasher>(build: &S, key: &str) -> u64 {
    let mut h = build.build_hasher();
    h.write(key.as_bytes());
    h.finish()
}

/// Bucket that `key` belongs to in a table of `bucket_count` buckets.
#[inline]
pub fn bucket_index<S: BuildHasher>(build: &S, key: &str, bucket_count: usize) -> usize {
    debug_assert!(bucket_count > 0);
    (hash_key(build, key) % bucket_count as u64) as usize
}
