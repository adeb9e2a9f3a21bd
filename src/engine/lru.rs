//! Least-recently-used engine backed by the `lru` crate.

use std::hash::Hash;
use std::num::NonZeroUsize;

use lru::LruCache;

use super::EvictionEngine;

/// Strict LRU eviction engine.
///
/// Thin adapter over [`lru::LruCache`]: `get` promotes the entry to most
/// recently used, `peek` leaves the order untouched, and `put` at capacity
/// evicts the least recently used entry.
pub struct LruEngine<K: Hash + Eq, V> {
    inner: LruCache<K, V>,
}

impl<K: Hash + Eq, V> LruEngine<K, V> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            inner: LruCache::new(capacity),
        }
    }
}

impl<K, V> EvictionEngine<K, V> for LruEngine<K, V>
where
    K: Hash + Eq + Send,
    V: Send,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        self.inner.get(key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        self.inner.peek(key)
    }

    fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.inner.push(key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.inner.pop(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.inner.contains(key)
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn capacity(&self) -> usize {
        self.inner.cap().get()
    }

    fn resize(&mut self, capacity: NonZeroUsize) {
        self.inner.resize(capacity);
    }

    fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.inner.iter().map(|(key, _)| key.clone()).collect()
    }
}
