//! Deterministic engine for exercising the decorator in tests.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::EvictionEngine;

/// FIFO engine with externally observable call counts.
///
/// Eviction order is insertion order, so tests can predict exactly which
/// entry a `put` at capacity displaces. The atomic counters are shared
/// handles: clone them out before handing the engine to a cache.
pub struct CountingEngine<K, V> {
    map: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
    pub gets: Arc<AtomicUsize>,
    pub peeks: Arc<AtomicUsize>,
    pub puts: Arc<AtomicUsize>,
    pub lens: Arc<AtomicUsize>,
}

impl<K, V> CountingEngine<K, V>
where
    K: Hash + Eq + Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            gets: Arc::new(AtomicUsize::new(0)),
            peeks: Arc::new(AtomicUsize::new(0)),
            puts: Arc::new(AtomicUsize::new(0)),
            lens: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl<K, V> EvictionEngine<K, V> for CountingEngine<K, V>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Send + Sync,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        self.gets.fetch_add(1, Ordering::Relaxed);
        self.map.get(key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        self.peeks.fetch_add(1, Ordering::Relaxed);
        self.map.get(key)
    }

    fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.puts.fetch_add(1, Ordering::Relaxed);
        if let Some(old) = self.map.insert(key.clone(), value) {
            return Some((key, old));
        }
        self.order.push_back(key);
        if self.map.len() > self.capacity {
            let oldest = self.order.pop_front()?;
            let evicted = self.map.remove(&oldest)?;
            return Some((oldest, evicted));
        }
        None
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.order.retain(|k| k != key);
        self.map.remove(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }

    fn len(&self) -> usize {
        self.lens.fetch_add(1, Ordering::Relaxed);
        self.map.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn resize(&mut self, capacity: NonZeroUsize) {
        self.capacity = capacity.get();
        while self.map.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.map.remove(&oldest);
            }
        }
    }

    fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.order.iter().cloned().collect()
    }
}
