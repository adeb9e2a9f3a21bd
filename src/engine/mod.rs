//! The contract eviction engines plug in through.
//!
//! Eviction and admission policies (LRU, adaptive replacement, two-queue,
//! cost-based admission) are external collaborators. This layer never
//! assumes a specific policy, only the minimal surface below; [`LruEngine`]
//! is the bundled adapter over the `lru` crate.

pub mod lru;

#[cfg(test)]
pub mod mock;

pub use lru::LruEngine;

use std::num::NonZeroUsize;

/// Minimal surface required of an eviction engine.
///
/// Calls are made under the owning cache's lock, so implementations need no
/// internal synchronization.
pub trait EvictionEngine<K, V>: Send {
    /// Recency/frequency-updating read.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Read with no effect on eviction state.
    fn peek(&self, key: &K) -> Option<&V>;

    /// Stores `value` under `key`. Returns the entry the engine evicted to
    /// make room, or the previous value when `key` was already present.
    fn put(&mut self, key: K, value: V) -> Option<(K, V)>;

    fn remove(&mut self, key: &K) -> Option<V>;

    fn contains(&self, key: &K) -> bool;

    fn clear(&mut self);

    fn len(&self) -> usize;

    fn capacity(&self) -> usize;

    /// Live resize. Shrinking may evict per the engine's own policy.
    fn resize(&mut self, capacity: NonZeroUsize);

    /// Stored keys, in engine-defined order.
    fn keys(&self) -> Vec<K>
    where
        K: Clone;
}
