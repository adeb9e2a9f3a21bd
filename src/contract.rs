//! Capability contracts shared by every cache variant.
//!
//! A cache implementation may support only a subset of capabilities;
//! callers depending on the base [`Cache`] trait alone can substitute any
//! implementation. Optional capabilities (identity, per-call TTL, live
//! resize, key enumeration) are layered on as separate traits.

use std::hash::Hash;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheError;

/// Bounds required of cache keys.
pub trait Key: Hash + Eq + Clone + Send + Sync + 'static {}

impl<T: Hash + Eq + Clone + Send + Sync + 'static> Key for T {}

/// Bounds required of cached values.
pub trait Value: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Value for T {}

/// The base contract every cache variant satisfies.
#[async_trait]
pub trait Cache<K, V>: Send + Sync
where
    K: Key,
    V: Value,
{
    /// Returns the value for `key`, marking it as most recently used.
    async fn get(&self, key: &K) -> Option<V>;

    /// Returns the value for `key` without touching recency or frequency
    /// state.
    async fn peek(&self, key: &K) -> Option<V>;

    /// Stores `value` under `key` using the implementation's default TTL.
    async fn put(&self, key: K, value: V);

    /// Removes the value stored under `key`, if any.
    async fn remove(&self, key: &K);

    /// Checks for a live (non-expired) entry under `key`, with no recency
    /// side effect.
    async fn contains(&self, key: &K) -> bool {
        self.peek(key).await.is_some()
    }

    /// Removes every entry.
    async fn clear(&self);

    /// Number of entries currently stored. Expired entries that the engine
    /// has not reclaimed yet are counted.
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Maximum number of entries.
    async fn capacity(&self) -> usize;
}

/// A cache with an identity, usable with the registry and as a shard node.
pub trait NamedCache<K, V>: Cache<K, V>
where
    K: Key,
    V: Value,
{
    fn name(&self) -> &str;
}

/// Per-call TTL override capability.
#[async_trait]
pub trait PutWithTtl<K, V>: Cache<K, V>
where
    K: Key,
    V: Value,
{
    /// Stores `value` under `key`, expiring `ttl` from now. A zero TTL
    /// stores the value without expiry.
    async fn put_with_ttl(&self, key: K, value: V, ttl: Duration);
}

/// Live capacity resize capability.
#[async_trait]
pub trait ResizableCache: Send + Sync {
    /// Resizes the cache. Shrinking below the current occupancy evicts per
    /// the engine's own policy. A zero capacity is a configuration error.
    async fn set_capacity(&self, capacity: usize) -> Result<(), CacheError>;
}

/// Key enumeration capability.
#[async_trait]
pub trait KeyAwareCache<K>: Send + Sync
where
    K: Key,
{
    /// Stored keys, in engine-defined order.
    async fn keys(&self) -> Vec<K>;
}
