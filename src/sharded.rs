//! Consistent-hash sharding across named cache nodes.

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;

use crate::contract::{Cache, Key, NamedCache, Value};
use crate::error::CacheError;
use crate::ring::HashRing;

/// Presents N independent named caches as one logical cache.
///
/// Per-key operations route to exactly one node via a consistent-hash ring
/// built once at construction — no replication and no cross-node
/// consistency guarantee between shards. Aggregate operations (`len`,
/// `capacity`, `clear`) fan out to every node concurrently and block until
/// all nodes have answered; a single slow node stalls the whole aggregate
/// call, and `clear` has no cross-node atomicity.
///
/// The key's [`Display`] form is its canonical routing string.
pub struct ShardedCache<K, V>
where
    K: Key + Display,
    V: Value,
{
    ring: HashRing,
    nodes: Vec<Arc<dyn NamedCache<K, V>>>,
    node_by_name: HashMap<String, Arc<dyn NamedCache<K, V>>>,
}

impl<K, V> ShardedCache<K, V>
where
    K: Key + Display,
    V: Value,
{
    /// Builds a sharded cache over `nodes`. The node set is fixed for the
    /// cache's lifetime; an empty list and duplicate node names are
    /// configuration errors. A duplicate would shadow its namesake on the
    /// ring while still counting toward the aggregates.
    pub fn new(nodes: Vec<Arc<dyn NamedCache<K, V>>>) -> Result<Self, CacheError> {
        if nodes.is_empty() {
            return Err(CacheError::EmptyNodes);
        }

        let mut node_by_name = HashMap::with_capacity(nodes.len());
        for node in &nodes {
            let name = node.name().to_owned();
            if node_by_name.insert(name.clone(), Arc::clone(node)).is_some() {
                return Err(CacheError::configuration(format!(
                    "duplicate shard node name `{name}`"
                )));
            }
        }
        let ring = HashRing::new(nodes.iter().map(|node| node.name().to_owned()));

        Ok(Self {
            ring,
            nodes,
            node_by_name,
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The node owning `key`. `None` only when the ring cannot resolve,
    /// which an empty ring alone causes and construction already excludes.
    fn key_to_node(&self, key: &K) -> Option<&Arc<dyn NamedCache<K, V>>> {
        let name = self.ring.node_for(&key.to_string())?;
        self.node_by_name.get(name)
    }
}

#[async_trait]
impl<K, V> Cache<K, V> for ShardedCache<K, V>
where
    K: Key + Display,
    V: Value,
{
    async fn get(&self, key: &K) -> Option<V> {
        match self.key_to_node(key) {
            Some(node) => node.get(key).await,
            None => None,
        }
    }

    async fn peek(&self, key: &K) -> Option<V> {
        match self.key_to_node(key) {
            Some(node) => node.peek(key).await,
            None => None,
        }
    }

    async fn put(&self, key: K, value: V) {
        if let Some(node) = self.key_to_node(&key) {
            node.put(key, value).await;
        }
    }

    async fn remove(&self, key: &K) {
        if let Some(node) = self.key_to_node(key) {
            node.remove(key).await;
        }
    }

    async fn contains(&self, key: &K) -> bool {
        match self.key_to_node(key) {
            Some(node) => node.contains(key).await,
            None => false,
        }
    }

    async fn clear(&self) {
        join_all(self.nodes.iter().map(|node| node.clear())).await;
    }

    async fn len(&self) -> usize {
        join_all(self.nodes.iter().map(|node| node.len()))
            .await
            .into_iter()
            .sum()
    }

    async fn capacity(&self) -> usize {
        join_all(self.nodes.iter().map(|node| node.capacity()))
            .await
            .into_iter()
            .sum()
    }
}
