//! Generic TTL + metrics decorator over a pluggable eviction engine.
//!
//! One decorator serves every engine: all TTL bookkeeping, instrumentation
//! and lifecycle handling live here, while the engine only sees opaque
//! [`Entry`] values and applies its own eviction policy untouched.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::contract::{Cache, Key, KeyAwareCache, NamedCache, PutWithTtl, ResizableCache, Value};
use crate::engine::{EvictionEngine, LruEngine};
use crate::entry::Entry;
use crate::error::CacheError;
use crate::metrics::{CacheMetrics, since_seconds};

/// How often the background sampler publishes the occupancy gauge.
pub const OCCUPANCY_SAMPLE_INTERVAL: Duration = Duration::from_secs(15);

/// Construction settings for a [`TtlCache`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries. Must be positive.
    pub capacity: usize,
    /// TTL applied by plain `put`s. Zero means entries never expire.
    #[serde(default)]
    pub default_ttl: Duration,
    /// Occupancy gauge refresh interval. Must be positive.
    #[serde(default = "default_sample_interval")]
    pub sample_interval: Duration,
}

fn default_sample_interval() -> Duration {
    OCCUPANCY_SAMPLE_INTERVAL
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            default_ttl: Duration::ZERO,
            sample_interval: OCCUPANCY_SAMPLE_INTERVAL,
        }
    }
}

impl CacheConfig {
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        Self {
            capacity,
            default_ttl,
            ..Self::default()
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }
}

/// Callback invoked with the evicted key and unwrapped value when the
/// engine displaces an entry to make room.
pub type EvictCallback<K, V> = Box<dyn Fn(&K, &V) + Send + Sync>;

struct Shared<K, V, E>
where
    K: Key,
    V: Value,
    E: EvictionEngine<K, Entry<V>>,
{
    name: String,
    default_ttl: Duration,
    engine: Mutex<E>,
    metrics: CacheMetrics,
    on_evict: Option<EvictCallback<K, V>>,
    closed: AtomicBool,
    shutdown: watch::Sender<bool>,
    sampler: Mutex<Option<JoinHandle<()>>>,
}

/// A named, TTL-aware, metrics-instrumented cache over a pluggable
/// eviction engine.
///
/// Expiry is lazy: an expired entry reads as absent (and counts as
/// *expired* rather than *miss* on `get`) but stays in the engine until the
/// engine's own eviction reclaims it or an explicit `remove`/`clear`
/// happens. Checking the TTL is O(1) per read and no second sweep mutates
/// shared structures.
///
/// Each instance runs one background task sampling occupancy into a gauge
/// for its lifetime. Call [`close`](TtlCache::close) when done; a dropped,
/// never-closed cache stops its sampler on the task's next tick. Handles
/// are cheap to clone and share one underlying instance.
///
/// Must be constructed inside a Tokio runtime.
pub struct TtlCache<K, V, E>
where
    K: Key,
    V: Value,
    E: EvictionEngine<K, Entry<V>> + 'static,
{
    shared: Arc<Shared<K, V, E>>,
}

impl<K, V, E> Clone for TtlCache<K, V, E>
where
    K: Key,
    V: Value,
    E: EvictionEngine<K, Entry<V>> + 'static,
{
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// [`TtlCache`] over the bundled LRU engine.
pub type LruTtlCache<K, V> = TtlCache<K, V, LruEngine<K, Entry<V>>>;

impl<K, V> LruTtlCache<K, V>
where
    K: Key,
    V: Value,
{
    /// Creates an LRU-backed cache. A zero `default_ttl` disables expiry
    /// for plain `put`s.
    pub fn lru(
        name: impl Into<String>,
        capacity: usize,
        default_ttl: Duration,
    ) -> Result<Self, CacheError> {
        Self::lru_with_config(name, CacheConfig::new(capacity, default_ttl))
    }

    /// [`lru`](Self::lru) with full construction settings.
    pub fn lru_with_config(
        name: impl Into<String>,
        config: CacheConfig,
    ) -> Result<Self, CacheError> {
        let name = name.into();
        let capacity = validate_capacity(&name, config.capacity)?;
        Self::build(name, LruEngine::new(capacity), config, None)
    }

    /// [`lru`](Self::lru) plus an eviction callback. The callback receives
    /// the caller's original key and value, not the internal entry, and
    /// only fires when the engine displaces an entry to make room; a
    /// same-key overwrite does not count as an eviction.
    pub fn lru_with_evict_callback(
        name: impl Into<String>,
        capacity: usize,
        default_ttl: Duration,
        on_evict: impl Fn(&K, &V) + Send + Sync + 'static,
    ) -> Result<Self, CacheError> {
        let name = name.into();
        let config = CacheConfig::new(capacity, default_ttl);
        let capacity = validate_capacity(&name, config.capacity)?;
        Self::build(name, LruEngine::new(capacity), config, Some(Box::new(on_evict)))
    }
}

impl<K, V, E> TtlCache<K, V, E>
where
    K: Key,
    V: Value,
    E: EvictionEngine<K, Entry<V>> + 'static,
{
    /// Wraps an already-constructed engine. The engine's own policy decides
    /// what a `put` at capacity displaces; this layer adds TTL, metrics and
    /// lifecycle on top.
    pub fn with_engine(
        name: impl Into<String>,
        engine: E,
        config: CacheConfig,
    ) -> Result<Self, CacheError> {
        Self::build(name.into(), engine, config, None)
    }

    /// [`with_engine`](Self::with_engine) plus an eviction callback.
    pub fn with_engine_and_evict_callback(
        name: impl Into<String>,
        engine: E,
        config: CacheConfig,
        on_evict: impl Fn(&K, &V) + Send + Sync + 'static,
    ) -> Result<Self, CacheError> {
        Self::build(name.into(), engine, config, Some(Box::new(on_evict)))
    }

    fn build(
        name: String,
        engine: E,
        config: CacheConfig,
        on_evict: Option<EvictCallback<K, V>>,
    ) -> Result<Self, CacheError> {
        validate_capacity(&name, config.capacity)?;
        if config.sample_interval.is_zero() {
            return Err(CacheError::configuration(format!(
                "sample interval for cache `{name}` must be positive"
            )));
        }

        let metrics = CacheMetrics::new(&name);
        let (shutdown, shutdown_rx) = watch::channel(false);
        let shared = Arc::new(Shared {
            name,
            default_ttl: config.default_ttl,
            engine: Mutex::new(engine),
            metrics,
            on_evict,
            closed: AtomicBool::new(false),
            shutdown,
            sampler: Mutex::new(None),
        });

        let handle = spawn_sampler(&shared, config.sample_interval, shutdown_rx);
        *shared.sampler.lock() = Some(handle);

        Ok(Self { shared })
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// The TTL applied by plain `put`s.
    pub fn default_ttl(&self) -> Duration {
        self.shared.default_ttl
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::SeqCst)
    }

    /// Stops the occupancy sampler and clears the engine. Idempotent:
    /// repeated calls are no-ops and never block or panic.
    pub async fn close(&self) {
        if self.shared.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.shared.engine.lock().clear();
        let _ = self.shared.shutdown.send(true);
        let sampler = self.shared.sampler.lock().take();
        if let Some(handle) = sampler {
            let _ = handle.await;
        }
        tracing::debug!(cache = %self.shared.name, "cache closed");
    }

    fn store(&self, key: K, value: V, ttl: Duration) {
        let started = Instant::now();
        let evicted = {
            let mut engine = self.shared.engine.lock();
            engine.put(key.clone(), Entry::new(value, ttl))
        };
        self.shared
            .metrics
            .response_time_set
            .record(since_seconds(started));

        if let (Some(on_evict), Some((evicted_key, entry))) = (&self.shared.on_evict, evicted) {
            // put reports a same-key overwrite the same way as an eviction;
            // only the latter reaches the callback
            if evicted_key != key {
                on_evict(&evicted_key, entry.value());
            }
        }
    }
}

fn validate_capacity(name: &str, capacity: usize) -> Result<NonZeroUsize, CacheError> {
    NonZeroUsize::new(capacity).ok_or_else(|| CacheError::invalid_capacity(name))
}

fn spawn_sampler<K, V, E>(
    shared: &Arc<Shared<K, V, E>>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    K: Key,
    V: Value,
    E: EvictionEngine<K, Entry<V>> + 'static,
{
    // Weak so the sampler never keeps a dropped cache alive.
    let weak = Arc::downgrade(shared);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(shared) = weak.upgrade() else { break };
                    let len = shared.engine.lock().len();
                    shared.metrics.item_count.set(len as f64);
                }
                _ = shutdown.changed() => break,
            }
        }
    })
}

#[async_trait]
impl<K, V, E> Cache<K, V> for TtlCache<K, V, E>
where
    K: Key,
    V: Value,
    E: EvictionEngine<K, Entry<V>> + 'static,
{
    async fn get(&self, key: &K) -> Option<V> {
        let started = Instant::now();
        let (value, expired) = {
            let mut engine = self.shared.engine.lock();
            match engine.get(key) {
                Some(entry) if !entry.is_expired(Instant::now()) => {
                    (Some(entry.value().clone()), false)
                }
                // stale entry stays until the engine reclaims it
                Some(_) => (None, true),
                None => (None, false),
            }
        };

        let metrics = &self.shared.metrics;
        metrics.response_time_get.record(since_seconds(started));
        match (&value, expired) {
            (Some(_), _) => metrics.hit_count.increment(1),
            (None, true) => metrics.expired_count.increment(1),
            (None, false) => metrics.miss_count.increment(1),
        }

        value
    }

    async fn peek(&self, key: &K) -> Option<V> {
        let engine = self.shared.engine.lock();
        engine
            .peek(key)
            .filter(|entry| !entry.is_expired(Instant::now()))
            .map(|entry| entry.value().clone())
    }

    async fn put(&self, key: K, value: V) {
        self.store(key, value, self.shared.default_ttl);
    }

    async fn remove(&self, key: &K) {
        let started = Instant::now();
        self.shared.engine.lock().remove(key);
        self.shared
            .metrics
            .response_time_delete
            .record(since_seconds(started));
    }

    async fn contains(&self, key: &K) -> bool {
        let engine = self.shared.engine.lock();
        engine
            .peek(key)
            .is_some_and(|entry| !entry.is_expired(Instant::now()))
    }

    async fn clear(&self) {
        self.shared.engine.lock().clear();
    }

    async fn len(&self) -> usize {
        self.shared.engine.lock().len()
    }

    async fn capacity(&self) -> usize {
        self.shared.engine.lock().capacity()
    }
}

impl<K, V, E> NamedCache<K, V> for TtlCache<K, V, E>
where
    K: Key,
    V: Value,
    E: EvictionEngine<K, Entry<V>> + 'static,
{
    fn name(&self) -> &str {
        &self.shared.name
    }
}

#[async_trait]
impl<K, V, E> PutWithTtl<K, V> for TtlCache<K, V, E>
where
    K: Key,
    V: Value,
    E: EvictionEngine<K, Entry<V>> + 'static,
{
    async fn put_with_ttl(&self, key: K, value: V, ttl: Duration) {
        self.store(key, value, ttl);
    }
}

#[async_trait]
impl<K, V, E> ResizableCache for TtlCache<K, V, E>
where
    K: Key,
    V: Value,
    E: EvictionEngine<K, Entry<V>> + 'static,
{
    async fn set_capacity(&self, capacity: usize) -> Result<(), CacheError> {
        let capacity = validate_capacity(&self.shared.name, capacity)?;
        self.shared.engine.lock().resize(capacity);
        Ok(())
    }
}

#[async_trait]
impl<K, V, E> KeyAwareCache<K> for TtlCache<K, V, E>
where
    K: Key,
    V: Value,
    E: EvictionEngine<K, Entry<V>> + 'static,
{
    async fn keys(&self) -> Vec<K> {
        self.shared.engine.lock().keys()
    }
}
