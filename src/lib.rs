//! PMP Cache
//!
//! A uniform caching layer over pluggable eviction engines with support
//! for:
//! - TTL decoration over any engine's raw stored value (lazy expiry)
//! - Hit/miss/expired counters, per-operation latency histograms and a
//!   periodically sampled occupancy gauge on every instance
//! - A register-once directory mapping logical names to live caches
//! - Consistent-hash sharding of one logical cache across named nodes
//! - Request/response memoization middleware for RPC handlers
//!
//! Eviction and admission policies themselves are external collaborators
//! behind [`EvictionEngine`]; an LRU adapter is bundled.

pub mod contract;
pub mod engine;
pub mod entry;
pub mod error;
pub mod interceptor;
pub mod metrics;
pub mod registry;
mod ring;
pub mod sharded;
pub mod ttl_cache;

pub use contract::{Cache, Key, KeyAwareCache, NamedCache, PutWithTtl, ResizableCache, Value};
pub use engine::{EvictionEngine, LruEngine};
pub use entry::Entry;
pub use error::CacheError;
pub use interceptor::{CachingInterceptor, Fingerprint};
pub use metrics::CacheMetrics;
pub use registry::CacheRegistry;
pub use sharded::ShardedCache;
pub use ttl_cache::{CacheConfig, LruTtlCache, OCCUPANCY_SAMPLE_INTERVAL, TtlCache};
