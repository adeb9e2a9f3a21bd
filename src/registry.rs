//! Concurrency-safe directory of named cache instances.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::contract::{Key, NamedCache, Value};
use crate::error::CacheError;

type FatalHandler = Box<dyn Fn(&CacheError) + Send + Sync>;

/// Directory mapping logical names to live cache instances.
///
/// The registry only indexes references; cache lifecycle stays with the
/// creator. Registration is append-only: a name maps to at most one cache
/// for the registry's lifetime, and a collision is an error rather than an
/// overwrite. Lookups take a read lock and run concurrently; registration
/// takes the write lock and is fully serialized.
pub struct CacheRegistry<K, V>
where
    K: Key,
    V: Value,
{
    caches: RwLock<HashMap<String, Arc<dyn NamedCache<K, V>>>>,
    fatal_handler: FatalHandler,
}

impl<K, V> Default for CacheRegistry<K, V>
where
    K: Key,
    V: Value,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CacheRegistry<K, V>
where
    K: Key,
    V: Value,
{
    pub fn new() -> Self {
        Self {
            caches: RwLock::new(HashMap::new()),
            fatal_handler: Box::new(|_| std::process::exit(1)),
        }
    }

    /// Replaces the process-exit action taken by
    /// [`must_register`](Self::must_register) on failure. Meant for tests
    /// and embedders with their own shutdown path.
    pub fn with_fatal_handler(
        mut self,
        handler: impl Fn(&CacheError) + Send + Sync + 'static,
    ) -> Self {
        self.fatal_handler = Box::new(handler);
        self
    }

    /// Registers one or more named caches under the write lock.
    ///
    /// Stops at the first duplicate name. Entries registered before the
    /// failing one remain registered: the batch is applied partially, with
    /// no rollback.
    pub fn register<I>(&self, caches: I) -> Result<(), CacheError>
    where
        I: IntoIterator<Item = Arc<dyn NamedCache<K, V>>>,
    {
        let mut directory = self.caches.write();
        for cache in caches {
            let name = cache.name().to_owned();
            if directory.contains_key(&name) {
                return Err(CacheError::already_registered(name));
            }
            directory.insert(name, cache);
        }
        Ok(())
    }

    /// Read-locked lookup, O(1) average.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn NamedCache<K, V>>> {
        self.caches.read().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.caches.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.read().is_empty()
    }

    /// Construct-then-register helper: on a construction or registration
    /// error, logs and continues.
    ///
    /// ```ignore
    /// registry.maybe_register(LruTtlCache::lru("/svc/Method", 1000, ttl));
    /// ```
    pub fn maybe_register<C>(&self, cache: Result<C, CacheError>)
    where
        C: NamedCache<K, V> + 'static,
    {
        if let Err(err) = self.try_register(cache) {
            tracing::error!(error = %err, "failed to register cache");
        }
    }

    /// Construct-then-register helper that terminates the process on
    /// failure.
    ///
    /// Fail-fast for irrecoverable startup misconfiguration only (duplicate
    /// names, invalid capacity) — never for errors expected at runtime. Use
    /// [`maybe_register`](Self::maybe_register) or plain
    /// [`register`](Self::register) for the recoverable path.
    pub fn must_register<C>(&self, cache: Result<C, CacheError>)
    where
        C: NamedCache<K, V> + 'static,
    {
        if let Err(err) = self.try_register(cache) {
            tracing::error!(error = %err, "failed to register cache, aborting");
            (self.fatal_handler)(&err);
        }
    }

    fn try_register<C>(&self, cache: Result<C, CacheError>) -> Result<(), CacheError>
    where
        C: NamedCache<K, V> + 'static,
    {
        let cache: Arc<dyn NamedCache<K, V>> = Arc::new(cache?);
        self.register([cache])
    }
}
