//! Request/response memoization middleware for RPC handlers.

use std::future::Future;
use std::sync::Arc;

use crate::contract::Value;
use crate::registry::CacheRegistry;

/// A request able to produce the canonical string the interceptor caches
/// under.
///
/// Returning `None` opts the request out of caching entirely. Two distinct
/// requests producing the same fingerprint are indistinguishable to the
/// cache and will share a response; injectivity of the string form is the
/// implementor's responsibility.
pub trait Fingerprint {
    fn fingerprint(&self) -> Option<String>;
}

impl Fingerprint for String {
    fn fingerprint(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl Fingerprint for &str {
    fn fingerprint(&self) -> Option<String> {
        Some((*self).to_string())
    }
}

/// Memoizes handler responses keyed by request fingerprint, with the cache
/// chosen from the registry by fully qualified RPC method name.
///
/// Transport-agnostic middleware: it wraps any `request -> Result<response,
/// error>` handler future and composes with other middleware ahead of and
/// behind it. Deadlines and cancellation are the RPC framework's concern,
/// not this layer's.
pub struct CachingInterceptor<R>
where
    R: Value,
{
    registry: Arc<CacheRegistry<String, R>>,
}

impl<R> Clone for CachingInterceptor<R>
where
    R: Value,
{
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<R> CachingInterceptor<R>
where
    R: Value,
{
    pub fn new(registry: Arc<CacheRegistry<String, R>>) -> Self {
        Self { registry }
    }

    /// Runs `handler` through the cache registered under `method`, if any.
    ///
    /// Caching is bypassed when the request has no fingerprint or no cache
    /// is registered for the method. On a hit the cached response is
    /// returned and the handler is not invoked, so its side effects do not
    /// re-execute. On a miss the handler runs; a successful response is
    /// stored under the fingerprint with the target cache's default TTL, a
    /// failed one is never cached and its error propagates unchanged.
    pub async fn intercept<Req, F, Fut, E>(
        &self,
        method: &str,
        request: Req,
        handler: F,
    ) -> Result<R, E>
    where
        Req: Fingerprint,
        F: FnOnce(Req) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let Some(fingerprint) = request.fingerprint() else {
            return handler(request).await;
        };
        let Some(cache) = self.registry.get_by_name(method) else {
            return handler(request).await;
        };

        if let Some(cached) = cache.get(&fingerprint).await {
            return Ok(cached);
        }

        let response = handler(request).await?;
        cache.put(fingerprint, response.clone()).await;
        Ok(response)
    }
}
