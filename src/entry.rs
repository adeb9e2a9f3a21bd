//! The wrapped value stored through the TTL decorator.

use std::time::{Duration, Instant};

/// A cached value together with its optional absolute expiry instant.
///
/// Entries are owned by exactly one cache instance, created on put and
/// replaced wholesale on overwrite, never mutated in place. An absent
/// expiry means the entry never expires.
#[derive(Debug, Clone)]
pub struct Entry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    /// Wraps `value`, expiring `ttl` from now. A zero TTL stores the value
    /// without expiry.
    pub fn new(value: V, ttl: Duration) -> Self {
        let expires_at = (!ttl.is_zero()).then(|| Instant::now() + ttl);
        Self { value, expires_at }
    }

    /// Wraps `value` with no expiry.
    pub fn never_expires(value: V) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    /// Whether the entry is expired as of `now`. The expiry boundary is
    /// inclusive: an entry put with TTL `t` reads as expired from
    /// `put_instant + t` onward. An absent expiry always reads as live.
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires_at) => now >= expires_at,
            None => false,
        }
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_value(self) -> V {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_ttl_never_expires() {
        let entry = Entry::new(1, Duration::ZERO);
        assert!(!entry.is_expired(Instant::now() + Duration::from_secs(3600)));
    }

    #[test]
    fn test_never_expires_constructor() {
        let entry = Entry::never_expires("v");
        assert!(!entry.is_expired(Instant::now() + Duration::from_secs(3600)));
    }

    #[test]
    fn test_expiry_boundary() {
        let entry = Entry::new(1, Duration::from_secs(10));
        assert!(!entry.is_expired(Instant::now()));
        assert!(entry.is_expired(Instant::now() + Duration::from_secs(11)));
    }

    #[test]
    fn test_into_value() {
        let entry = Entry::new("v".to_string(), Duration::from_secs(1));
        assert_eq!(entry.value(), "v");
        assert_eq!(entry.into_value(), "v");
    }
}
