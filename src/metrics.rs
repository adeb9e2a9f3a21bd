//! Per-cache telemetry handles.

use std::time::Instant;

use metrics::{Counter, Gauge, Histogram, counter, gauge, histogram};

const LABEL_CACHE: &str = "cache";
const LABEL_OPERATION: &str = "operation";

const OPERATION_GET: &str = "get";
const OPERATION_SET: &str = "set";
const OPERATION_DELETE: &str = "delete";

/// Pre-resolved metric handles for one cache instance, labeled by cache
/// name at construction.
///
/// Recording is fire-and-forget: observations go to whatever recorder the
/// embedding process installed, the handles are no-ops when none is, and a
/// misbehaving sink can never surface as a cache error.
#[derive(Clone)]
pub struct CacheMetrics {
    pub(crate) response_time_get: Histogram,
    pub(crate) response_time_set: Histogram,
    pub(crate) response_time_delete: Histogram,
    pub(crate) hit_count: Counter,
    pub(crate) miss_count: Counter,
    pub(crate) expired_count: Counter,
    pub(crate) item_count: Gauge,
}

impl CacheMetrics {
    /// Handles labeled with `name` on the globally installed recorder.
    pub fn new(name: &str) -> Self {
        Self {
            response_time_get: histogram!(
                "cache_request_duration_seconds",
                LABEL_OPERATION => OPERATION_GET,
                LABEL_CACHE => name.to_owned()
            ),
            response_time_set: histogram!(
                "cache_request_duration_seconds",
                LABEL_OPERATION => OPERATION_SET,
                LABEL_CACHE => name.to_owned()
            ),
            response_time_delete: histogram!(
                "cache_request_duration_seconds",
                LABEL_OPERATION => OPERATION_DELETE,
                LABEL_CACHE => name.to_owned()
            ),
            hit_count: counter!("cache_hit_total", LABEL_CACHE => name.to_owned()),
            miss_count: counter!("cache_miss_total", LABEL_CACHE => name.to_owned()),
            expired_count: counter!("cache_expired_total", LABEL_CACHE => name.to_owned()),
            item_count: gauge!("cache_items_total", LABEL_CACHE => name.to_owned()),
        }
    }

    /// Handles that drop every observation.
    pub fn disabled() -> Self {
        Self {
            response_time_get: Histogram::noop(),
            response_time_set: Histogram::noop(),
            response_time_delete: Histogram::noop(),
            hit_count: Counter::noop(),
            miss_count: Counter::noop(),
            expired_count: Counter::noop(),
            item_count: Gauge::noop(),
        }
    }
}

/// Elapsed time since `started`, in seconds.
pub(crate) fn since_seconds(started: Instant) -> f64 {
    started.elapsed().as_secs_f64()
}
