//! LRU+TTL cache wrapping an [`ElevationSource`], keyed by a
//! geographic-precision-quantized coordinate so nearby queries share a
//! cache entry.

use std::num::NonZeroUsize;

use chrono::{DateTime, Duration, Utc};
use geo_primitives::Lla;
use lru::LruCache;
use tokio::sync::Mutex;

use crate::source::ElevationSource;

/// Default cache key quantization: ~500m at the equator.
pub const DEFAULT_PRECISION_DEGREES: f64 = 0.005;
/// Default cache entry lifetime.
pub const DEFAULT_TTL_SECONDS: i64 = 300;
/// Default maximum number of cached entries (including negative results).
pub const DEFAULT_CACHE_SIZE: usize = 1000;

type CacheKey = (i64, i64, usize);

struct Entry {
    value: Option<Vec<Lla>>,
    inserted_at: DateTime<Utc>,
}

struct Inner {
    cache: LruCache<CacheKey, Entry>,
    hits: u64,
    misses: u64,
}

/// Wraps any [`ElevationSource`] with a mutex-guarded LRU+TTL cache. Caches
/// negative lookups (`None`) too, so a point with no data doesn't get
/// re-queried every time a greedy walk revisits its neighborhood.
pub struct ElevationCache<S> {
    inner_source: S,
    state: Mutex<Inner>,
    precision: f64,
    ttl: Duration,
}

/// Snapshot of cache hit/miss counters, for monitoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub cache_size: usize,
    pub hit_count: u64,
    pub miss_count: u64,
    pub hit_rate: f64,
}

impl<S: ElevationSource> ElevationCache<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(
            source,
            DEFAULT_CACHE_SIZE,
            DEFAULT_TTL_SECONDS,
            DEFAULT_PRECISION_DEGREES,
        )
    }

    pub fn with_config(source: S, cache_size: usize, ttl_seconds: i64, precision: f64) -> Self {
        let capacity = NonZeroUsize::new(cache_size.max(1)).expect("cache_size.max(1) is never zero");
        Self {
            inner_source: source,
            state: Mutex::new(Inner {
                cache: LruCache::new(capacity),
                hits: 0,
                misses: 0,
            }),
            precision,
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    fn make_key(&self, lon: f64, lat: f64, size: usize) -> CacheKey {
        let lon_q = (lon / self.precision).round() as i64;
        let lat_q = (lat / self.precision).round() as i64;
        (lon_q, lat_q, size)
    }

    pub async fn query(&self, lon: f64, lat: f64, size: usize) -> Option<Vec<Lla>> {
        let key = self.make_key(lon, lat, size);
        let now = Utc::now();

        {
            let mut state = self.state.lock().await;
            if let Some(entry) = state.cache.get(&key) {
                if now - entry.inserted_at < self.ttl {
                    state.hits += 1;
                    tracing::debug!(lon, lat, "elevation cache hit");
                    return entry.value.clone();
                }
                state.cache.pop(&key);
            }
            state.misses += 1;
        }

        tracing::debug!(lon, lat, "elevation cache miss");
        let result = self.inner_source.query(lon, lat, size).await;

        let mut state = self.state.lock().await;
        state.cache.put(
            key,
            Entry {
                value: result.clone(),
                inserted_at: now,
            },
        );
        result
    }

    pub async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        let total = state.hits + state.misses;
        let hit_rate = if total > 0 {
            state.hits as f64 / total as f64
        } else {
            0.0
        };
        CacheStats {
            cache_size: state.cache.len(),
            hit_count: state.hits,
            miss_count: state.misses,
            hit_rate,
        }
    }
}

#[async_trait::async_trait]
impl<S: ElevationSource> ElevationSource for ElevationCache<S> {
    async fn query(&self, lon: f64, lat: f64, size: usize) -> Option<Vec<Lla>> {
        ElevationCache::query(self, lon, lat, size).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        result: Option<Vec<Lla>>,
    }

    #[async_trait::async_trait]
    impl ElevationSource for CountingSource {
        async fn query(&self, _lon: f64, _lat: f64, _size: usize) -> Option<Vec<Lla>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn repeated_nearby_queries_hit_the_cache() {
        let source = CountingSource {
            calls: AtomicUsize::new(0),
            result: Some(vec![Lla::new(100.0, 30.0, 1.0)]),
        };
        let cache = ElevationCache::new(source);

        cache.query(100.0, 30.0, 3).await;
        cache.query(100.0001, 30.0001, 3).await; // rounds to the same key
        cache.query(100.0, 30.0, 3).await;

        assert_eq!(cache.inner_source.calls.load(Ordering::SeqCst), 1);
        let stats = cache.stats().await;
        assert_eq!(stats.hit_count, 2);
        assert_eq!(stats.miss_count, 1);
    }

    #[tokio::test]
    async fn negative_results_are_cached_too() {
        let source = CountingSource {
            calls: AtomicUsize::new(0),
            result: None,
        };
        let cache = ElevationCache::new(source);

        assert!(cache.query(0.0, 0.0, 3).await.is_none());
        assert!(cache.query(0.0, 0.0, 3).await.is_none());
        assert_eq!(cache.inner_source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn distinct_cells_miss_independently() {
        let source = CountingSource {
            calls: AtomicUsize::new(0),
            result: Some(vec![Lla::new(0.0, 0.0, 1.0)]),
        };
        let cache = ElevationCache::new(source);

        cache.query(0.0, 0.0, 3).await;
        cache.query(10.0, 10.0, 3).await;
        assert_eq!(cache.inner_source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn expired_entries_are_requeried() {
        let source = CountingSource {
            calls: AtomicUsize::new(0),
            result: Some(vec![Lla::new(0.0, 0.0, 1.0)]),
        };
        let cache = ElevationCache::with_config(source, 1000, -1, DEFAULT_PRECISION_DEGREES);

        cache.query(0.0, 0.0, 3).await;
        cache.query(0.0, 0.0, 3).await;
        // ttl_seconds = -1 means every entry is already expired on lookup
        assert_eq!(cache.inner_source.calls.load(Ordering::SeqCst), 2);
    }
}
