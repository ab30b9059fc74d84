//! Shared application state: one long-lived cached elevation source behind
//! an `Arc`, cloned cheaply into a fresh [`incremental_planner::PathPlanner`]
//! per request. No other mutable state is shared across requests — the
//! planner's own `visited_origins` and grid live entirely inside one call.

use std::sync::Arc;

use incremental_planner::{ElevationCache, ElevationSource};

use crate::config::PlannerConfig;
use crate::http_source::HttpElevationSource;

/// Cheaply-clonable handle to the shared cache, so each request can hand
/// its own [`incremental_planner::PathPlanner`] an owned collaborator
/// without needing `PathPlanner` to know about `Arc` or mutexes.
#[derive(Clone)]
pub struct SharedSource(Arc<ElevationCache<HttpElevationSource>>);

#[async_trait::async_trait]
impl ElevationSource for SharedSource {
    async fn query(&self, lon: f64, lat: f64, size: usize) -> Option<Vec<geo_primitives::Lla>> {
        self.0.query(lon, lat, size).await
    }
}

/// Generic over the collaborator so integration tests can swap in a mock
/// `ElevationSource` without spinning up a real HTTP backend.
pub struct AppState<S> {
    pub source: S,
    pub max_distance_km: f64,
}

impl AppState<SharedSource> {
    pub fn new(config: &PlannerConfig) -> Self {
        let backend = HttpElevationSource::new(
            &config.query_host,
            config.query_port,
            &config.query_path,
            config.query_timeout_secs,
        );
        let cache = ElevationCache::with_config(
            backend,
            config.cache_size,
            config.cache_ttl_secs,
            config.cache_precision_degrees,
        );
        Self {
            source: SharedSource(Arc::new(cache)),
            max_distance_km: config.max_distance_km,
        }
    }
}
