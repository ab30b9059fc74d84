//! The elevation query collaborator the planner drives between searches.

use geo_primitives::Lla;

/// An external source of elevation samples around a geographic point. The
/// only suspension point in a plan: everything else (ingestion, search,
/// merging) is synchronous and CPU-bound.
///
/// Returns `None` for "no data near this point" — the planner treats that
/// as fatal for the current origin, never as an empty-but-successful
/// result.
#[async_trait::async_trait]
pub trait ElevationSource: Send + Sync {
    async fn query(&self, lon: f64, lat: f64, size: usize) -> Option<Vec<Lla>>;
}
