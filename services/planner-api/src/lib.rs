//! HTTP surface for the incremental geodetic path planner: request
//! validation, an HTTP-backed cached elevation collaborator, and the
//! `/plan`/`/health` routes.

pub mod config;
pub mod handlers;
pub mod http_source;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use incremental_planner::ElevationSource;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Builds the router, generic over the elevation collaborator so
/// integration tests can mount it against a mock `ElevationSource` instead
/// of the production HTTP-backed one.
pub fn build_router<S>(state: Arc<AppState<S>>) -> Router
where
    S: ElevationSource + Clone + 'static,
{
    Router::new()
        .route("/plan", post(handlers::plan::plan_handler::<S>))
        .route("/health", get(handlers::health::health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
