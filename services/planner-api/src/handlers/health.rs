//! `GET /health`: liveness only, no database/storage dependency to probe
//! here — the elevation backend is the host's concern, not ours.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
