//! `POST /plan`: the request/response contract that replaces the
//! collaborator's `/path-planning` query-param endpoint with a JSON body,
//! keeping the same validation order and diagnostic fields.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use geo_primitives::{distance, lat_is_valid, lon_is_valid, Lla};
use incremental_planner::{ElevationSource, PathPlanner};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PointRequest {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub origin: PointRequest,
    pub terminus: PointRequest,
    #[serde(default)]
    pub alt: f64,
}

#[derive(Debug, Serialize)]
pub struct PointResponse {
    pub lon: f64,
    pub lat: f64,
    pub alt: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_alt: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct LlaResponse {
    pub lon: f64,
    pub lat: f64,
    pub alt: f64,
}

impl From<Lla> for LlaResponse {
    fn from(p: Lla) -> Self {
        Self {
            lon: p.lon,
            lat: p.lat,
            alt: p.alt,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub origin: PointResponse,
    pub target: PointResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<LlaResponse>>,
}

/// Picks the altitude of the sample nearest `(lon, lat)`, the "representative
/// altitude" the response reports for origin and terminus.
fn nearest_alt(samples: &[Lla], lon: f64, lat: f64) -> Option<f64> {
    samples
        .iter()
        .min_by(|a, b| {
            distance(lon, lat, a.lon, a.lat)
                .partial_cmp(&distance(lon, lat, b.lon, b.lat))
                .unwrap()
        })
        .map(|p| p.alt)
}

fn failed(
    tag: &'static str,
    message: impl Into<String>,
    origin: PointResponse,
    target: PointResponse,
) -> (StatusCode, Json<PlanResponse>) {
    let status_code = match tag {
        "invalid_parameters" => StatusCode::BAD_REQUEST,
        "distance_too_long" => StatusCode::BAD_REQUEST,
        _ => StatusCode::OK,
    };
    (
        status_code,
        Json(PlanResponse {
            status: "failed",
            error: Some(tag),
            message: Some(message.into()),
            origin,
            target,
            path: None,
        }),
    )
}

/// `POST /plan`
pub async fn plan_handler<S>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<PlanRequest>,
) -> (StatusCode, Json<PlanResponse>)
where
    S: ElevationSource + Clone,
{
    let bare_origin = PointResponse {
        lon: req.origin.lon,
        lat: req.origin.lat,
        alt: req.alt,
        query_alt: None,
    };
    let bare_target = PointResponse {
        lon: req.terminus.lon,
        lat: req.terminus.lat,
        alt: req.alt,
        query_alt: None,
    };

    let mut invalid = Vec::new();
    if !lon_is_valid(req.origin.lon) {
        invalid.push("origin.lon");
    }
    if !lat_is_valid(req.origin.lat) {
        invalid.push("origin.lat");
    }
    if !lon_is_valid(req.terminus.lon) {
        invalid.push("terminus.lon");
    }
    if !lat_is_valid(req.terminus.lat) {
        invalid.push("terminus.lat");
    }
    if !invalid.is_empty() {
        tracing::info!(?invalid, "rejecting plan request: invalid parameters");
        return failed(
            "invalid_parameters",
            format!("out of range: {}", invalid.join(", ")),
            bare_origin,
            bare_target,
        );
    }

    let dist_km = distance(req.origin.lon, req.origin.lat, req.terminus.lon, req.terminus.lat);
    if dist_km >= state.max_distance_km {
        tracing::info!(dist_km, limit = state.max_distance_km, "rejecting plan request: distance too long");
        return failed(
            "distance_too_long",
            format!("{dist_km:.3} km exceeds the {:.1} km limit", state.max_distance_km),
            bare_origin,
            bare_target,
        );
    }

    let origin = Lla::new(req.origin.lon, req.origin.lat, req.alt);
    let terminus = Lla::new(req.terminus.lon, req.terminus.lat, req.alt);

    let origin_samples = state.source.query(origin.lon, origin.lat, 3).await;
    let Some(origin_samples) = origin_samples else {
        tracing::info!(lon = origin.lon, lat = origin.lat, "no elevation data at origin");
        return failed(
            "no_elevation_data_origin",
            "no elevation data near the origin",
            bare_origin,
            bare_target,
        );
    };
    let origin_query_alt = nearest_alt(&origin_samples, origin.lon, origin.lat);

    let target_samples = state.source.query(terminus.lon, terminus.lat, 3).await;
    let target_query_alt = target_samples
        .as_ref()
        .and_then(|s| nearest_alt(s, terminus.lon, terminus.lat));

    let origin_point = PointResponse {
        lon: origin.lon,
        lat: origin.lat,
        alt: req.alt,
        query_alt: origin_query_alt,
    };
    let target_point = PointResponse {
        lon: terminus.lon,
        lat: terminus.lat,
        alt: req.alt,
        query_alt: target_query_alt,
    };

    tracing::info!(
        origin.lon = origin.lon,
        origin.lat = origin.lat,
        terminus.lon = terminus.lon,
        terminus.lat = terminus.lat,
        "planning path"
    );

    let mut planner = PathPlanner::new(state.source.clone());
    match planner.plan_paired_checked(&origin, &terminus, req.alt).await {
        Ok(path) => {
            tracing::info!(path_len = path.len(), "plan succeeded");
            let mut full_path = Vec::with_capacity(path.len() + 2);
            full_path.push(LlaResponse::from(Lla::new(origin.lon, origin.lat, req.alt)));
            full_path.extend(path.into_iter().map(LlaResponse::from));
            full_path.push(LlaResponse::from(Lla::new(terminus.lon, terminus.lat, req.alt)));

            (
                StatusCode::OK,
                Json(PlanResponse {
                    status: "success",
                    error: None,
                    message: None,
                    origin: origin_point,
                    target: target_point,
                    path: Some(full_path),
                }),
            )
        }
        Err(e) => {
            tracing::warn!(error = %e, tag = e.tag(), "plan failed");
            (
                StatusCode::OK,
                Json(PlanResponse {
                    status: "failed",
                    error: Some(e.tag()),
                    message: Some(e.to_string()),
                    origin: origin_point,
                    target: target_point,
                    path: None,
                }),
            )
        }
    }
}
