//! An [`ElevationSource`] backed by an HTTP elevation-query backend,
//! grounded in the collaborator's own `QueryHelper`/`AsyncQueryHelper`:
//! `GET {server}{path}?lon=..&lat=..&size=..` returning `{"data": [...]}`.

use geo_primitives::Lla;
use incremental_planner::ElevationSource;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RawPoint {
    lon: f64,
    lat: f64,
    #[serde(default)]
    alt: f64,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    data: Vec<RawPoint>,
}

/// Queries an external elevation backend over HTTP. A request or parse
/// failure is treated as "no data" — the planner has no finer-grained way
/// to distinguish a network hiccup from a genuinely empty region, matching
/// the collaborator's own behavior.
pub struct HttpElevationSource {
    client: reqwest::Client,
    base_url: String,
    path: String,
}

impl HttpElevationSource {
    pub fn new(host: &str, port: u16, path: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("reqwest client configuration is static and always valid");
        Self {
            client,
            base_url: format!("http://{host}:{port}/"),
            path: path.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ElevationSource for HttpElevationSource {
    async fn query(&self, lon: f64, lat: f64, size: usize) -> Option<Vec<Lla>> {
        let url = format!("{}{}", self.base_url, self.path);
        let result = self
            .client
            .get(&url)
            .query(&[("lon", lon), ("lat", lat)])
            .query(&[("size", size)])
            .send()
            .await;

        let response = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, lon, lat, "elevation query request failed");
                return None;
            }
        };

        let parsed: Result<QueryResponse, _> = response.json().await;
        match parsed {
            Ok(body) if body.data.is_empty() => None,
            Ok(body) => Some(
                body.data
                    .into_iter()
                    .map(|p| Lla::new(p.lon, p.lat, p.alt))
                    .collect(),
            ),
            Err(e) => {
                tracing::warn!(error = %e, lon, lat, "elevation query response parse failed");
                None
            }
        }
    }
}
