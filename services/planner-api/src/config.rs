//! Configuration loading: a YAML base file overridden by environment
//! variables and CLI flags, via a typed config struct with
//! `#[serde(default = ...)]` knobs per field.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

fn default_listen() -> String {
    "0.0.0.0:8025".to_string()
}

fn default_query_host() -> String {
    "127.0.0.1".to_string()
}

fn default_query_port() -> u16 {
    8025
}

fn default_query_path() -> String {
    "free/tinder/v3/box2/query".to_string()
}

fn default_query_timeout_secs() -> u64 {
    5
}

fn default_max_distance_km() -> f64 {
    50.0
}

fn default_cache_size() -> usize {
    1000
}

fn default_cache_ttl_secs() -> i64 {
    300
}

fn default_cache_precision_degrees() -> f64 {
    0.005
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Root service configuration. Every field has a default so a config file
/// is optional; values present in it override the defaults, and
/// environment variables (wired in [`crate::Args`]) override those.
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_listen")]
    pub listen_addr: String,

    #[serde(default = "default_query_host")]
    pub query_host: String,
    #[serde(default = "default_query_port")]
    pub query_port: u16,
    #[serde(default = "default_query_path")]
    pub query_path: String,
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,

    #[serde(default = "default_max_distance_km")]
    pub max_distance_km: f64,

    #[serde(default = "default_cache_size")]
    pub cache_size: usize,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: i64,
    #[serde(default = "default_cache_precision_degrees")]
    pub cache_precision_degrees: f64,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen(),
            query_host: default_query_host(),
            query_port: default_query_port(),
            query_path: default_query_path(),
            query_timeout_secs: default_query_timeout_secs(),
            max_distance_km: default_max_distance_km(),
            cache_size: default_cache_size(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_precision_degrees: default_cache_precision_degrees(),
            log_level: default_log_level(),
        }
    }
}

impl PlannerConfig {
    /// Loads a YAML config file if `path` exists, falling back to defaults
    /// otherwise — a missing config file is not an error, matching the
    /// teacher's treatment of optional per-model YAML files.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let cfg = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let cfg = PlannerConfig::load(Path::new("/nonexistent/planner.yaml")).unwrap();
        assert_eq!(cfg.listen_addr, "0.0.0.0:8025");
        assert_eq!(cfg.max_distance_km, 50.0);
    }

    #[test]
    fn partial_yaml_overrides_only_given_fields() {
        let yaml = "listen_addr: \"127.0.0.1:9000\"\nmax_distance_km: 10.0\n";
        let cfg: PlannerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.listen_addr, "127.0.0.1:9000");
        assert_eq!(cfg.max_distance_km, 10.0);
        assert_eq!(cfg.query_host, "127.0.0.1");
        assert_eq!(cfg.cache_size, 1000);
    }
}
