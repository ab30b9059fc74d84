//! Planner API server entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use planner_api::config::PlannerConfig;
use planner_api::state::AppState;

/// Geodetic path planner HTTP server.
#[derive(Parser, Debug)]
#[command(name = "planner-api")]
#[command(about = "Incremental geodetic path planner over a queryable elevation backend")]
struct Args {
    /// Path to a YAML config file. Missing is not an error — defaults apply.
    #[arg(long, default_value = "config/planner.yaml", env = "PLANNER_CONFIG")]
    config: PathBuf,

    /// Overrides the config file's listen address.
    #[arg(long, env = "PLANNER_LISTEN_ADDR")]
    listen_addr: Option<String>,

    /// Overrides the config file's elevation backend host.
    #[arg(long, env = "PLANNER_QUERY_HOST")]
    query_host: Option<String>,

    /// Overrides the config file's elevation backend port.
    #[arg(long, env = "PLANNER_QUERY_PORT")]
    query_port: Option<u16>,

    /// Overrides the config file's origin-terminus distance cap, in km.
    #[arg(long, env = "PLANNER_MAX_DISTANCE_KM")]
    max_distance_km: Option<f64>,

    /// Overrides the config file's log level.
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = PlannerConfig::load(&args.config).unwrap_or_else(|e| {
        eprintln!("failed to load config {}: {e}", args.config.display());
        std::process::exit(1);
    });

    if let Some(listen_addr) = args.listen_addr {
        config.listen_addr = listen_addr;
    }
    if let Some(query_host) = args.query_host {
        config.query_host = query_host;
    }
    if let Some(query_port) = args.query_port {
        config.query_port = query_port;
    }
    if let Some(max_distance_km) = args.max_distance_km {
        config.max_distance_km = max_distance_km;
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    fmt().with_env_filter(filter).with_target(true).with_level(true).init();

    info!(query_host = %config.query_host, query_port = config.query_port, "starting planner-api");

    let state = Arc::new(AppState::new(&config));
    let app = planner_api::build_router(state);

    let addr: SocketAddr = config.listen_addr.parse().expect("invalid listen address");
    info!(%addr, "planner-api listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listen address");
    axum::serve(listener, app).await.expect("server failed");
}
