//! Wilin - dictionary backend account and permission service

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod bootstrap;
mod config;

use config::{Config, LoggingConfig};
use wilin_api::{AppState, create_router};
use wilin_auth::{JwtManager, password};
use wilin_db::Database;

/// Wilin - dictionary backend account and permission service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "WILIN_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "WILIN_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)?;

    init_logging(&config.logging);

    info!("Starting Wilin v{}", env!("CARGO_PKG_VERSION"));

    let jwt = Arc::new(JwtManager::from_env());

    // Pay for the decoy hash before the first failed login does
    tokio::task::spawn_blocking(password::init_decoy).await?;

    if let Some(parent) = Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let db_url = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_url).await?;

    bootstrap::ensure_admin(&db, config.auth.bootstrap_admin.as_ref()).await?;

    let state = AppState::new(
        db,
        jwt,
        Duration::from_millis(config.auth.lookup_timeout_ms),
    );

    let metrics_handle = if config.metrics.enabled {
        let handle = PrometheusBuilder::new().install_recorder()?;
        info!("Metrics exposed at /metrics");
        Some(Arc::new(handle))
    } else {
        None
    };

    let app = create_router(state, metrics_handle).layer(TraceLayer::new_for_http());

    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
