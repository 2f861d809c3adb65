//! Weightlog API Server
//!
//! Run with: cargo run --bin weightlog-api
//!
//! # Configuration
//!
//! Loaded from a TOML file (see `weightlog-cli config`) with environment
//! overrides:
//! - `WEIGHTLOG_DATA_DIR`: Data directory for the SQLite file
//! - `WEIGHTLOG_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `WEIGHTLOG_API_PORT`: Port to listen on (default: 8090)
//! - `WEIGHTLOG_LOG_LEVEL` / `WEIGHTLOG_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Overrides the log filter entirely when set

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weightlog::api::{serve, ApiConfig, AppState};
use weightlog::config::Config;
use weightlog::storage::WeightStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_default();

    init_tracing(&config);

    tracing::info!("Starting Weightlog API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Data directory: {}", config.storage.data_dir);

    // Open the store once; every request reuses this handle
    let db_path = config.storage.db_path();
    let store = Arc::new(WeightStore::open(&db_path)?);
    tracing::info!("Weight store opened at {:?} ({} entries)", db_path, store.count()?);

    let api_config = ApiConfig {
        host: config.api.host.clone(),
        port: config.api.port,
        request_timeout_ms: config.api.request_timeout_secs * 1000,
    };

    let state = AppState::new(Arc::clone(&store), api_config.clone());

    tracing::info!("Starting server on {}", api_config.addr());
    serve(state, &api_config).await?;

    tracing::info!("Weightlog API server stopped");
    Ok(())
}

/// Initialize tracing from the logging config
fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "weightlog={},tower_http=debug",
            config.logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
