//! Bagwatch Monitor Server
//!
//! Serves live-looking blood bag health snapshots over HTTP for the dashboard.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    BAGWATCH SERVER                       │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌───────────┐        ┌───────────────────────────────┐  │
//! │  │  HTTP     │  lock  │  MonitorEngine                │  │
//! │  │  (Axum)   │ ─────► │  replay → features → model    │  │
//! │  └───────────┘        └──────────────┬────────────────┘  │
//! │                                      ▼                   │
//! │                          ┌──────────────────────┐        │
//! │                          │ History ledger (JSON)│        │
//! │                          └──────────────────────┘        │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;


use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{http::HeaderValue, routing::get, Router};
use parking_lot::Mutex;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bagwatch_core::{JsonFileStore, MonitorEngine, OnnxPredictor, TelemetryDataset};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize logging (engine `log` records are bridged into tracing)
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "bagwatch_server=debug,bagwatch_core=info,tower_http=debug".into()))
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    let config = config::Config::from_env();

    tracing::info!("Bagwatch server starting...");
    tracing::info!("Dataset: {}", config.data_path.display());
    tracing::info!("Model: {}", config.model_path.display());

    let dataset = TelemetryDataset::load(&config.data_path)
        .with_context(|| format!("Failed to load dataset {}", config.data_path.display()))?;

    let predictor = OnnxPredictor::load(&config.model_path)
        .with_context(|| format!("Failed to load model {}", config.model_path.display()))?;

    let store = JsonFileStore::new(&config.history_path);
    let engine = MonitorEngine::new(
        config.engine.clone(),
        dataset,
        Box::new(predictor),
        Box::new(store),
    );

    // Build application state
    let state = AppState::new(engine, config.clone());
    let engine = Arc::clone(&state.engine);

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Persist anything a manual flush policy held back
    if let Err(e) = engine.lock().flush() {
        tracing::error!("Failed to flush history on shutdown: {}", e);
    }
    tracing::info!("Graceful shutdown complete");

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Single owner of all bag state; at most one tick runs at a time
    pub engine: Arc<Mutex<MonitorEngine>>,
    pub config: config::Config,
}

impl AppState {
    pub fn new(engine: MonitorEngine, config: config::Config) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            config,
        }
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/snapshot", get(handlers::snapshot::snapshot))
        .route("/bags", get(handlers::bags::list))
        .route("/history/:bag_id", get(handlers::bags::history))
        .route("/status", get(handlers::bags::status))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &config::Config) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    match config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!("Invalid CORS_ORIGIN {:?}, cross-origin requests disabled", config.cors_origin);
            layer
        }
    }
}

/// Resolve on SIGINT, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
