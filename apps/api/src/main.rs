mod analysis;
mod config;
mod db;
mod errors;
mod models;
mod routes;
mod state;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::BidAnalyzer;
use crate::analysis::predictor::HttpPredictor;
use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Bid Analysis API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize the prediction-service client and analyzer
    let predictor = HttpPredictor::new(
        config.ml_api_url.clone(),
        Duration::from_secs(config.ml_timeout_secs),
    );
    let analyzer = Arc::new(BidAnalyzer::new(Arc::new(predictor)));
    info!(
        "Bid analyzer initialized (prediction service: {}, timeout: {}s)",
        config.ml_api_url, config.ml_timeout_secs
    );

    // Build app state
    let state = AppState {
        db,
        analyzer,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
