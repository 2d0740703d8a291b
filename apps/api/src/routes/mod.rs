pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Bid Analysis API
        .route("/api/v1/bids/analyze", post(handlers::handle_analyze_bid))
        .route("/api/v1/bids", post(handlers::handle_submit_bid))
        .route("/api/v1/bids/:id", get(handlers::handle_get_bid))
        .route(
            "/api/v1/projects/:id/prefill",
            get(handlers::handle_prefill),
        )
        .with_state(state)
}
