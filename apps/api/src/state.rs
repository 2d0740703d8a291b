use std::sync::Arc;

use sqlx::PgPool;

use crate::analysis::analyzer::BidAnalyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// The bid analyzer, constructed once at startup with its prediction
    /// client. Stateless across calls; safe to share.
    pub analyzer: Arc<BidAnalyzer>,
    pub config: Config,
}
