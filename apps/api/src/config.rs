use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Base URL of the external prediction service.
    pub ml_api_url: String,
    /// Timeout for the single prediction attempt. Expiry falls back to
    /// the heuristic path like any other transport failure.
    pub ml_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            ml_api_url: std::env::var("ML_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            ml_timeout_secs: std::env::var("ML_TIMEOUT_SECS")
                .unwrap_or_else(|_| "3".to_string())
                .parse::<u64>()
                .context("ML_TIMEOUT_SECS must be a number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
