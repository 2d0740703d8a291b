//! Prediction service client — the single point of entry for the external
//! ML scoring API. No other module may call it directly.
//!
//! The contract is deliberately unforgiving: one attempt, no retry. Any
//! transport failure, non-2xx status, error-flagged body, or out-of-range
//! payload is an error, and the analyzer treats every error identically by
//! falling through to the heuristic path.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::analysis::features::FeatureSet;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("prediction service returned status {0}")]
    Status(u16),

    #[error("prediction service error: {0}")]
    Service(String),

    #[error("malformed prediction response: {0}")]
    Malformed(String),
}

/// A validated prediction: win probability in [0,1] and a binary outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MlPrediction {
    pub probability: f64,
    pub prediction: u8,
}

/// The prediction backend seam. `HttpPredictor` is the real one;
/// tests substitute a double that returns canned results.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, features: &FeatureSet) -> Result<MlPrediction, PredictError>;
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    features: &'a FeatureSet,
}

/// Raw wire response. The service signals failure in-band with an `error`
/// field rather than a status code, so every field is optional until
/// validated.
#[derive(Debug, Deserialize)]
struct RawPrediction {
    probability: Option<f64>,
    prediction: Option<i64>,
    error: Option<String>,
}

impl RawPrediction {
    fn validate(self) -> Result<MlPrediction, PredictError> {
        if let Some(message) = self.error {
            return Err(PredictError::Service(message));
        }
        let probability = self
            .probability
            .ok_or_else(|| PredictError::Malformed("missing probability".to_string()))?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(PredictError::Malformed(format!(
                "probability {probability} outside [0,1]"
            )));
        }
        let prediction = self
            .prediction
            .ok_or_else(|| PredictError::Malformed("missing prediction".to_string()))?;
        if prediction != 0 && prediction != 1 {
            return Err(PredictError::Malformed(format!(
                "prediction {prediction} is not binary"
            )));
        }
        Ok(MlPrediction {
            probability,
            prediction: prediction as u8,
        })
    }
}

/// HTTP client for the prediction service. The timeout bounds the only
/// suspension point in the analysis flow; expiry reads as a transport error.
#[derive(Clone)]
pub struct HttpPredictor {
    client: Client,
    base_url: String,
}

impl HttpPredictor {
    pub fn new(base_url: String, timeout: std::time::Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(&self, features: &FeatureSet) -> Result<MlPrediction, PredictError> {
        let response = self
            .client
            .post(format!("{}/predict", self.base_url))
            .json(&PredictRequest { features })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictError::Status(status.as_u16()));
        }

        let raw: RawPrediction = response
            .json()
            .await
            .map_err(|e| PredictError::Malformed(e.to_string()))?;

        let prediction = raw.validate()?;
        debug!(
            "prediction service: probability={:.3} prediction={}",
            prediction.probability, prediction.prediction
        );
        Ok(prediction)
    }
}
