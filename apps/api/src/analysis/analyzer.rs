//! Bid Competitiveness Analyzer — the dual-path scoring flow.
//!
//! Primary path: delegate to the external prediction service. Fallback:
//! the local heuristic. The selection is a single fallibility check on
//! the predictor call; the caller always gets a usable `AnalysisResult`,
//! never an error.
//!
//! `AppState` holds the analyzer as `Arc<BidAnalyzer>` with the predictor
//! injected behind `Arc<dyn Predictor>`, so tests swap in a double.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::features::extract_features;
use crate::analysis::heuristic::heuristic_analysis;
use crate::analysis::predictor::{MlPrediction, Predictor};
use crate::models::bid::BidDraft;
use crate::models::project::ProjectSummary;

// ────────────────────────────────────────────────────────────────────────────
// Output value objects (shared across both scoring paths)
// ────────────────────────────────────────────────────────────────────────────

/// The analysis attached to a bid and shown in the submission UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub competitiveness_score: u32, // 0 – 100
    pub recommendations: Vec<String>,
    pub risk_alerts: Vec<String>,
    pub cost_optimization: CostOptimization,
    pub market_comparison: MarketComparison,
}

/// Empty on the prediction path; serializes as `{}` there.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CostOptimization {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_savings: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

/// Empty on the prediction path; serializes as `{}` there.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketComparison {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_bid_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub your_position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win_probability: Option<u32>, // 65 – 90 on the heuristic path
}

// ────────────────────────────────────────────────────────────────────────────
// Analyzer
// ────────────────────────────────────────────────────────────────────────────

pub struct BidAnalyzer {
    predictor: Arc<dyn Predictor>,
}

impl BidAnalyzer {
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self { predictor }
    }

    /// Scores a bid draft against its project. Infallible: any predictor
    /// failure selects the heuristic path instead of surfacing.
    pub async fn analyze(&self, project: Option<&ProjectSummary>, bid: &BidDraft) -> AnalysisResult {
        let features = extract_features(bid, project);

        match self.predictor.predict(&features).await {
            Ok(prediction) => prediction_analysis(&prediction),
            Err(e) => {
                debug!("prediction service unavailable, falling back to heuristic: {e}");
                heuristic_analysis(&features, &mut rand::thread_rng())
            }
        }
    }
}

/// Maps a service prediction onto the result shape. The advisory sections
/// stay empty on this path; only the score and two fixed recommendations
/// come back. Asymmetric with the heuristic path on purpose.
fn prediction_analysis(prediction: &MlPrediction) -> AnalysisResult {
    let verdict = if prediction.prediction == 1 {
        "Your bid is likely to win. Maintain your strategy!"
    } else {
        "Your bid may not be competitive. Consider optimizing costs or timeline."
    };

    AnalysisResult {
        competitiveness_score: (prediction.probability * 100.0).round() as u32,
        recommendations: vec![
            verdict.to_string(),
            "ML-based recommendation: Review risk and compliance factors.".to_string(),
        ],
        risk_alerts: Vec::new(),
        cost_optimization: CostOptimization::default(),
        market_comparison: MarketComparison::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::features::FeatureSet;
    use crate::analysis::predictor::PredictError;
    use crate::models::project::ProjectCategory;
    use async_trait::async_trait;
    use serde_json::json;

    struct FixedPredictor(MlPrediction);

    #[async_trait]
    impl Predictor for FixedPredictor {
        async fn predict(&self, _features: &FeatureSet) -> Result<MlPrediction, PredictError> {
            Ok(self.0)
        }
    }

    struct DownPredictor;

    #[async_trait]
    impl Predictor for DownPredictor {
        async fn predict(&self, _features: &FeatureSet) -> Result<MlPrediction, PredictError> {
            Err(PredictError::Status(503))
        }
    }

    fn sample_bid() -> BidDraft {
        serde_json::from_value(json!({ "cost": { "total": "425000" } })).unwrap()
    }

    fn sample_project() -> ProjectSummary {
        ProjectSummary {
            budget: 500_000.0,
            category: ProjectCategory::Infrastructure,
        }
    }

    #[tokio::test]
    async fn test_prediction_path_shape() {
        let analyzer = BidAnalyzer::new(Arc::new(FixedPredictor(MlPrediction {
            probability: 0.82,
            prediction: 1,
        })));

        let result = analyzer.analyze(Some(&sample_project()), &sample_bid()).await;
        assert_eq!(result.competitiveness_score, 82);
        assert_eq!(result.recommendations.len(), 2);
        assert!(result.recommendations[0].contains("likely to win"));
        assert!(result.risk_alerts.is_empty());

        // Advisory sections serialize as empty objects on this path
        let v = serde_json::to_value(&result).unwrap();
        assert_eq!(v["costOptimization"], json!({}));
        assert_eq!(v["marketComparison"], json!({}));
    }

    #[tokio::test]
    async fn test_losing_prediction_swaps_verdict() {
        let analyzer = BidAnalyzer::new(Arc::new(FixedPredictor(MlPrediction {
            probability: 0.31,
            prediction: 0,
        })));

        let result = analyzer.analyze(Some(&sample_project()), &sample_bid()).await;
        assert_eq!(result.competitiveness_score, 31);
        assert!(result.recommendations[0].contains("may not be competitive"));
    }

    #[tokio::test]
    async fn test_failed_prediction_falls_back_to_heuristic() {
        let analyzer = BidAnalyzer::new(Arc::new(DownPredictor));

        let result = analyzer.analyze(Some(&sample_project()), &sample_bid()).await;
        // 425000 / 500000 = 0.85 band
        assert_eq!(result.competitiveness_score, 85);
        assert!(result.recommendations.len() >= 3);
        assert!(result.risk_alerts.len() >= 3);
        assert!(result.cost_optimization.potential_savings.is_some());
        let p = result.market_comparison.win_probability.unwrap();
        assert!((65..90).contains(&p));
    }

    #[tokio::test]
    async fn test_missing_project_defaults() {
        let analyzer = BidAnalyzer::new(Arc::new(DownPredictor));

        let result = analyzer.analyze(None, &sample_bid()).await;
        // 425000 / 500000 default budget = 0.85 band; unknown category
        // contributes only the three universal recommendations.
        assert_eq!(result.competitiveness_score, 85);
        assert_eq!(result.recommendations.len(), 3);
    }

    #[tokio::test]
    async fn test_score_always_in_bounds() {
        for (probability, expected) in [(0.0, 0), (0.004, 0), (0.996, 100), (1.0, 100)] {
            let analyzer = BidAnalyzer::new(Arc::new(FixedPredictor(MlPrediction {
                probability,
                prediction: 1,
            })));
            let result = analyzer.analyze(None, &BidDraft::default()).await;
            assert_eq!(result.competitiveness_score, expected);
        }
    }
}
