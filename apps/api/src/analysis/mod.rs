// Bid Competitiveness Analyzer.
// Implements: feature extraction, prediction-service dispatch, heuristic
// fallback scoring, advisory generation, bid prefill.
// All prediction-service calls go through predictor — no direct HTTP here.

pub mod analyzer;
pub mod features;
pub mod handlers;
pub mod heuristic;
pub mod predictor;
pub mod prefill;
