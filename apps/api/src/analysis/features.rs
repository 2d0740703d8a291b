//! Feature extraction — normalizes a raw BidDraft + ProjectSummary into the
//! numeric feature set the prediction service and the heuristic both consume.
//!
//! Every rule degrades instead of failing: non-numeric fields coerce to 0,
//! missing sections count as 0, an absent project falls back to a 500k
//! budget and the "unknown" category. Extraction never errors.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::models::bid::BidDraft;
use crate::models::project::{ProjectCategory, ProjectSummary};

/// Budget assumed when the project is absent or carries no usable budget.
pub const DEFAULT_PROJECT_BUDGET: f64 = 500_000.0;

/// Normalized analysis input. Serialized as-is into the prediction request.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureSet {
    pub bid_total: f64,
    pub materials_cost: f64,
    pub labor_cost: f64,
    pub equipment_cost: f64,
    pub overhead_cost: f64,
    pub timeline_days: u32,
    pub risk_score: u32,
    pub compliance_score: u32,
    pub profit_margin: f64,
    pub project_budget: f64,
    pub category: ProjectCategory,
}

pub fn extract_features(bid: &BidDraft, project: Option<&ProjectSummary>) -> FeatureSet {
    let project_budget = project
        .map(|p| p.budget)
        .filter(|b| *b > 0.0)
        .unwrap_or(DEFAULT_PROJECT_BUDGET);
    let category = project.map(|p| p.category).unwrap_or_default();

    FeatureSet {
        bid_total: coerce_amount(&bid.cost.total),
        materials_cost: coerce_amount(&bid.cost.materials),
        labor_cost: coerce_amount(&bid.cost.labor),
        equipment_cost: coerce_amount(&bid.cost.equipment),
        overhead_cost: coerce_amount(&bid.cost.overhead),
        timeline_days: timeline_days(
            bid.timeline.start_date.as_deref(),
            bid.timeline.completion_date.as_deref(),
        ),
        risk_score: list_len(&bid.risk_assessment.technical_risks),
        compliance_score: list_len(&bid.compliance.permits),
        profit_margin: coerce_amount(&bid.profitability.profit_margin),
        project_budget,
        category,
    }
}

/// Lenient numeric coercion: JSON numbers pass through, strings are trimmed
/// and parsed as f64, everything else (and NaN/inf) coerces to 0.
pub fn coerce_amount(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Entry count of a list-valued field; free text and absent fields count 0.
fn list_len(value: &Value) -> u32 {
    match value {
        Value::Array(items) => items.len() as u32,
        _ => 0,
    }
}

/// Whole days between the two dates, floored at 1 when both parse.
/// Missing or unparseable dates yield 0 (timeline unspecified).
fn timeline_days(start: Option<&str>, completion: Option<&str>) -> u32 {
    let (Some(start), Some(completion)) = (start, completion) else {
        return 0;
    };
    let (Some(start), Some(completion)) = (parse_date(start), parse_date(completion)) else {
        return 0;
    };
    (completion - start).num_days().max(1) as u32
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| chrono::DateTime::parse_from_rfc3339(s).ok().map(|d| d.date_naive()))
}
