use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A bid draft as the submission form builds it up. Every leaf is lenient:
/// cost figures arrive as JSON strings or numbers, risk/compliance sections
/// as free text or lists, and any section may be missing entirely. Feature
/// extraction coerces what it needs and ignores the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BidDraft {
    pub cost: CostBreakdown,
    pub timeline: BidTimeline,
    pub risk_assessment: RiskAssessment,
    pub compliance: Compliance,
    pub profitability: Profitability,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CostBreakdown {
    pub materials: Value,
    pub labor: Value,
    pub equipment: Value,
    pub overhead: Value,
    pub total: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BidTimeline {
    pub start_date: Option<String>,
    pub completion_date: Option<String>,
    pub phases: Value,
    pub milestones: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskAssessment {
    pub technical_risks: Value,
    pub financial_risks: Value,
    pub timeline_risks: Value,
    pub mitigation_strategies: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Compliance {
    pub permits: Value,
    pub regulations: Value,
    pub standards: Value,
    pub certifications: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profitability {
    pub profit_margin: Value,
    pub roi: Value,
    pub breakeven: Value,
    pub contingency: Value,
}

/// Persisted bid. The draft and its analysis are stored as opaque JSONB —
/// the analyzer owns their shape, the schema does not.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BidRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub bid_data: Value,
    pub analysis: Value,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_draft_deserializes_with_all_sections_missing() {
        let draft: BidDraft = serde_json::from_str("{}").unwrap();
        assert!(draft.cost.total.is_null());
        assert!(draft.timeline.start_date.is_none());
    }

    #[test]
    fn test_draft_accepts_string_and_numeric_costs() {
        let draft: BidDraft = serde_json::from_value(json!({
            "cost": { "total": "425000", "materials": 170000 }
        }))
        .unwrap();
        assert_eq!(draft.cost.total, json!("425000"));
        assert_eq!(draft.cost.materials, json!(170000));
        assert!(draft.cost.labor.is_null());
    }

    #[test]
    fn test_draft_roundtrips_camel_case() {
        let draft: BidDraft = serde_json::from_value(json!({
            "riskAssessment": { "technicalRisks": ["soil", "weather"] },
            "profitability": { "profitMargin": "15" }
        }))
        .unwrap();
        let out = serde_json::to_value(&draft).unwrap();
        assert_eq!(out["riskAssessment"]["technicalRisks"], json!(["soil", "weather"]));
        assert_eq!(out["profitability"]["profitMargin"], json!("15"));
    }
}
