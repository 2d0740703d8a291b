//! Bid prefill — drafts a complete starting bid for a project so the
//! contractor edits instead of typing from scratch.
//!
//! Costs anchor at 85% of the project budget, split 40/35/15/10 across
//! materials, labor, equipment and overhead. The timeline starts two weeks
//! out and completes one week before the project deadline. Narrative
//! sections (phases, risks, permits, standards) are category-conditioned
//! templates. Deterministic given `today`, which callers inject.

use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};

use crate::models::bid::{
    BidDraft, BidTimeline, Compliance, CostBreakdown, Profitability, RiskAssessment,
};
use crate::models::project::{ProjectCategory, ProjectRow};

const TOTAL_BUDGET_SHARE: f64 = 0.85;
const MATERIALS_SHARE: f64 = 0.40;
const LABOR_SHARE: f64 = 0.35;
const EQUIPMENT_SHARE: f64 = 0.15;
const OVERHEAD_SHARE: f64 = 0.10;

const START_LEAD_DAYS: i64 = 14;
const COMPLETION_BUFFER_DAYS: i64 = 7;

pub fn build_prefill(project: &ProjectRow, today: NaiveDate) -> BidDraft {
    let category = ProjectCategory::parse(&project.category);

    let estimated_total = project.budget * TOTAL_BUDGET_SHARE;
    let start_date = today + Duration::days(START_LEAD_DAYS);
    let completion_date = project
        .deadline
        .map(|d| d - Duration::days(COMPLETION_BUFFER_DAYS));

    // Days from the drafted start to the hard deadline; drives breakeven.
    let project_duration = project
        .deadline
        .map(|d| (d - start_date).num_days().max(0));

    BidDraft {
        cost: CostBreakdown {
            materials: rounded_amount(estimated_total * MATERIALS_SHARE),
            labor: rounded_amount(estimated_total * LABOR_SHARE),
            equipment: rounded_amount(estimated_total * EQUIPMENT_SHARE),
            overhead: rounded_amount(estimated_total * OVERHEAD_SHARE),
            total: rounded_amount(estimated_total),
        },
        timeline: BidTimeline {
            start_date: Some(start_date.format("%Y-%m-%d").to_string()),
            completion_date: completion_date.map(|d| d.format("%Y-%m-%d").to_string()),
            phases: json!(generate_phases(category)),
            milestones: json!(MILESTONES),
        },
        risk_assessment: RiskAssessment {
            technical_risks: json!(generate_technical_risks(category)),
            financial_risks: json!(
                "Material cost fluctuations, labor availability, equipment rental rates"
            ),
            timeline_risks: json!(
                "Weather delays, permit approval delays, supply chain disruptions"
            ),
            mitigation_strategies: json!(MITIGATION_STRATEGIES),
        },
        compliance: Compliance {
            permits: json!(generate_permits(category)),
            regulations: json!(REGULATIONS),
            standards: json!(generate_standards(category)),
            certifications: json!(
                "OSHA compliance, local building codes, environmental regulations"
            ),
        },
        profitability: Profitability {
            profit_margin: json!("15"),
            roi: json!("18"),
            breakeven: match project_duration {
                Some(days) => json!(format!("{} days", (days as f64 * 0.6).ceil() as i64)),
                None => Value::Null,
            },
            contingency: json!("10"),
        },
    }
}

/// Dollar figures land as whole-number strings, matching the form fields.
fn rounded_amount(amount: f64) -> Value {
    json!((amount.round() as i64).to_string())
}

const MILESTONES: [&str; 6] = [
    "Site mobilization and setup",
    "Foundation completion",
    "Structural work completion",
    "MEP rough-in completion",
    "Final inspections and approvals",
    "Project handover and documentation",
];

const MITIGATION_STRATEGIES: [&str; 6] = [
    "Conduct thorough site surveys and geotechnical analysis",
    "Establish relationships with multiple suppliers",
    "Implement weather contingency plans",
    "Regular quality control inspections",
    "Maintain buffer time in critical path activities",
    "Secure backup equipment and labor resources",
];

const REGULATIONS: [&str; 5] = [
    "Local building codes and zoning requirements",
    "OSHA safety regulations",
    "Environmental protection standards",
    "ADA compliance requirements",
    "Fire safety and life safety codes",
];

fn generate_phases(category: ProjectCategory) -> Vec<String> {
    let mut phases = vec![
        "Phase 1: Site preparation and permits (2-3 weeks)".to_string(),
        "Phase 2: Foundation and structural work (4-6 weeks)".to_string(),
    ];

    match category {
        ProjectCategory::Commercial | ProjectCategory::Industrial => {
            phases.push(
                "Phase 3: MEP (Mechanical, Electrical, Plumbing) installation (3-4 weeks)"
                    .to_string(),
            );
            phases.push("Phase 4: Interior finishing and systems testing (2-3 weeks)".to_string());
        }
        ProjectCategory::Residential => {
            phases.push("Phase 3: Framing and roofing (2-3 weeks)".to_string());
            phases.push("Phase 4: Interior finishing and final inspections (3-4 weeks)".to_string());
        }
        _ => {
            phases.push("Phase 3: Primary construction and installation (4-5 weeks)".to_string());
            phases.push("Phase 4: Testing, commissioning, and handover (2-3 weeks)".to_string());
        }
    }

    phases
}

fn generate_technical_risks(category: ProjectCategory) -> Vec<String> {
    let mut risks = vec!["Site conditions and soil stability".to_string()];

    if category == ProjectCategory::Infrastructure {
        risks.push("Utility conflicts and relocations".to_string());
        risks.push("Traffic management during construction".to_string());
    }

    if matches!(
        category,
        ProjectCategory::Commercial | ProjectCategory::Industrial
    ) {
        risks.push("Complex MEP system integration".to_string());
        risks.push("Specialized equipment installation".to_string());
    }

    risks.push("Weather-related delays".to_string());
    risks.push("Material availability and quality".to_string());

    risks
}

fn generate_permits(category: ProjectCategory) -> Vec<String> {
    let mut permits = vec!["Building permit".to_string(), "Site work permit".to_string()];

    if category == ProjectCategory::Infrastructure {
        permits.push("Right-of-way permits".to_string());
        permits.push("Traffic control permits".to_string());
    }

    permits.push("Environmental permits".to_string());
    permits.push("Utility connection permits".to_string());

    permits
}

fn generate_standards(category: ProjectCategory) -> Vec<String> {
    let mut standards = vec![
        "International Building Code (IBC)".to_string(),
        "Local building standards".to_string(),
    ];

    if matches!(
        category,
        ProjectCategory::Commercial | ProjectCategory::Industrial
    ) {
        standards.push("ASHRAE standards for HVAC".to_string());
        standards.push("NFPA fire protection standards".to_string());
    }

    standards.push("ACI concrete standards".to_string());
    standards.push("AISC steel construction standards".to_string());

    standards
}
