//! Heuristic scoring — the deterministic fallback used whenever the
//! prediction service is unavailable or returns garbage.
//!
//! Score comes from the bid-to-budget ratio (undercutting the budget is
//! competitive). Advisory text is category-conditioned and fixed, so the
//! whole path is pure over (features, rng). Callers inject the rng so
//! tests can pin the two sampled values (savings, win probability).

use rand::Rng;

use crate::analysis::analyzer::{AnalysisResult, CostOptimization, MarketComparison};
use crate::analysis::features::FeatureSet;
use crate::models::project::ProjectCategory;

/// Score used when the bid total is missing or unparseable.
const BASE_SCORE: u32 = 75;

pub fn heuristic_analysis(features: &FeatureSet, rng: &mut impl Rng) -> AnalysisResult {
    AnalysisResult {
        competitiveness_score: score_competitiveness(features.bid_total, features.project_budget),
        recommendations: generate_recommendations(features.category),
        risk_alerts: generate_risk_alerts(
            features.category,
            features.bid_total,
            features.project_budget,
        ),
        cost_optimization: generate_cost_optimization(rng),
        market_comparison: generate_market_comparison(features.project_budget, rng),
    }
}

/// Banded score over bid/budget. Band edges are inclusive on the low side:
/// a ratio of exactly 0.8 lands in the 0.8–0.9 band and scores 85.
pub fn score_competitiveness(bid_total: f64, project_budget: f64) -> u32 {
    if bid_total <= 0.0 {
        return BASE_SCORE;
    }
    let ratio = bid_total / project_budget;
    if ratio < 0.8 {
        95
    } else if ratio < 0.9 {
        85
    } else if ratio < 1.0 {
        75
    } else if ratio < 1.1 {
        65
    } else {
        50
    }
}

/// Two category-specific suggestions (commercial, residential and
/// infrastructure only) followed by three universal ones.
fn generate_recommendations(category: ProjectCategory) -> Vec<String> {
    let mut recommendations = Vec::new();

    match category {
        ProjectCategory::Commercial => {
            recommendations.push(
                "Consider LEED certification requirements for commercial projects".to_string(),
            );
            recommendations.push(
                "Factor in extended warranty periods for commercial-grade materials".to_string(),
            );
        }
        ProjectCategory::Residential => {
            recommendations.push("Include allowances for homeowner change requests".to_string());
            recommendations
                .push("Consider seasonal weather impacts on construction timeline".to_string());
        }
        ProjectCategory::Infrastructure => {
            recommendations
                .push("Account for traffic management and public safety requirements".to_string());
            recommendations.push("Include utility coordination and relocation costs".to_string());
        }
        _ => {}
    }

    recommendations.push("Consider bulk purchasing agreements to reduce material costs".to_string());
    recommendations.push("Optimize equipment scheduling to minimize rental costs".to_string());
    recommendations.push("Include contingency for permit approval delays".to_string());

    recommendations
}

fn generate_risk_alerts(category: ProjectCategory, bid_total: f64, project_budget: f64) -> Vec<String> {
    let mut alerts = Vec::new();

    // Same edge as the bottom score band: exactly 1.1 counts as over budget.
    if bid_total > 0.0 && bid_total / project_budget >= 1.1 {
        alerts.push(
            "Bid exceeds project budget by more than 10% - consider cost optimization".to_string(),
        );
    }

    alerts.push("Material cost fluctuation risk detected - consider price locks".to_string());
    alerts.push("Weather dependency identified for outdoor phases".to_string());

    if category == ProjectCategory::Infrastructure {
        alerts.push("Utility conflicts may cause delays - conduct thorough site survey".to_string());
    }

    alerts.push("Permit approval timeline may impact start date".to_string());

    alerts
}

fn generate_cost_optimization(rng: &mut impl Rng) -> CostOptimization {
    CostOptimization {
        potential_savings: Some(rng.gen_range(10_000..60_000)),
        suggestions: vec![
            "Alternative material suppliers could reduce costs by 8-12%".to_string(),
            "Optimized equipment scheduling could save $15,000-25,000".to_string(),
            "Bulk purchasing agreements available for major materials".to_string(),
            "Consider value engineering opportunities in non-critical areas".to_string(),
        ],
    }
}

fn generate_market_comparison(project_budget: f64, rng: &mut impl Rng) -> MarketComparison {
    let low = (project_budget * 0.8).floor() as i64;
    let high = (project_budget * 1.2).floor() as i64;

    MarketComparison {
        average_bid_range: Some(format!(
            "${} - ${}",
            format_thousands(low),
            format_thousands(high)
        )),
        your_position: Some("Competitive".to_string()),
        win_probability: Some(rng.gen_range(65..90)),
    }
}

/// Renders 1234567 as "1,234,567".
fn format_thousands(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 {
        format!("-{out}")
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::features::extract_features;
    use crate::models::bid::BidDraft;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn features(bid_total: f64, budget: f64, category: ProjectCategory) -> FeatureSet {
        let bid: BidDraft =
            serde_json::from_value(json!({ "cost": { "total": bid_total.to_string() } })).unwrap();
        let project = crate::models::project::ProjectSummary { budget, category };
        extract_features(&bid, Some(&project))
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(score_competitiveness(350_000.0, 500_000.0), 95); // 0.70
        assert_eq!(score_competitiveness(425_000.0, 500_000.0), 85); // 0.85
        assert_eq!(score_competitiveness(475_000.0, 500_000.0), 75); // 0.95
        assert_eq!(score_competitiveness(525_000.0, 500_000.0), 65); // 1.05
        assert_eq!(score_competitiveness(600_000.0, 500_000.0), 50); // 1.20
    }

    #[test]
    fn test_ratio_boundary_is_inclusive_low() {
        // Exactly 0.8 belongs to the 0.8–0.9 band, not the <0.8 band.
        assert_eq!(score_competitiveness(400_000.0, 500_000.0), 85);
        // Exactly 1.1 belongs to the top band.
        assert_eq!(score_competitiveness(550_000.0, 500_000.0), 50);
    }

    #[test]
    fn test_missing_bid_total_scores_base() {
        assert_eq!(score_competitiveness(0.0, 500_000.0), BASE_SCORE);
    }

    #[test]
    fn test_unknown_category_gets_universal_recommendations_only() {
        let recs = generate_recommendations(ProjectCategory::Unknown);
        assert_eq!(recs.len(), 3);
        assert!(recs[0].contains("bulk purchasing"));
    }

    #[test]
    fn test_category_recommendations_prepended() {
        let recs = generate_recommendations(ProjectCategory::Commercial);
        assert_eq!(recs.len(), 5);
        assert!(recs[0].contains("LEED"));

        let recs = generate_recommendations(ProjectCategory::Infrastructure);
        assert!(recs[0].contains("traffic management"));

        // Healthcare has no category-specific suggestions
        assert_eq!(generate_recommendations(ProjectCategory::Healthcare).len(), 3);
    }

    #[test]
    fn test_risk_alerts_baseline() {
        let alerts = generate_risk_alerts(ProjectCategory::Residential, 450_000.0, 500_000.0);
        assert_eq!(alerts.len(), 3);
        assert!(alerts[0].contains("Material cost fluctuation"));
        assert!(alerts[2].contains("Permit approval"));
    }

    #[test]
    fn test_infrastructure_over_budget_gets_both_extra_alerts() {
        let alerts = generate_risk_alerts(ProjectCategory::Infrastructure, 600_000.0, 500_000.0);
        assert_eq!(alerts.len(), 5);
        assert!(alerts[0].contains("exceeds project budget"));
        assert!(alerts.iter().any(|a| a.contains("Utility conflicts")));
    }

    #[test]
    fn test_over_budget_alert_edge_at_1_1() {
        let alerts = generate_risk_alerts(ProjectCategory::Unknown, 550_000.0, 500_000.0);
        assert!(alerts.iter().any(|a| a.contains("exceeds project budget")));

        let alerts = generate_risk_alerts(ProjectCategory::Unknown, 549_000.0, 500_000.0);
        assert!(!alerts.iter().any(|a| a.contains("exceeds project budget")));
    }

    #[test]
    fn test_cost_optimization_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let opt = generate_cost_optimization(&mut rng);
            let savings = opt.potential_savings.unwrap();
            assert!((10_000..60_000).contains(&savings), "savings was {savings}");
            assert_eq!(opt.suggestions.len(), 4);
        }
    }

    #[test]
    fn test_market_comparison_range_and_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let cmp = generate_market_comparison(500_000.0, &mut rng);
        assert_eq!(cmp.average_bid_range.as_deref(), Some("$400,000 - $600,000"));
        assert_eq!(cmp.your_position.as_deref(), Some("Competitive"));
        let p = cmp.win_probability.unwrap();
        assert!((65..90).contains(&p), "win probability was {p}");
    }

    #[test]
    fn test_seeded_analysis_is_deterministic() {
        let f = features(425_000.0, 500_000.0, ProjectCategory::Residential);
        let a = heuristic_analysis(&f, &mut StdRng::seed_from_u64(42));
        let b = heuristic_analysis(&f, &mut StdRng::seed_from_u64(42));
        assert_eq!(serde_json::to_value(&a).unwrap(), serde_json::to_value(&b).unwrap());
        assert_eq!(a.competitiveness_score, 85);
    }

    #[test]
    fn test_infrastructure_scenario_from_features() {
        let f = features(550_000.0, 500_000.0, ProjectCategory::Infrastructure);
        let analysis = heuristic_analysis(&f, &mut StdRng::seed_from_u64(1));
        assert_eq!(analysis.competitiveness_score, 50);
        assert!(analysis
            .risk_alerts
            .iter()
            .any(|a| a.contains("Utility conflicts")));
        assert!(analysis
            .risk_alerts
            .iter()
            .any(|a| a.contains("exceeds project budget")));
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(400_000), "400,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }
}
