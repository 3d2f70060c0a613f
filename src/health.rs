//! Composite portfolio health scoring.
//!
//! The scores here are deliberately coarse weighted heuristics for the
//! dashboard, not a statistical risk model. Every surface that shows a
//! score calls this module, so the same portfolio always produces the
//! same number.

use serde::{Deserialize, Serialize};

use crate::portfolio::PortfolioSnapshot;

const WELL_DIVERSIFIED: &str = "Well Diversified";
const STRONG_PERFORMANCE: &str = "Strong Performance";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub diversification_score: f64,
    pub risk_score: f64,
    pub health_score: f64,
    pub badges: Vec<String>,
}

/// Score a portfolio snapshot.
///
/// Diversification saturates at five distinct categories; risk is its
/// inverse. Each composite term is clamped before weighting so one
/// extreme input (a catastrophic loss, say) cannot drag the others
/// negative, and the final score is always within [0, 100].
pub fn score(snapshot: &PortfolioSnapshot) -> HealthMetrics {
    let diversification_score = (snapshot.distinct_category_count as f64 * 20.0).min(100.0);
    let risk_score = (100.0 - diversification_score).max(0.0);

    let performance_term = (100.0 + snapshot.total_gain_loss_percent).max(0.0);
    let inverse_risk_term = (100.0 - risk_score).max(0.0);

    let health_score = (diversification_score * 0.4
        + performance_term * 0.3
        + inverse_risk_term * 0.3)
        .clamp(0.0, 100.0)
        .round();

    let mut badges = Vec::new();
    if diversification_score > 80.0 {
        badges.push(WELL_DIVERSIFIED.to_string());
    }
    if snapshot.total_gain_loss_percent > 5.0 {
        badges.push(STRONG_PERFORMANCE.to_string());
    }

    HealthMetrics {
        diversification_score,
        risk_score,
        health_score,
        badges,
    }
}
