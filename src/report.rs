//! Stable JSON contract consumed by the dashboard UI.
//!
//! Field names here are public API for existing UI code; renaming any of
//! them is a breaking change.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::health::HealthMetrics;
use crate::models::{Category, Holding};
use crate::portfolio::{CategorySlice, PortfolioSnapshot};
use crate::sources::Provenance;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    /// Which data source produced this report; the UI shows a
    /// "demo data" notice for anything other than a real source.
    pub source: Provenance,
    pub total_value: f64,
    pub total_cost_basis: f64,
    pub total_gain_loss: f64,
    pub total_gain_loss_percent: f64,
    pub categories_count: usize,
    pub category_breakdown: BTreeMap<Category, CategorySlice>,
    pub diversification_score: f64,
    pub risk_score: f64,
    pub health_score: f64,
    pub badges: Vec<String>,
    pub holdings: Vec<Holding>,
}

impl DashboardReport {
    pub fn new(snapshot: PortfolioSnapshot, metrics: HealthMetrics, source: Provenance) -> Self {
        Self {
            source,
            total_value: snapshot.total_value,
            total_cost_basis: snapshot.total_cost_basis,
            total_gain_loss: snapshot.total_gain_loss,
            total_gain_loss_percent: snapshot.total_gain_loss_percent,
            categories_count: snapshot.distinct_category_count,
            category_breakdown: snapshot.category_breakdown,
            diversification_score: metrics.diversification_score,
            risk_score: metrics.risk_score,
            health_score: metrics.health_score,
            badges: metrics.badges,
            holdings: snapshot.holdings,
        }
    }
}
