//! Portfolio-level aggregation over canonical holdings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Category, Holding};

/// Ticker used by legacy exports for a precomputed grand-total row.
///
/// Such rows are dropped before summation: totals are always recomputed
/// from the real holdings, so a stale precomputed value can never
/// diverge from the rows actually shown.
pub const LEGACY_TOTAL_ROW_TICKER: &str = "Total Portfolio";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySlice {
    pub value: f64,
    pub percent_of_total: f64,
}

/// Derived, ephemeral view of one user's portfolio.
///
/// Recomputed on every request from the holdings it carries; never
/// persisted. Holdings keep their input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub holdings: Vec<Holding>,
    pub total_value: f64,
    pub total_cost_basis: f64,
    pub total_gain_loss: f64,
    pub total_gain_loss_percent: f64,
    pub category_breakdown: BTreeMap<Category, CategorySlice>,
    pub distinct_category_count: usize,
}

/// Aggregate a sequence of holdings into portfolio totals and a
/// per-category breakdown.
///
/// An empty input yields the all-zero snapshot rather than an error.
pub fn aggregate(mut holdings: Vec<Holding>) -> PortfolioSnapshot {
    let before = holdings.len();
    holdings.retain(|h| h.ticker != LEGACY_TOTAL_ROW_TICKER);
    if holdings.len() < before {
        debug!(
            dropped = before - holdings.len(),
            "ignoring precomputed total rows"
        );
    }

    let total_value: f64 = holdings.iter().map(|h| h.total_value).sum();
    let total_cost_basis: f64 = holdings.iter().map(|h| h.cost_basis).sum();

    // Recomputed at the portfolio level rather than summing per-holding
    // gains, so the totals always satisfy value - cost = gain exactly.
    let total_gain_loss = total_value - total_cost_basis;
    let total_gain_loss_percent = if total_cost_basis > 0.0 {
        total_gain_loss / total_cost_basis * 100.0
    } else {
        0.0
    };

    let mut category_breakdown: BTreeMap<Category, CategorySlice> = BTreeMap::new();
    for holding in &holdings {
        let slice = category_breakdown
            .entry(holding.category)
            .or_insert(CategorySlice {
                value: 0.0,
                percent_of_total: 0.0,
            });
        slice.value += holding.total_value;
    }
    for slice in category_breakdown.values_mut() {
        slice.percent_of_total = if total_value > 0.0 {
            slice.value / total_value * 100.0
        } else {
            0.0
        };
    }

    let distinct_category_count = category_breakdown.len();

    PortfolioSnapshot {
        holdings,
        total_value,
        total_cost_basis,
        total_gain_loss,
        total_gain_loss_percent,
        category_breakdown,
        distinct_category_count,
    }
}
