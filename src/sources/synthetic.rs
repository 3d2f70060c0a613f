//! Deterministic demo holdings served when every real source is down.
//!
//! The dashboard never shows a hard failure: exhausting the real
//! sources yields this fixed portfolio instead, labeled with synthetic
//! provenance so the UI can display its demo-data notice.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::models::{Category, Holding};

/// The demo portfolio: a handful of positions spanning several
/// categories so the dashboard renders a representative view.
pub fn demo_holdings(now: DateTime<Utc>) -> Vec<Holding> {
    vec![
        demo_holding("AAPL", 25.0, 180.0, 4100.0, Category::Stock, now),
        demo_holding("VTI", 40.0, 250.0, 9200.0, Category::Etf, now),
        demo_holding("BND", 50.0, 72.0, 3750.0, Category::Bond, now),
        demo_holding("BTC", 0.25, 60000.0, 12500.0, Category::Crypto, now),
        demo_holding("CASH_USD", 2500.0, 1.0, 2500.0, Category::Cash, now),
    ]
}

/// Demo holdings serialized as canonical raw records, so the fallback
/// path flows through the same normalize/aggregate/score pipeline as
/// real data.
pub fn demo_records(now: DateTime<Utc>) -> Vec<Value> {
    demo_holdings(now).iter().map(Holding::as_raw).collect()
}

fn demo_holding(
    ticker: &str,
    quantity: f64,
    current_price: f64,
    cost_basis: f64,
    category: Category,
    now: DateTime<Utc>,
) -> Holding {
    let total_value = quantity * current_price;
    let gain_loss = total_value - cost_basis;
    let gain_loss_percent = if cost_basis > 0.0 {
        gain_loss / cost_basis * 100.0
    } else {
        0.0
    };

    Holding {
        ticker: ticker.to_string(),
        quantity,
        current_price,
        total_value,
        cost_basis,
        gain_loss,
        gain_loss_percent,
        category,
        brokerage: "Demo".to_string(),
        last_updated: now,
    }
}
