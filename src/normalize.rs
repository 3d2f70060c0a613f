//! Maps raw holding records onto the canonical [`Holding`] shape.
//!
//! Holdings have been written by several generations of the management UI
//! and importers, so the same semantic field shows up under different
//! names depending on when the record was written. Each canonical
//! attribute resolves through an ordered lookup list rather than
//! per-schema types, which keeps the mapping declarative and testable.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{Category, Holding};

const TICKER_FIELDS: &[&str] = &["symbol", "ticker", "Ticker"];
const QUANTITY_FIELDS: &[&str] = &["shares", "quantity", "Qty", "qty"];
const TOTAL_VALUE_FIELDS: &[&str] = &["total_value", "Total_Value", "position_value"];
const PRICE_FIELDS: &[&str] = &["purchase_price", "current_price", "Current_Price", "price"];
const COST_BASIS_FIELDS: &[&str] = &["total_cost", "cost_basis", "Cost_Basis"];
const CATEGORY_FIELDS: &[&str] = &["asset_type", "category", "Category"];
const BROKERAGE_FIELDS: &[&str] = &["brokerage", "Brokerage"];

/// Bond ETFs that predate the explicit category field.
const BOND_ETF_TICKERS: &[&str] = &[
    "BND", "AGG", "TLT", "BNDX", "VCIT", "VCSH", "LQD", "HYG", "MUB", "TIP",
];

const CRYPTO_SYMBOLS: &[&str] = &[
    "BTC", "ETH", "SOL", "ADA", "DOGE", "DOT", "AVAX", "MATIC", "LINK", "XRP", "LTC",
];

/// Normalize one raw record into a canonical holding.
///
/// Returns `None` when the record has no usable ticker; such records are
/// excluded from the snapshot and the request continues with whatever
/// valid holdings remain.
pub fn normalize(raw: &Value, now: DateTime<Utc>) -> Option<Holding> {
    let Some(ticker) = resolve_string(raw, TICKER_FIELDS) else {
        debug!("skipping holding record without a ticker");
        return None;
    };

    let quantity = clamp_non_negative(
        resolve_number(raw, QUANTITY_FIELDS).unwrap_or(0.0),
        "quantity",
        &ticker,
    );

    let stored_value = resolve_number(raw, TOTAL_VALUE_FIELDS)
        .map(|v| clamp_non_negative(v, "total_value", &ticker));

    // A stored total divided by the share count is the live per-unit
    // price; stored price fields may be stale purchase prices, so the
    // derived value takes priority whenever it is computable.
    let current_price = match stored_value {
        Some(value) if quantity > 0.0 => finite_or_zero(value / quantity),
        _ => clamp_non_negative(
            resolve_number(raw, PRICE_FIELDS).unwrap_or(0.0),
            "price",
            &ticker,
        ),
    };

    let total_value = stored_value.unwrap_or_else(|| finite_or_zero(quantity * current_price));

    // Unknown cost basis means "assume zero gain" rather than a fake
    // 100% return on the whole position.
    let cost_basis = resolve_number(raw, COST_BASIS_FIELDS)
        .map(|v| clamp_non_negative(v, "cost_basis", &ticker))
        .unwrap_or(total_value);

    let gain_loss = total_value - cost_basis;
    let gain_loss_percent = if cost_basis > 0.0 {
        gain_loss / cost_basis * 100.0
    } else {
        0.0
    };

    let category = match resolve_string(raw, CATEGORY_FIELDS) {
        Some(label) => Category::from_label(&label),
        None => classify_ticker(&ticker),
    };

    let brokerage =
        resolve_string(raw, BROKERAGE_FIELDS).unwrap_or_else(|| "Unknown".to_string());

    Some(Holding {
        ticker,
        quantity,
        current_price,
        total_value,
        cost_basis,
        gain_loss,
        gain_loss_percent,
        category,
        brokerage,
        last_updated: now,
    })
}

/// Classify a ticker when no explicit category field exists.
///
/// Closed-list heuristic: unlisted tickers always fall through to Stock.
pub fn classify_ticker(ticker: &str) -> Category {
    if ticker.starts_with("BOND_CASH") {
        return Category::Bond;
    }
    if ticker.starts_with("CASH") || ticker.starts_with("Cash") {
        return Category::Cash;
    }
    if BOND_ETF_TICKERS.contains(&ticker) {
        return Category::Bond;
    }
    if CRYPTO_SYMBOLS.contains(&ticker) || ticker.ends_with("-USD") || ticker.ends_with("USD") {
        return Category::Crypto;
    }
    Category::Stock
}

/// First non-empty string among the candidate field names.
fn resolve_string(raw: &Value, fields: &[&str]) -> Option<String> {
    for field in fields {
        if let Some(value) = raw.get(field).and_then(Value::as_str) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// First parseable finite number among the candidate field names.
///
/// Accepts JSON numbers and numeric strings; a field whose value would
/// not parse to a finite number is treated as absent so NaN never
/// reaches the aggregator.
fn resolve_number(raw: &Value, fields: &[&str]) -> Option<f64> {
    for field in fields {
        let parsed = match raw.get(field) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        if let Some(value) = parsed {
            if value.is_finite() {
                return Some(value);
            }
        }
    }
    None
}

fn clamp_non_negative(value: f64, field: &str, ticker: &str) -> f64 {
    if value < 0.0 {
        warn!(ticker, field, value, "negative input clamped to zero");
        0.0
    } else {
        value
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn resolves_modern_schema() {
        let raw = json!({
            "symbol": "AAPL",
            "shares": 100,
            "total_value": 17500.0,
            "total_cost": 16625.0,
        });

        let holding = normalize(&raw, now()).expect("holding");
        assert_eq!(holding.ticker, "AAPL");
        assert_eq!(holding.quantity, 100.0);
        assert_eq!(holding.total_value, 17500.0);
        assert_eq!(holding.current_price, 175.0);
        assert_eq!(holding.cost_basis, 16625.0);
        assert_eq!(holding.gain_loss, 875.0);
        assert!((holding.gain_loss_percent - 5.263157894736842).abs() < 1e-9);
        assert_eq!(holding.category, Category::Stock);
        assert_eq!(holding.brokerage, "Unknown");
    }

    #[test]
    fn resolves_legacy_field_names() {
        let raw = json!({
            "Ticker": "VTI",
            "Qty": "10",
            "position_value": "2500",
            "Cost_Basis": "2000",
            "Category": "ETF",
            "Brokerage": "Vanguard",
        });

        let holding = normalize(&raw, now()).expect("holding");
        assert_eq!(holding.ticker, "VTI");
        assert_eq!(holding.quantity, 10.0);
        assert_eq!(holding.total_value, 2500.0);
        assert_eq!(holding.cost_basis, 2000.0);
        assert_eq!(holding.category, Category::Etf);
        assert_eq!(holding.brokerage, "Vanguard");
    }

    #[test]
    fn derived_price_beats_stored_purchase_price() {
        let raw = json!({
            "symbol": "MSFT",
            "shares": 10,
            "total_value": 4000.0,
            "purchase_price": 250.0,
        });

        let holding = normalize(&raw, now()).expect("holding");
        assert_eq!(holding.current_price, 400.0);
    }

    #[test]
    fn stored_price_used_when_total_unknown() {
        let raw = json!({
            "symbol": "MSFT",
            "shares": 10,
            "current_price": 310.0,
        });

        let holding = normalize(&raw, now()).expect("holding");
        assert_eq!(holding.current_price, 310.0);
        assert_eq!(holding.total_value, 3100.0);
    }

    #[test]
    fn rejects_record_without_ticker() {
        assert!(normalize(&json!({"shares": 5}), now()).is_none());
        assert!(normalize(&json!({"symbol": "  "}), now()).is_none());
        assert!(normalize(&json!({"symbol": ""}), now()).is_none());
    }

    #[test]
    fn malformed_numbers_fall_back_to_defaults() {
        let raw = json!({
            "symbol": "AAPL",
            "shares": "not-a-number",
            "price": "NaN",
        });

        let holding = normalize(&raw, now()).expect("holding");
        assert_eq!(holding.quantity, 0.0);
        assert_eq!(holding.current_price, 0.0);
        assert_eq!(holding.total_value, 0.0);
        assert!(holding.gain_loss_percent.is_finite());
    }

    #[test]
    fn negative_inputs_clamp_to_zero() {
        let raw = json!({
            "symbol": "AAPL",
            "shares": -3,
            "total_value": -100.0,
            "total_cost": -50.0,
        });

        let holding = normalize(&raw, now()).expect("holding");
        assert_eq!(holding.quantity, 0.0);
        assert_eq!(holding.total_value, 0.0);
        assert_eq!(holding.cost_basis, 0.0);
        assert_eq!(holding.gain_loss, 0.0);
        assert_eq!(holding.gain_loss_percent, 0.0);
    }

    #[test]
    fn unknown_cost_basis_assumes_zero_gain() {
        let raw = json!({
            "symbol": "AAPL",
            "shares": 2,
            "price": 100.0,
        });

        let holding = normalize(&raw, now()).expect("holding");
        assert_eq!(holding.cost_basis, 200.0);
        assert_eq!(holding.gain_loss, 0.0);
        assert_eq!(holding.gain_loss_percent, 0.0);
    }

    #[test]
    fn zero_quantity_zero_value_avoids_division() {
        let raw = json!({
            "symbol": "GE",
            "shares": 0,
            "total_value": 0,
        });

        let holding = normalize(&raw, now()).expect("holding");
        assert_eq!(holding.cost_basis, 0.0);
        assert_eq!(holding.gain_loss_percent, 0.0);
        assert_eq!(holding.current_price, 0.0);
    }

    #[test]
    fn explicit_category_beats_classifier() {
        let raw = json!({
            "symbol": "BTC",
            "asset_type": "stock",
        });
        let holding = normalize(&raw, now()).expect("holding");
        assert_eq!(holding.category, Category::Stock);
    }

    #[test]
    fn unrecognized_category_label_maps_to_other() {
        let raw = json!({
            "symbol": "XYZ",
            "category": "private-equity",
        });
        let holding = normalize(&raw, now()).expect("holding");
        assert_eq!(holding.category, Category::Other);
    }

    #[test]
    fn classifier_covers_known_prefixes_and_sets() {
        assert_eq!(classify_ticker("CASH_USD"), Category::Cash);
        assert_eq!(classify_ticker("Cash"), Category::Cash);
        assert_eq!(classify_ticker("BOND_CASH_X"), Category::Bond);
        assert_eq!(classify_ticker("BND"), Category::Bond);
        assert_eq!(classify_ticker("TLT"), Category::Bond);
        assert_eq!(classify_ticker("BTC"), Category::Crypto);
        assert_eq!(classify_ticker("ETH-USD"), Category::Crypto);
        assert_eq!(classify_ticker("SOLUSD"), Category::Crypto);
        assert_eq!(classify_ticker("AAPL"), Category::Stock);
        assert_eq!(classify_ticker("UNKNOWN"), Category::Stock);
    }

    #[test]
    fn normalize_is_idempotent_over_as_raw() {
        let raw = json!({
            "symbol": "VTI",
            "shares": 12.5,
            "total_value": 3125.0,
            "cost_basis": 3000.0,
            "category": "etf",
            "brokerage": "Fidelity",
        });

        let once = normalize(&raw, now()).expect("holding");
        let twice = normalize(&once.as_raw(), now()).expect("holding");
        assert_eq!(once, twice);
    }
}
