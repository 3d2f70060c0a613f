use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Coarse asset classification used for diversification scoring.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Stock,
    Etf,
    Bond,
    Crypto,
    Cash,
    Other,
}

impl Category {
    /// Parse an explicit category label from a raw record.
    ///
    /// Matching is case-insensitive; anything non-empty but unrecognized
    /// maps to `Other` rather than being rejected.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "stock" | "stocks" | "equity" => Category::Stock,
            "etf" | "etfs" | "fund" => Category::Etf,
            "bond" | "bonds" => Category::Bond,
            "crypto" | "cryptocurrency" => Category::Crypto,
            "cash" => Category::Cash,
            _ => Category::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Stock => "stock",
            Category::Etf => "etf",
            Category::Bond => "bond",
            Category::Crypto => "crypto",
            Category::Cash => "cash",
            Category::Other => "other",
        }
    }
}

/// One normalized position within a user's portfolio.
///
/// Immutable once constructed: the gain fields are always derived from
/// `total_value` and `cost_basis`, never trusted from input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub ticker: String,
    pub quantity: f64,
    pub current_price: f64,
    pub total_value: f64,
    pub cost_basis: f64,
    pub gain_loss: f64,
    pub gain_loss_percent: f64,
    pub category: Category,
    pub brokerage: String,
    pub last_updated: DateTime<Utc>,
}

impl Holding {
    /// Serialize back to the canonical raw-record field names.
    ///
    /// Normalizing the result reproduces this holding (given the same
    /// clock), which is what lets synthetic data flow through the same
    /// pipeline as real records.
    pub fn as_raw(&self) -> Value {
        json!({
            "ticker": self.ticker,
            "quantity": self.quantity,
            "price": self.current_price,
            "total_value": self.total_value,
            "cost_basis": self.cost_basis,
            "category": self.category.as_str(),
            "brokerage": self.brokerage,
        })
    }
}
