//! Data sources for raw holding records and the fallback logic that
//! chooses between them.

mod api;
mod docstore;
mod selector;
mod synthetic;

pub use api::{LegacyApiSource, StructuredApiSource};
pub use docstore::DocumentStoreSource;
pub use selector::{flatten_documents, SelectedRecords, SourceSelector};
pub use synthetic::{demo_holdings, demo_records};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which source ultimately produced a holding set.
///
/// The presentation layer uses this to decide whether to show a
/// "using cached/demo data" notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Primary,
    Secondary,
    Tertiary,
    Synthetic,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Primary => "primary",
            Provenance::Secondary => "secondary",
            Provenance::Tertiary => "tertiary",
            Provenance::Synthetic => "synthetic",
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Provenance::Synthetic)
    }

    fn for_rank(rank: usize) -> Self {
        match rank {
            0 => Provenance::Primary,
            1 => Provenance::Secondary,
            _ => Provenance::Tertiary,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// One upstream producer of raw holding documents.
///
/// Implementations fetch; they do not retry, time out, or fall back.
/// That policy lives in [`SourceSelector`].
#[async_trait::async_trait]
pub trait HoldingsSource: Send + Sync {
    async fn fetch_documents(&self, user_id: &str) -> Result<Vec<Value>, SourceError>;

    fn name(&self) -> &str;
}
