//! The one shared dashboard computation used by every call site.

use std::sync::Arc;

use tracing::warn;

use crate::clock::{Clock, SystemClock};
use crate::config::ResolvedConfig;
use crate::health::score;
use crate::models::Holding;
use crate::normalize::normalize;
use crate::portfolio::aggregate;
use crate::report::DashboardReport;
use crate::sources::{
    DocumentStoreSource, HoldingsSource, LegacyApiSource, SourceSelector, StructuredApiSource,
};
use crate::store::DocumentStore;

pub struct DashboardService {
    selector: SourceSelector,
    clock: Arc<dyn Clock>,
}

impl DashboardService {
    pub fn new(selector: SourceSelector) -> Self {
        Self {
            selector,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Compute one user's dashboard report.
    ///
    /// Infallible by design: source failures degrade through the
    /// selector's fallback chain, and malformed records are skipped
    /// rather than failing the request.
    pub async fn dashboard(&self, user_id: &str) -> DashboardReport {
        let selected = self.selector.select(user_id).await;
        let now = self.clock.now();

        let total = selected.records.len();
        let holdings: Vec<Holding> = selected
            .records
            .iter()
            .filter_map(|record| normalize(record, now))
            .collect();
        if holdings.len() < total {
            warn!(
                user_id,
                skipped = total - holdings.len(),
                "skipped malformed holding records"
            );
        }

        let snapshot = aggregate(holdings);
        let metrics = score(&snapshot);
        DashboardReport::new(snapshot, metrics, selected.source)
    }
}

/// Build the source chain from configuration: structured API, then
/// legacy API, then a direct document-store query.
///
/// `offline` drops the HTTP sources so only the local store (and the
/// synthetic fallback behind it) is consulted.
pub fn build_selector(
    config: &ResolvedConfig,
    store: Arc<dyn DocumentStore>,
    offline: bool,
) -> SourceSelector {
    let mut sources: Vec<Arc<dyn HoldingsSource>> = Vec::new();

    if !offline {
        if let Some(url) = &config.sources.primary_url {
            sources.push(Arc::new(StructuredApiSource::new(url.clone())));
        }
        if let Some(url) = &config.sources.legacy_url {
            sources.push(Arc::new(LegacyApiSource::new(url.clone())));
        }
    }
    sources.push(Arc::new(DocumentStoreSource::new(store)));

    SourceSelector::new(sources).with_attempt_timeout(config.sources.attempt_timeout)
}
