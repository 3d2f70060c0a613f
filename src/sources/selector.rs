use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};

use super::{synthetic, HoldingsSource, Provenance};

const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(2);

/// Raw records selected from one source, plus where they came from.
#[derive(Debug, Clone)]
pub struct SelectedRecords {
    pub records: Vec<Value>,
    pub source: Provenance,
}

/// Walks the configured sources in priority order and returns the first
/// usable result, degrading to deterministic synthetic data when every
/// real source fails.
///
/// Attempts are sequential, each guarded by an independent timeout, with
/// no retry within an attempt; a timed-out attempt's late result is
/// discarded along with its future. A successful fetch that happens to
/// contain zero holdings is still usable: an empty portfolio is a valid
/// state, not a failure.
pub struct SourceSelector {
    sources: Vec<Arc<dyn HoldingsSource>>,
    attempt_timeout: Duration,
    clock: Arc<dyn Clock>,
}

impl SourceSelector {
    pub fn new(sources: Vec<Arc<dyn HoldingsSource>>) -> Self {
        Self {
            sources,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Select holdings for one user. Never fails: the synthetic fallback
    /// is always reachable and always succeeds.
    pub async fn select(&self, user_id: &str) -> SelectedRecords {
        for (rank, source) in self.sources.iter().enumerate() {
            let provenance = Provenance::for_rank(rank);
            match tokio::time::timeout(self.attempt_timeout, source.fetch_documents(user_id)).await
            {
                Ok(Ok(documents)) => {
                    let records = flatten_documents(documents);
                    info!(
                        source = source.name(),
                        provenance = provenance.as_str(),
                        records = records.len(),
                        "holdings source selected"
                    );
                    return SelectedRecords {
                        records,
                        source: provenance,
                    };
                }
                Ok(Err(err)) => {
                    warn!(source = source.name(), error = %err, "holdings source failed");
                }
                Err(_) => {
                    warn!(
                        source = source.name(),
                        timeout_ms = self.attempt_timeout.as_millis() as u64,
                        "holdings source timed out"
                    );
                }
            }
        }

        info!(user_id, "all holdings sources exhausted, serving demo data");
        SelectedRecords {
            records: synthetic::demo_records(self.clock.now()),
            source: Provenance::Synthetic,
        }
    }
}

/// Flatten per-user documents into a plain holding-record sequence.
///
/// A document carrying an embedded `holdings` array is split into its
/// elements; anything else is already a per-holding record and passes
/// through. A stored precomputed `totalPortfolioValue` lives on the
/// per-user wrapper, so dropping the wrapper here is also what keeps
/// stale precomputed totals out of the aggregation.
pub fn flatten_documents(documents: Vec<Value>) -> Vec<Value> {
    let mut records = Vec::with_capacity(documents.len());
    for document in documents {
        match document.get("holdings").and_then(Value::as_array) {
            Some(holdings) => {
                debug!(count = holdings.len(), "flattening embedded holdings list");
                records.extend(holdings.iter().cloned());
            }
            None => records.push(document),
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SourceError;
    use serde_json::json;

    struct StaticSource {
        name: &'static str,
        result: Result<Vec<Value>, &'static str>,
    }

    #[async_trait::async_trait]
    impl HoldingsSource for StaticSource {
        async fn fetch_documents(&self, _user_id: &str) -> Result<Vec<Value>, SourceError> {
            match &self.result {
                Ok(docs) => Ok(docs.clone()),
                Err(msg) => Err(SourceError::Malformed(msg.to_string())),
            }
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    struct HangingSource;

    #[async_trait::async_trait]
    impl HoldingsSource for HangingSource {
        async fn fetch_documents(&self, _user_id: &str) -> Result<Vec<Value>, SourceError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![json!({"symbol": "LATE"})])
        }

        fn name(&self) -> &str {
            "hanging"
        }
    }

    #[tokio::test]
    async fn first_success_wins_in_priority_order() {
        let selector = SourceSelector::new(vec![
            Arc::new(StaticSource {
                name: "a",
                result: Ok(vec![json!({"symbol": "AAPL"})]),
            }),
            Arc::new(StaticSource {
                name: "b",
                result: Ok(vec![json!({"symbol": "MSFT"})]),
            }),
        ]);

        let selected = selector.select("u1").await;
        assert_eq!(selected.source, Provenance::Primary);
        assert_eq!(selected.records[0]["symbol"], "AAPL");
    }

    #[tokio::test]
    async fn failure_advances_to_next_source() {
        let selector = SourceSelector::new(vec![
            Arc::new(StaticSource {
                name: "a",
                result: Err("boom"),
            }),
            Arc::new(StaticSource {
                name: "b",
                result: Ok(vec![json!({"symbol": "MSFT"})]),
            }),
        ]);

        let selected = selector.select("u1").await;
        assert_eq!(selected.source, Provenance::Secondary);
        assert_eq!(selected.records.len(), 1);
    }

    #[tokio::test]
    async fn timeout_advances_to_next_source() {
        let selector = SourceSelector::new(vec![
            Arc::new(HangingSource),
            Arc::new(StaticSource {
                name: "b",
                result: Ok(vec![json!({"symbol": "MSFT"})]),
            }),
        ])
        .with_attempt_timeout(Duration::from_millis(50));

        let selected = selector.select("u1").await;
        assert_eq!(selected.source, Provenance::Secondary);
    }

    #[tokio::test]
    async fn empty_success_is_usable() {
        let selector = SourceSelector::new(vec![
            Arc::new(StaticSource {
                name: "a",
                result: Ok(Vec::new()),
            }),
            Arc::new(StaticSource {
                name: "b",
                result: Ok(vec![json!({"symbol": "MSFT"})]),
            }),
        ]);

        let selected = selector.select("u1").await;
        assert_eq!(selected.source, Provenance::Primary);
        assert!(selected.records.is_empty());
    }

    #[tokio::test]
    async fn exhaustion_serves_synthetic_records() {
        let selector = SourceSelector::new(vec![Arc::new(StaticSource {
            name: "a",
            result: Err("down"),
        })]);

        let selected = selector.select("u1").await;
        assert_eq!(selected.source, Provenance::Synthetic);
        assert!(!selected.records.is_empty());
    }

    #[tokio::test]
    async fn no_sources_at_all_serves_synthetic_records() {
        let selector = SourceSelector::new(Vec::new());
        let selected = selector.select("u1").await;
        assert_eq!(selected.source, Provenance::Synthetic);
        assert!(!selected.records.is_empty());
    }

    #[test]
    fn third_and_later_ranks_are_tertiary() {
        assert_eq!(Provenance::for_rank(0), Provenance::Primary);
        assert_eq!(Provenance::for_rank(1), Provenance::Secondary);
        assert_eq!(Provenance::for_rank(2), Provenance::Tertiary);
        assert_eq!(Provenance::for_rank(3), Provenance::Tertiary);
    }

    #[test]
    fn flatten_splices_embedded_holdings() {
        let records = flatten_documents(vec![
            json!({
                "user_id": "u1",
                "holdings": [{"symbol": "AAPL"}, {"symbol": "BND"}],
                "totalPortfolioValue": 9999.0,
            }),
            json!({"user_id": "u1", "symbol": "BTC"}),
        ]);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["symbol"], "AAPL");
        assert_eq!(records[2]["symbol"], "BTC");
        assert!(records.iter().all(|r| r.get("totalPortfolioValue").is_none()));
    }
}
