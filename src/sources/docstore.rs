use std::sync::Arc;

use serde_json::Value;

use crate::store::DocumentStore;

use super::{HoldingsSource, SourceError};

/// Direct document-store query, used as the last real source when both
/// APIs are down.
pub struct DocumentStoreSource {
    store: Arc<dyn DocumentStore>,
}

impl DocumentStoreSource {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl HoldingsSource for DocumentStoreSource {
    async fn fetch_documents(&self, user_id: &str) -> Result<Vec<Value>, SourceError> {
        self.store
            .fetch_user_documents(user_id)
            .await
            .map_err(SourceError::Store)
    }

    fn name(&self) -> &str {
        "document-store"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use serde_json::json;

    #[tokio::test]
    async fn passes_documents_through_unchanged() -> anyhow::Result<()> {
        let store = Arc::new(MemoryDocumentStore::new());
        store
            .put_documents("u1", vec![json!({"symbol": "AAPL", "shares": 3})])
            .await;

        let source = DocumentStoreSource::new(store);
        let docs = source.fetch_documents("u1").await?;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["shares"], 3);
        Ok(())
    }
}
