//! In-memory document store for testing.

use std::collections::HashMap;

use anyhow::Result;
use serde_json::Value;
use tokio::sync::Mutex;

use super::DocumentStore;

pub struct MemoryDocumentStore {
    documents: Mutex<HashMap<String, Vec<Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
        }
    }

    pub async fn put_documents(&self, user_id: &str, documents: Vec<Value>) {
        let mut store = self.documents.lock().await;
        store.insert(user_id.to_string(), documents);
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn fetch_user_documents(&self, user_id: &str) -> Result<Vec<Value>> {
        let store = self.documents.lock().await;
        Ok(store.get(user_id).cloned().unwrap_or_default())
    }
}
