mod json_file;
mod memory;

pub use json_file::JsonFileDocumentStore;
pub use memory::MemoryDocumentStore;

use anyhow::Result;
use serde_json::Value;

/// Read boundary over the document database that persists raw holding
/// records.
///
/// The scoring path only ever reads; writes belong to the management UI
/// and importers, which is why the trait has no mutation methods.
/// Concrete stores expose inherent helpers for seeding data.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents stored for one user.
    ///
    /// Documents may be per-holding records or a per-user document with
    /// an embedded `holdings` list; callers flatten. A user with no
    /// documents yields an empty list, not an error.
    async fn fetch_user_documents(&self, user_id: &str) -> Result<Vec<Value>>;
}
