use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::fs;

use super::DocumentStore;

/// JSON file-backed document store.
///
/// Directory structure:
/// ```text
/// data/
///   users/
///     {user_id}.json
/// ```
///
/// Each user file holds either a JSON array of per-holding documents or
/// a single per-user document with an embedded `holdings` list; both
/// shapes pass through unchanged for the caller to flatten.
pub struct JsonFileDocumentStore {
    base_path: PathBuf,
}

impl JsonFileDocumentStore {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn users_dir(&self) -> PathBuf {
        self.base_path.join("users")
    }

    fn user_file(&self, user_id: &str) -> PathBuf {
        self.users_dir().join(format!("{user_id}.json"))
    }

    /// Reject ids that could escape the users directory.
    fn is_path_safe(user_id: &str) -> bool {
        !user_id.is_empty()
            && user_id != "."
            && user_id != ".."
            && !user_id.contains('/')
            && !user_id.contains('\\')
    }

    /// Seed helper for tests and imports; the scoring path never writes.
    pub async fn write_user_documents(&self, user_id: &str, documents: &Value) -> Result<()> {
        if !Self::is_path_safe(user_id) {
            anyhow::bail!("Unsafe user id: {user_id}");
        }
        let path = self.user_file(user_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create users directory")?;
        }
        let content =
            serde_json::to_string_pretty(documents).context("Failed to serialize documents")?;
        fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentStore for JsonFileDocumentStore {
    async fn fetch_user_documents(&self, user_id: &str) -> Result<Vec<Value>> {
        if !Self::is_path_safe(user_id) {
            anyhow::bail!("Unsafe user id: {user_id}");
        }

        let path = self.user_file(user_id);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
        };

        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;

        match value {
            Value::Array(documents) => Ok(documents),
            document => Ok(vec![document]),
        }
    }
}
