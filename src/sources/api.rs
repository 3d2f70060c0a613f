//! HTTP-backed holdings sources.
//!
//! The structured API is the current backend; the legacy API predates it
//! and still serves records under the old field names. Both return raw
//! documents untouched so the normalizer sees exactly what the backend
//! stored.

use reqwest::Client;
use serde_json::Value;

use super::{HoldingsSource, SourceError};

/// Current structured portfolio API.
///
/// `GET {base}/v1/users/{user_id}/holdings` returning either a JSON
/// array of holding documents or an object with an embedded `holdings`
/// list.
#[derive(Debug, Clone)]
pub struct StructuredApiSource {
    client: Client,
    base_url: String,
}

impl StructuredApiSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: trim_base(base_url.into()),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait::async_trait]
impl HoldingsSource for StructuredApiSource {
    async fn fetch_documents(&self, user_id: &str) -> Result<Vec<Value>, SourceError> {
        let url = format!("{}/v1/users/{user_id}/holdings", self.base_url);
        fetch_json_documents(&self.client, &url).await
    }

    fn name(&self) -> &str {
        "structured-api"
    }
}

/// Legacy portfolio API kept alive for older deployments.
///
/// `GET {base}/api/portfolio?user_id={user_id}`; records use the
/// pre-migration field names (`Qty`, `Total_Value`, ...), which the
/// normalizer resolves like any other schema generation.
#[derive(Debug, Clone)]
pub struct LegacyApiSource {
    client: Client,
    base_url: String,
}

impl LegacyApiSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: trim_base(base_url.into()),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait::async_trait]
impl HoldingsSource for LegacyApiSource {
    async fn fetch_documents(&self, user_id: &str) -> Result<Vec<Value>, SourceError> {
        let url = format!("{}/api/portfolio?user_id={user_id}", self.base_url);
        fetch_json_documents(&self.client, &url).await
    }

    fn name(&self) -> &str {
        "legacy-api"
    }
}

fn trim_base(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

async fn fetch_json_documents(client: &Client, url: &str) -> Result<Vec<Value>, SourceError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status(status));
    }

    let body: Value = response.json().await?;
    match body {
        Value::Array(documents) => Ok(documents),
        document @ Value::Object(_) => Ok(vec![document]),
        other => Err(SourceError::Malformed(format!(
            "expected array or object, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let source = StructuredApiSource::new("http://localhost:8080/");
        assert_eq!(source.base_url, "http://localhost:8080");

        let source = LegacyApiSource::new("http://localhost:8080");
        assert_eq!(source.base_url, "http://localhost:8080");
    }

    #[test]
    fn source_names() {
        assert_eq!(StructuredApiSource::new("x").name(), "structured-api");
        assert_eq!(LegacyApiSource::new("x").name(), "legacy-api");
    }
}
