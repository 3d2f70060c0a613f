use async_trait::async_trait;
use foliohealth::sources::{HoldingsSource, SourceError};
use serde_json::{json, Value};

/// Source returning a fixed document list, or failing on demand.
pub struct StaticSource {
    name: String,
    documents: Vec<Value>,
    fail: bool,
}

impl StaticSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Vec::new(),
            fail: false,
        }
    }

    pub fn with_documents(mut self, documents: Vec<Value>) -> Self {
        self.documents = documents;
        self
    }

    pub fn fail_on_fetch(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl HoldingsSource for StaticSource {
    async fn fetch_documents(&self, _user_id: &str) -> Result<Vec<Value>, SourceError> {
        if self.fail {
            return Err(SourceError::Malformed("static source failure".to_string()));
        }
        Ok(self.documents.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub fn aapl_record() -> Value {
    json!({
        "symbol": "AAPL",
        "shares": 100,
        "total_value": 17500.0,
        "total_cost": 16625.0,
    })
}

pub fn legacy_bond_record() -> Value {
    json!({
        "Ticker": "BND",
        "Qty": 10,
        "position_value": 720.0,
        "Category": "bond",
        "Brokerage": "Vanguard",
    })
}
