use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One worker or worker pool exactly as the API returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: Map<String, Value>,
}

impl Record {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// String field, or empty when absent or not a string.
    pub fn str_field(&self, key: &str) -> &str {
        self.data.get(key).and_then(Value::as_str).unwrap_or("")
    }
}

/// Single-level map from compound key to scalar (or unexpanded array).
pub type FlatRow = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Worker,
    WorkerPool,
}

impl RecordKind {
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Worker => "workers",
            RecordKind::WorkerPool => "worker pools",
        }
    }
}

/// One page of a paged listing.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<Record>,
    pub continuation_token: Option<String>,
}

/// Named column projection for a reduced CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvViewDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub columns: &'static [&'static str],
}

/// Everything the load step writes and prints.
#[derive(Debug, Clone)]
pub struct StatsReport {
    pub summary: String,
    pub csv: Option<crate::core::projector::Table>,
}
