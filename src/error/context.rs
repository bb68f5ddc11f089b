//! Call-site context attached to classified errors.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-form key/value context. Always carries the time it was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorContext {
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(default, flatten)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            timestamp: Utc::now(),
            operation: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Context for a named operation.
    pub fn for_operation(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Self::new()
        }
    }

    /// Builder: attach a metadata entry.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.metadata.get(key)
    }

    /// Merge `other` into `self`; entries in `other` win, the earlier timestamp is kept.
    pub fn merge(mut self, other: ErrorContext) -> Self {
        if self.operation.is_none() {
            self.operation = other.operation;
        }
        self.metadata.extend(other.metadata);
        self
    }
}
