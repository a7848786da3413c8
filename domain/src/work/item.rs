//! Work item value objects

use serde::{Deserialize, Serialize};

/// Opaque identifier for a work item within one orchestration run.
///
/// Callers that need positional correspondence after a concurrent run must
/// correlate results via this id, never via array position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkItemId(pub u64);

impl WorkItemId {
    /// Get the raw id value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for WorkItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

/// One discrete request submitted for execution against the compute
/// backend. Immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Identifier, unique within one run
    pub id: WorkItemId,
    /// The execution payload handed to the executor
    pub payload: String,
    /// Optional worker identity this item is framed for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker: Option<String>,
}

impl WorkItem {
    /// Create a work item without a worker identity
    pub fn new(id: u64, payload: impl Into<String>) -> Self {
        Self {
            id: WorkItemId(id),
            payload: payload.into(),
            worker: None,
        }
    }

    /// Create a work item framed for a named worker
    pub fn for_worker(id: u64, payload: impl Into<String>, worker: impl Into<String>) -> Self {
        Self {
            id: WorkItemId(id),
            payload: payload.into(),
            worker: Some(worker.into()),
        }
    }

    /// Label used for logging: the worker name if present, the id otherwise
    pub fn label(&self) -> String {
        match &self.worker {
            Some(name) => name.clone(),
            None => self.id.to_string(),
        }
    }
}
