//! Run results and the per-run report.
//!
//! [`WorkResult`] pairs a submitted [`WorkItem`] with exactly one outcome:
//! completed output or a captured failure. [`RunReport`] is the dispatcher's
//! accumulator; every submitted item is accounted for exactly once, either
//! as a result or (only under cancellation) as an abandoned id.

use super::item::{WorkItem, WorkItemId};
use serde::{Deserialize, Serialize};

/// Outcome of executing one work item.
///
/// Exactly one variant is populated per item; a failure here is an
/// item-scoped, expected condition, not a run-level error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum WorkOutcome {
    /// The executor produced output
    Completed { output: String },
    /// The executor signaled a failure for this item
    Failed { error: String },
}

/// Result of one work item: the originating item plus its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkResult {
    /// The item this result belongs to
    pub item: WorkItem,
    /// What happened to it
    pub outcome: WorkOutcome,
}

impl WorkResult {
    /// Creates a successful result carrying the executor's output.
    pub fn completed(item: WorkItem, output: impl Into<String>) -> Self {
        Self {
            item,
            outcome: WorkOutcome::Completed {
                output: output.into(),
            },
        }
    }

    /// Creates a failed result capturing why the executor could not
    /// complete this item.
    pub fn failed(item: WorkItem, error: impl Into<String>) -> Self {
        Self {
            item,
            outcome: WorkOutcome::Failed {
                error: error.into(),
            },
        }
    }

    /// Returns `true` if this item completed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, WorkOutcome::Completed { .. })
    }

    /// The output text, if this item completed.
    pub fn output(&self) -> Option<&str> {
        match &self.outcome {
            WorkOutcome::Completed { output } => Some(output),
            WorkOutcome::Failed { .. } => None,
        }
    }

    /// The captured error, if this item failed.
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            WorkOutcome::Completed { .. } => None,
            WorkOutcome::Failed { error } => Some(error),
        }
    }
}

/// Accumulated results of one dispatch run.
///
/// `results` is in completion order, which may differ from submission
/// order; correlate via [`WorkItemId`]. Under cancellation,
/// never-completed items are listed in `abandoned` — no partial result is
/// fabricated for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Results in completion order
    pub results: Vec<WorkResult>,
    /// Items abandoned because the run was cancelled before they completed
    pub abandoned: Vec<WorkItemId>,
    /// Whether the run was cancelled
    pub cancelled: bool,
}

impl RunReport {
    /// Create a report from collected results.
    pub fn new(results: Vec<WorkResult>, abandoned: Vec<WorkItemId>, cancelled: bool) -> Self {
        Self {
            results,
            abandoned,
            cancelled,
        }
    }

    /// Number of completed items (successes and captured failures).
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True when no item completed.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// True when every submitted item produced a result.
    pub fn is_complete(&self) -> bool {
        self.abandoned.is_empty()
    }

    /// Look up the result for a specific item.
    pub fn result_for(&self, id: WorkItemId) -> Option<&WorkResult> {
        self.results.iter().find(|r| r.item.id == id)
    }

    /// Iterate over successful results only.
    pub fn successes(&self) -> impl Iterator<Item = &WorkResult> {
        self.results.iter().filter(|r| r.is_success())
    }

    /// Iterate over failed results only.
    pub fn failures(&self) -> impl Iterator<Item = &WorkResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    /// Number of successful results.
    pub fn success_count(&self) -> usize {
        self.successes().count()
    }

    /// Consume the report and return results sorted by item id.
    ///
    /// Restores submission order when ids were assigned positionally.
    pub fn into_ordered(mut self) -> Vec<WorkResult> {
        self.results.sort_by_key(|r| r.item.id);
        self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64) -> WorkItem {
        WorkItem::new(id, format!("payload {}", id))
    }

    #[test]
    fn test_outcome_exclusivity() {
        let ok = WorkResult::completed(item(0), "out");
        assert!(ok.is_success());
        assert_eq!(ok.output(), Some("out"));
        assert_eq!(ok.error(), None);

        let bad = WorkResult::failed(item(1), "boom");
        assert!(!bad.is_success());
        assert_eq!(bad.output(), None);
        assert_eq!(bad.error(), Some("boom"));
    }

    #[test]
    fn test_report_lookup_by_id() {
        let report = RunReport::new(
            vec![
                WorkResult::completed(item(2), "c"),
                WorkResult::completed(item(0), "a"),
                WorkResult::failed(item(1), "err"),
            ],
            vec![],
            false,
        );

        assert!(report.is_complete());
        assert_eq!(report.len(), 3);
        assert_eq!(report.success_count(), 2);
        assert_eq!(
            report.result_for(WorkItemId(0)).and_then(|r| r.output()),
            Some("a")
        );
        assert!(report.result_for(WorkItemId(7)).is_none());
    }

    #[test]
    fn test_into_ordered_restores_submission_order() {
        let report = RunReport::new(
            vec![
                WorkResult::completed(item(2), "c"),
                WorkResult::completed(item(0), "a"),
                WorkResult::completed(item(1), "b"),
            ],
            vec![],
            false,
        );

        let ordered = report.into_ordered();
        let ids: Vec<u64> = ordered.iter().map(|r| r.item.id.value()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_cancelled_report_accounts_for_abandoned_items() {
        let report = RunReport::new(
            vec![WorkResult::completed(item(0), "a")],
            vec![WorkItemId(1), WorkItemId(2)],
            true,
        );

        assert!(report.cancelled);
        assert!(!report.is_complete());
        assert_eq!(report.len(), 1);
        assert_eq!(report.abandoned.len(), 2);
    }

    #[test]
    fn test_outcome_serialization_shape() {
        let ok = WorkResult::completed(item(0), "out");
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["outcome"]["status"], "completed");
        assert_eq!(json["outcome"]["output"], "out");
    }
}
