//! Run observation port
//!
//! Defines the interface for reporting progress during an orchestration
//! run. Implementations live in the infrastructure layer (e.g. a JSONL
//! event log); the core never owns console output itself.

/// Orchestration stage an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Raw dispatch of a batch of work items
    Dispatch,
    /// One sequential pipeline step
    Pipeline,
    /// Parallel map over independent inputs
    Map,
    /// Hierarchical delegation to specialized workers
    Delegate,
    /// Second-stage synthesis call
    Synthesis,
    /// Consensus ballot collection
    Vote,
}

impl Stage {
    /// Stable string identifier for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Dispatch => "dispatch",
            Stage::Pipeline => "pipeline",
            Stage::Map => "map",
            Stage::Delegate => "delegate",
            Stage::Synthesis => "synthesis",
            Stage::Vote => "vote",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Callback for progress updates during an orchestration run
pub trait RunObserver: Send + Sync {
    /// Called when a stage starts, with the number of items it will run
    fn on_stage_start(&self, stage: Stage, total_items: usize);

    /// Called when one item completes within a stage
    fn on_item_complete(&self, stage: Stage, label: &str, success: bool);

    /// Called when a stage completes
    fn on_stage_complete(&self, stage: Stage);
}

/// No-op observer for when progress reporting is not needed
pub struct NoObserver;

impl RunObserver for NoObserver {
    fn on_stage_start(&self, _stage: Stage, _total_items: usize) {}
    fn on_item_complete(&self, _stage: Stage, _label: &str, _success: bool) {}
    fn on_stage_complete(&self, _stage: Stage) {}
}
