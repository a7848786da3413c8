//! Parallel map use case.
//!
//! Applies one instruction concurrently over a set of independent inputs
//! and restores input order afterwards, so callers can always zip inputs
//! with results positionally regardless of completion order.

use crate::dispatcher::{DispatchOptions, Dispatcher};
use crate::ports::observer::{NoObserver, RunObserver, Stage};
use crate::ports::work_executor::WorkExecutor;
use std::sync::Arc;
use swarm_domain::{
    CapabilityTier, ConfigError, PromptTemplate, RunReport, WorkItem, WorkOutcome, WorkResult,
};
use thiserror::Error;
use tracing::info;

/// Errors that can occur during parallel mapping
#[derive(Error, Debug)]
pub enum MapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No completed pairs to synthesize")]
    NoPairs,

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Synthesis cancelled")]
    SynthesisCancelled,
}

/// Result of one parallel map run.
///
/// `pairs` holds one entry per *completed* input, in input order. Under
/// cancellation the never-completed inputs are listed in `abandoned` and
/// `cancelled` is set — results are never fabricated for them.
#[derive(Debug, Clone)]
pub struct MapReport {
    /// `(input, result)` pairs in input order
    pub pairs: Vec<(String, WorkResult)>,
    /// Inputs whose items never completed (cancellation only)
    pub abandoned: Vec<String>,
    /// Whether the run was cancelled
    pub cancelled: bool,
}

impl MapReport {
    /// `(input, output)` pairs for the successful results only.
    pub fn output_pairs(&self) -> Vec<(String, String)> {
        self.pairs
            .iter()
            .filter_map(|(input, result)| {
                result.output().map(|o| (input.clone(), o.to_string()))
            })
            .collect()
    }

    /// Number of successful results.
    pub fn success_count(&self) -> usize {
        self.pairs.iter().filter(|(_, r)| r.is_success()).count()
    }
}

/// Composes executor calls concurrently over independent inputs sharing
/// one task description.
pub struct ParallelMapper<E: WorkExecutor + 'static> {
    dispatcher: Dispatcher<E>,
}

impl<E: WorkExecutor + 'static> ParallelMapper<E> {
    pub fn new(executor: Arc<E>) -> Self {
        Self {
            dispatcher: Dispatcher::new(executor),
        }
    }

    /// Map with default (no-op) observation.
    pub async fn run(
        &self,
        instruction: &str,
        inputs: &[String],
        options: DispatchOptions,
    ) -> Result<MapReport, MapError> {
        self.run_with_observer(instruction, inputs, options, &NoObserver)
            .await
    }

    /// Map the instruction over every input concurrently.
    ///
    /// Item ids are input positions; the dispatcher's completion-ordered
    /// report is re-sorted by id before returning.
    pub async fn run_with_observer(
        &self,
        instruction: &str,
        inputs: &[String],
        options: DispatchOptions,
        observer: &dyn RunObserver,
    ) -> Result<MapReport, MapError> {
        info!(inputs = inputs.len(), "Starting parallel map");

        let items: Vec<WorkItem> = inputs
            .iter()
            .enumerate()
            .map(|(i, input)| {
                WorkItem::new(i as u64, PromptTemplate::map_payload(instruction, input))
            })
            .collect();

        let report = self
            .dispatch_ordered(items, options.stage(Stage::Map), observer)
            .await?;

        let cancelled = report.cancelled;
        let abandoned = report
            .abandoned
            .iter()
            .filter_map(|id| inputs.get(id.value() as usize).cloned())
            .collect();
        let pairs = report
            .results
            .into_iter()
            .filter_map(|result| {
                let input = inputs.get(result.item.id.value() as usize)?;
                Some((input.clone(), result))
            })
            .collect();

        Ok(MapReport {
            pairs,
            abandoned,
            cancelled,
        })
    }

    /// Dispatch pre-built items and restore submission order by item id.
    ///
    /// Building block shared with the hierarchical coordinator, which
    /// frames one item per worker instead of one per input.
    pub async fn dispatch_ordered(
        &self,
        items: Vec<WorkItem>,
        options: DispatchOptions,
        observer: &dyn RunObserver,
    ) -> Result<RunReport, ConfigError> {
        let mut report = self
            .dispatcher
            .run_with_observer(items, options, observer)
            .await?;
        report.results.sort_by_key(|r| r.item.id);
        report.abandoned.sort();
        Ok(report)
    }

    /// Merge independent `(input, output)` pairs into one summary.
    ///
    /// This is an explicit, separate call at the coordinator tier — it is
    /// never performed implicitly as part of [`ParallelMapper::run`].
    pub async fn synthesize(
        &self,
        instruction: &str,
        pairs: &[(String, String)],
        options: DispatchOptions,
    ) -> Result<String, MapError> {
        self.synthesize_with_observer(instruction, pairs, options, &NoObserver)
            .await
    }

    /// Merge pairs into one summary, reporting to the observer.
    pub async fn synthesize_with_observer(
        &self,
        instruction: &str,
        pairs: &[(String, String)],
        options: DispatchOptions,
        observer: &dyn RunObserver,
    ) -> Result<String, MapError> {
        if pairs.is_empty() {
            return Err(MapError::NoPairs);
        }

        info!(pairs = pairs.len(), "Synthesizing map results");

        let payload = PromptTemplate::map_summary_payload(
            instruction,
            pairs.iter().map(|(i, o)| (i.as_str(), o.as_str())),
        );
        let item = WorkItem::new(0, payload);
        let options = DispatchOptions {
            max_concurrency: 1,
            tier: CapabilityTier::Coordinator,
            stage: Stage::Synthesis,
            ..options
        };

        let report = self
            .dispatcher
            .run_with_observer(vec![item], options, observer)
            .await?;

        let Some(result) = report.results.into_iter().next() else {
            return Err(MapError::SynthesisCancelled);
        };

        match result.outcome {
            WorkOutcome::Completed { output } => Ok(output),
            WorkOutcome::Failed { error } => Err(MapError::SynthesisFailed(error)),
        }
    }
}
