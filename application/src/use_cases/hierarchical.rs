//! Hierarchical coordination use case.
//!
//! Delegates one task to a named set of specialized workers in parallel,
//! then reconciles their reports through a single higher-tier synthesis
//! call. Degraded delegation is tolerated — a failed worker contributes
//! no report — but synthesizing from nothing is not.

use crate::dispatcher::DispatchOptions;
use crate::ports::observer::{NoObserver, RunObserver, Stage};
use crate::ports::work_executor::WorkExecutor;
use crate::use_cases::parallel_map::ParallelMapper;
use std::collections::BTreeMap;
use std::sync::Arc;
use swarm_domain::{
    CapabilityTier, ConfigError, PromptTemplate, WorkItem, WorkOutcome, WorkerSet,
};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur during hierarchical coordination
#[derive(Error, Debug)]
pub enum CoordinatorError {
    /// Every delegated worker failed; there is nothing to synthesize.
    #[error("All delegated workers failed")]
    AllWorkersFailed,

    /// Synthesis was requested with an empty report set.
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Coordination cancelled")]
    Cancelled,
}

/// Delegates a task to specialized workers and synthesizes their reports
/// into one answer.
///
/// Holds an immutable [`WorkerSet`] plus two capability tiers: one for
/// delegated workers, one for the synthesis stage. The worker set is
/// validated at construction; duplicate names never reach delegation.
pub struct HierarchicalCoordinator<E: WorkExecutor + 'static> {
    workers: WorkerSet,
    mapper: ParallelMapper<E>,
    worker_tier: CapabilityTier,
    synthesis_tier: CapabilityTier,
}

impl<E: WorkExecutor + 'static> HierarchicalCoordinator<E> {
    pub fn new(executor: Arc<E>, workers: WorkerSet) -> Self {
        Self {
            workers,
            mapper: ParallelMapper::new(executor),
            worker_tier: CapabilityTier::Worker,
            synthesis_tier: CapabilityTier::Coordinator,
        }
    }

    /// Override the capability tiers for delegation and synthesis
    pub fn with_tiers(mut self, worker: CapabilityTier, synthesis: CapabilityTier) -> Self {
        self.worker_tier = worker;
        self.synthesis_tier = synthesis;
        self
    }

    /// The workers this coordinator delegates to
    pub fn workers(&self) -> &WorkerSet {
        &self.workers
    }

    /// Delegate then synthesize — the externally visible entry point.
    pub async fn execute(
        &self,
        task: &str,
        options: DispatchOptions,
    ) -> Result<String, CoordinatorError> {
        self.execute_with_observer(task, options, &NoObserver).await
    }

    /// Delegate then synthesize, reporting progress to the observer.
    ///
    /// Fails with [`CoordinatorError::AllWorkersFailed`] when delegation
    /// yields zero successful reports; the synthesis stage is never
    /// invoked in that case.
    pub async fn execute_with_observer(
        &self,
        task: &str,
        options: DispatchOptions,
        observer: &dyn RunObserver,
    ) -> Result<String, CoordinatorError> {
        info!(workers = self.workers.len(), "Starting hierarchical coordination");

        let reports = self
            .delegate_with_observer(task, options.clone(), observer)
            .await?;

        if reports.is_empty() {
            return Err(CoordinatorError::AllWorkersFailed);
        }

        self.synthesize_with_observer(task, &reports, options, observer)
            .await
    }

    /// Delegate the task to every worker in parallel.
    pub async fn delegate(
        &self,
        task: &str,
        options: DispatchOptions,
    ) -> Result<BTreeMap<String, String>, CoordinatorError> {
        self.delegate_with_observer(task, options, &NoObserver).await
    }

    /// Delegate the task, reporting progress to the observer.
    ///
    /// Returns a mapping keyed by worker name. A worker whose execution
    /// failed contributes no entry, so the mapping may be a strict subset
    /// of the worker set; each failure is logged. Cancellation aborts the
    /// whole delegation — a truncated report set is never returned.
    pub async fn delegate_with_observer(
        &self,
        task: &str,
        options: DispatchOptions,
        observer: &dyn RunObserver,
    ) -> Result<BTreeMap<String, String>, CoordinatorError> {
        let items: Vec<WorkItem> = self
            .workers
            .iter()
            .enumerate()
            .map(|(i, worker)| {
                WorkItem::for_worker(
                    i as u64,
                    PromptTemplate::worker_payload(&worker.role, task),
                    &worker.name,
                )
            })
            .collect();

        let options = options.tier(self.worker_tier).stage(Stage::Delegate);
        let report = self.mapper.dispatch_ordered(items, options, observer).await?;

        if report.cancelled {
            return Err(CoordinatorError::Cancelled);
        }

        let mut reports = BTreeMap::new();
        for result in report.results {
            let name = result.item.label();
            match result.outcome {
                WorkOutcome::Completed { output } => {
                    info!(worker = %name, "Worker completed");
                    reports.insert(name, output);
                }
                WorkOutcome::Failed { error } => {
                    warn!(worker = %name, error = %error, "Worker failed, excluding from synthesis");
                }
            }
        }

        Ok(reports)
    }

    /// Reconcile collected worker reports into one final answer.
    pub async fn synthesize(
        &self,
        task: &str,
        reports: &BTreeMap<String, String>,
        options: DispatchOptions,
    ) -> Result<String, CoordinatorError> {
        self.synthesize_with_observer(task, reports, options, &NoObserver)
            .await
    }

    /// Reconcile reports, reporting progress to the observer.
    ///
    /// Issues a single synthesis-tier call whose payload embeds the
    /// original task and all collected reports. An empty report set is a
    /// caller error, reported as [`ConfigError::EmptyReports`].
    pub async fn synthesize_with_observer(
        &self,
        task: &str,
        reports: &BTreeMap<String, String>,
        options: DispatchOptions,
        observer: &dyn RunObserver,
    ) -> Result<String, CoordinatorError> {
        if reports.is_empty() {
            return Err(ConfigError::EmptyReports.into());
        }

        info!(reports = reports.len(), "Synthesizing worker reports");

        let payload = PromptTemplate::synthesis_payload(
            task,
            reports.iter().map(|(n, r)| (n.as_str(), r.as_str())),
        );
        let item = WorkItem::for_worker(0, payload, "coordinator");
        let options = DispatchOptions {
            max_concurrency: 1,
            tier: self.synthesis_tier,
            stage: Stage::Synthesis,
            ..options
        };

        let report = self
            .mapper
            .dispatch_ordered(vec![item], options, observer)
            .await?;

        let Some(result) = report.results.into_iter().next() else {
            return Err(CoordinatorError::Cancelled);
        };

        match result.outcome {
            WorkOutcome::Completed { output } => Ok(output),
            WorkOutcome::Failed { error } => Err(CoordinatorError::SynthesisFailed(error)),
        }
    }
}
