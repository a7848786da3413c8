//! Bounded-concurrency work dispatch.
//!
//! The dispatcher is the sole place in the orchestration core where
//! concurrency and per-item failure containment are implemented. Every
//! composition strategy — pipeline, parallel map, delegation, voting —
//! funnels its executor calls through [`Dispatcher::run`].

use crate::ports::observer::{NoObserver, RunObserver, Stage};
use crate::ports::work_executor::{ExecutionError, WorkExecutor};
use std::sync::Arc;
use swarm_domain::{CapabilityTier, ConfigError, RunReport, WorkItem, WorkItemId, WorkResult};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What happens to in-flight items when the run is cancelled.
///
/// Items that have not started yet are always abandoned; this policy only
/// governs executions already in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CancelPolicy {
    /// Abandon in-flight executions immediately
    #[default]
    Abandon,
    /// Let in-flight executions finish; their results are still reported
    Drain,
}

/// Options for one dispatch run.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Maximum number of concurrently running items (must be > 0)
    pub max_concurrency: usize,
    /// Capability tier every item in this run executes at
    pub tier: CapabilityTier,
    /// Run-scoped cancellation signal
    pub cancellation: Option<CancellationToken>,
    /// Policy for in-flight items on cancellation
    pub on_cancel: CancelPolicy,
    /// Stage reported to the observer for this run
    pub stage: Stage,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            max_concurrency: 3,
            tier: CapabilityTier::Worker,
            cancellation: None,
            on_cancel: CancelPolicy::default(),
            stage: Stage::Dispatch,
        }
    }
}

impl DispatchOptions {
    /// Options with an explicit concurrency limit
    pub fn with_max_concurrency(max_concurrency: usize) -> Self {
        Self {
            max_concurrency,
            ..Self::default()
        }
    }

    /// Set the capability tier
    pub fn tier(mut self, tier: CapabilityTier) -> Self {
        self.tier = tier;
        self
    }

    /// Set the cancellation token
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Set the in-flight cancellation policy
    pub fn on_cancel(mut self, policy: CancelPolicy) -> Self {
        self.on_cancel = policy;
        self
    }

    /// Set the observer stage
    pub fn stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }

    /// Arm a timeout: returns a token that cancels itself after `timeout`
    /// and attaches it to these options.
    ///
    /// Must be called within a tokio runtime.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        let token = CancellationToken::new();
        let timer = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            timer.cancel();
        });
        self.cancellation = Some(token);
        self
    }
}

/// Outcome of one spawned execution task.
enum TaskOutcome {
    Completed(WorkResult),
    Abandoned(WorkItemId),
}

/// Runs a batch of work items concurrently against the executor,
/// enforcing a maximum concurrency and capturing per-item failures.
///
/// Per-item failure is a first-class outcome: a failing item is recorded
/// in the report and never cancels its siblings.
pub struct Dispatcher<E: WorkExecutor + 'static> {
    executor: Arc<E>,
}

impl<E: WorkExecutor + 'static> Dispatcher<E> {
    pub fn new(executor: Arc<E>) -> Self {
        Self { executor }
    }

    /// The executor this dispatcher runs against
    pub fn executor(&self) -> &Arc<E> {
        &self.executor
    }

    /// Run all items with default (no-op) observation.
    pub async fn run(
        &self,
        items: Vec<WorkItem>,
        options: DispatchOptions,
    ) -> Result<RunReport, ConfigError> {
        self.run_with_observer(items, options, &NoObserver).await
    }

    /// Run all items, reporting per-item completion to the observer.
    ///
    /// Results accumulate in completion order; the single collector loop
    /// below is the only writer, so each item's slot is written exactly
    /// once. Callers needing positional correspondence must correlate via
    /// [`WorkItemId`].
    pub async fn run_with_observer(
        &self,
        items: Vec<WorkItem>,
        options: DispatchOptions,
        observer: &dyn RunObserver,
    ) -> Result<RunReport, ConfigError> {
        if options.max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }

        let submitted = items.len();
        observer.on_stage_start(options.stage, submitted);

        if items.is_empty() {
            observer.on_stage_complete(options.stage);
            return Ok(RunReport::new(vec![], vec![], false));
        }

        // Effective concurrency never exceeds the number of items.
        let permits = options.max_concurrency.min(submitted);
        let semaphore = Arc::new(Semaphore::new(permits));

        debug!(
            stage = %options.stage,
            items = submitted,
            concurrency = permits,
            "Dispatching work items"
        );

        let mut join_set = JoinSet::new();

        for item in items {
            let executor = Arc::clone(&self.executor);
            let semaphore = Arc::clone(&semaphore);
            let cancellation = options.cancellation.clone();
            let on_cancel = options.on_cancel;
            let tier = options.tier;

            join_set.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    // The semaphore is never closed; treat this as abandonment.
                    Err(_) => return TaskOutcome::Abandoned(item.id),
                };
                execute_item(executor, item, tier, cancellation, on_cancel).await
            });
        }

        let mut results = Vec::with_capacity(submitted);
        let mut abandoned = Vec::new();

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(TaskOutcome::Completed(result)) => {
                    let success = result.is_success();
                    if success {
                        debug!(item = %result.item.label(), "Work item completed");
                    } else {
                        warn!(
                            item = %result.item.label(),
                            error = result.error().unwrap_or(""),
                            "Work item failed"
                        );
                    }
                    observer.on_item_complete(options.stage, &result.item.label(), success);
                    results.push(result);
                }
                Ok(TaskOutcome::Abandoned(id)) => {
                    debug!(item = %id, "Work item abandoned after cancellation");
                    abandoned.push(id);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        let cancelled = options
            .cancellation
            .as_ref()
            .map(|t| t.is_cancelled())
            .unwrap_or(false);

        if cancelled {
            info!(
                stage = %options.stage,
                completed = results.len(),
                abandoned = abandoned.len(),
                "Run cancelled"
            );
        }

        observer.on_stage_complete(options.stage);
        Ok(RunReport::new(results, abandoned, cancelled))
    }
}

/// Execute one item, honoring cancellation.
///
/// Items observed as cancelled before their execution starts are always
/// abandoned; an in-flight execution is raced against the token only
/// under [`CancelPolicy::Abandon`].
async fn execute_item<E: WorkExecutor>(
    executor: Arc<E>,
    item: WorkItem,
    tier: CapabilityTier,
    cancellation: Option<CancellationToken>,
    on_cancel: CancelPolicy,
) -> TaskOutcome {
    if let Some(token) = &cancellation
        && token.is_cancelled()
    {
        return TaskOutcome::Abandoned(item.id);
    }

    let payload = item.payload.clone();
    let worker = item.worker.clone();
    let execution = executor.execute(&payload, worker.as_deref(), tier);

    match (cancellation, on_cancel) {
        (Some(token), CancelPolicy::Abandon) => {
            tokio::select! {
                _ = token.cancelled() => TaskOutcome::Abandoned(item.id),
                outcome = execution => TaskOutcome::Completed(into_result(item, outcome)),
            }
        }
        _ => TaskOutcome::Completed(into_result(item, execution.await)),
    }
}

fn into_result(item: WorkItem, outcome: Result<String, ExecutionError>) -> WorkResult {
    match outcome {
        Ok(output) => WorkResult::completed(item, output),
        Err(e) => WorkResult::failed(item, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Echoes the payload back.
    struct EchoExecutor;

    #[async_trait]
    impl WorkExecutor for EchoExecutor {
        async fn execute(
            &self,
            payload: &str,
            _worker: Option<&str>,
            _tier: CapabilityTier,
        ) -> Result<String, ExecutionError> {
            Ok(format!("echo: {}", payload))
        }
    }

    /// Fails deterministically for payloads containing the needle.
    struct FailOn {
        needle: String,
    }

    #[async_trait]
    impl WorkExecutor for FailOn {
        async fn execute(
            &self,
            payload: &str,
            _worker: Option<&str>,
            _tier: CapabilityTier,
        ) -> Result<String, ExecutionError> {
            if payload.contains(&self.needle) {
                Err(ExecutionError::Backend("injected failure".to_string()))
            } else {
                Ok(format!("ok: {}", payload))
            }
        }
    }

    /// Records the maximum number of simultaneously in-flight calls.
    struct InFlightProbe {
        current: AtomicUsize,
        max: AtomicUsize,
    }

    impl InFlightProbe {
        fn new() -> Self {
            Self {
                current: AtomicUsize::new(0),
                max: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl WorkExecutor for InFlightProbe {
        async fn execute(
            &self,
            payload: &str,
            _worker: Option<&str>,
            _tier: CapabilityTier,
        ) -> Result<String, ExecutionError> {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.max.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            Ok(payload.to_string())
        }
    }

    /// Never completes; used to exercise cancellation of in-flight work.
    struct BlockForever;

    #[async_trait]
    impl WorkExecutor for BlockForever {
        async fn execute(
            &self,
            _payload: &str,
            _worker: Option<&str>,
            _tier: CapabilityTier,
        ) -> Result<String, ExecutionError> {
            std::future::pending::<()>().await;
            unreachable!()
        }
    }

    /// Signals when execution starts, then waits for the test to open a gate.
    struct GatedExecutor {
        started: AtomicUsize,
        gate: Semaphore,
    }

    impl GatedExecutor {
        fn new() -> Self {
            Self {
                started: AtomicUsize::new(0),
                gate: Semaphore::new(0),
            }
        }
    }

    #[async_trait]
    impl WorkExecutor for GatedExecutor {
        async fn execute(
            &self,
            payload: &str,
            _worker: Option<&str>,
            _tier: CapabilityTier,
        ) -> Result<String, ExecutionError> {
            self.started.fetch_add(1, Ordering::SeqCst);
            let _permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| ExecutionError::Other(e.to_string()))?;
            Ok(format!("drained: {}", payload))
        }
    }

    fn items(n: u64) -> Vec<WorkItem> {
        (0..n)
            .map(|i| WorkItem::new(i, format!("input-{}", i)))
            .collect()
    }

    #[tokio::test]
    async fn test_report_is_complete_and_attributable() {
        let dispatcher = Dispatcher::new(Arc::new(EchoExecutor));
        let report = dispatcher
            .run(items(10), DispatchOptions::with_max_concurrency(4))
            .await
            .unwrap();

        assert_eq!(report.len(), 10);
        assert!(report.is_complete());
        assert!(!report.cancelled);
        for i in 0..10 {
            let result = report.result_for(WorkItemId(i)).unwrap();
            assert_eq!(result.output(), Some(format!("echo: input-{}", i).as_str()));
        }
    }

    #[tokio::test]
    async fn test_one_failure_does_not_affect_siblings() {
        let dispatcher = Dispatcher::new(Arc::new(FailOn {
            needle: "input-3".to_string(),
        }));
        let report = dispatcher
            .run(items(5), DispatchOptions::with_max_concurrency(5))
            .await
            .unwrap();

        assert_eq!(report.len(), 5);
        assert_eq!(report.success_count(), 4);
        let failed = report.result_for(WorkItemId(3)).unwrap();
        assert!(!failed.is_success());
        assert!(failed.error().unwrap().contains("injected failure"));
    }

    #[tokio::test]
    async fn test_zero_concurrency_rejected_before_dispatch() {
        let dispatcher = Dispatcher::new(Arc::new(EchoExecutor));
        let err = dispatcher
            .run(items(3), DispatchOptions::with_max_concurrency(0))
            .await
            .unwrap_err();

        assert_eq!(err, ConfigError::ZeroConcurrency);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_bound_is_never_exceeded() {
        let probe = Arc::new(InFlightProbe::new());
        let dispatcher = Dispatcher::new(Arc::clone(&probe));
        let report = dispatcher
            .run(items(20), DispatchOptions::with_max_concurrency(3))
            .await
            .unwrap();

        assert_eq!(report.len(), 20);
        assert!(probe.max.load(Ordering::SeqCst) <= 3);
        // The bound should actually be reached with 20 items.
        assert_eq!(probe.max.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_empty_batch_yields_empty_report() {
        let dispatcher = Dispatcher::new(Arc::new(EchoExecutor));
        let report = dispatcher
            .run(vec![], DispatchOptions::with_max_concurrency(3))
            .await
            .unwrap();

        assert!(report.is_empty());
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn test_precancelled_run_abandons_everything() {
        let token = CancellationToken::new();
        token.cancel();

        let dispatcher = Dispatcher::new(Arc::new(EchoExecutor));
        let options = DispatchOptions::with_max_concurrency(2).cancellation(token);
        let report = dispatcher.run(items(4), options).await.unwrap();

        assert!(report.cancelled);
        assert!(report.is_empty());
        assert_eq!(report.abandoned.len(), 4);
    }

    #[tokio::test]
    async fn test_abandon_policy_drops_in_flight_work() {
        let token = CancellationToken::new();
        let dispatcher = Dispatcher::new(Arc::new(BlockForever));
        let options = DispatchOptions::with_max_concurrency(2)
            .cancellation(token.clone())
            .on_cancel(CancelPolicy::Abandon);

        let canceller = token.clone();
        let (report, _) = tokio::join!(dispatcher.run(items(3), options), async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let report = report.unwrap();
        assert!(report.cancelled);
        assert!(report.is_empty());
        assert_eq!(report.abandoned.len(), 3);
    }

    #[tokio::test]
    async fn test_drain_policy_lets_in_flight_work_finish() {
        let executor = Arc::new(GatedExecutor::new());
        let token = CancellationToken::new();
        let options = DispatchOptions::with_max_concurrency(2)
            .cancellation(token.clone())
            .on_cancel(CancelPolicy::Drain);

        let dispatcher = Dispatcher::new(Arc::clone(&executor));
        let handle = tokio::spawn(async move { dispatcher.run(items(3), options).await });

        // Wait until two items are in flight, then cancel and open the gate.
        while executor.started.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }
        token.cancel();
        executor.gate.add_permits(2);

        let report = handle.await.unwrap().unwrap();
        assert!(report.cancelled);
        // The two in-flight items finished; the queued one was abandoned.
        assert_eq!(report.len(), 2);
        assert_eq!(report.abandoned.len(), 1);
        assert!(report.results.iter().all(|r| r.is_success()));
    }

    #[tokio::test]
    async fn test_observer_sees_each_completion() {
        use std::sync::Mutex;

        struct Recording {
            events: Mutex<Vec<String>>,
        }

        impl RunObserver for Recording {
            fn on_stage_start(&self, stage: Stage, total: usize) {
                self.events
                    .lock()
                    .unwrap()
                    .push(format!("start {} {}", stage, total));
            }
            fn on_item_complete(&self, _stage: Stage, label: &str, success: bool) {
                self.events
                    .lock()
                    .unwrap()
                    .push(format!("item {} {}", label, success));
            }
            fn on_stage_complete(&self, stage: Stage) {
                self.events.lock().unwrap().push(format!("end {}", stage));
            }
        }

        let observer = Recording {
            events: Mutex::new(vec![]),
        };
        let dispatcher = Dispatcher::new(Arc::new(EchoExecutor));
        dispatcher
            .run_with_observer(
                items(2),
                DispatchOptions::with_max_concurrency(2),
                &observer,
            )
            .await
            .unwrap();

        let events = observer.events.lock().unwrap();
        assert_eq!(events.first().unwrap(), "start dispatch 2");
        assert_eq!(events.last().unwrap(), "end dispatch");
        assert_eq!(events.len(), 4);
    }
}
