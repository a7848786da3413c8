//! Sequential pipeline use case.
//!
//! Each step's output feeds the next step's input — a true data
//! dependency, so steps are never reordered or parallelized. Unlike the
//! fan-out strategies, a step failure here aborts the whole run.

use crate::dispatcher::{DispatchOptions, Dispatcher};
use crate::ports::observer::{NoObserver, RunObserver, Stage};
use crate::ports::work_executor::WorkExecutor;
use std::sync::Arc;
use swarm_domain::{ConfigError, PromptTemplate, WorkItem, WorkOutcome};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// One pipeline step: an instruction applied to the previous output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSpec {
    pub instruction: String,
}

impl StepSpec {
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
        }
    }
}

/// Errors that can occur during pipeline execution
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A step's execution failed; later steps were never invoked.
    /// Steps are numbered from 1.
    #[error("Pipeline step {step} failed: {reason}")]
    StepFailed { step: usize, reason: String },

    #[error("Pipeline cancelled at step {step}")]
    Cancelled { step: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Composes executor calls strictly in sequence, piping each step's
/// output into the next step's payload.
///
/// No retry is attempted inside the pipeline itself; retry is a policy
/// the executor or a wrapping layer may add.
pub struct Pipeline<E: WorkExecutor + 'static> {
    dispatcher: Dispatcher<E>,
}

impl<E: WorkExecutor + 'static> Pipeline<E> {
    pub fn new(executor: Arc<E>) -> Self {
        Self {
            dispatcher: Dispatcher::new(executor),
        }
    }

    /// Run the pipeline with default (no-op) observation.
    pub async fn run(
        &self,
        initial_input: &str,
        steps: &[StepSpec],
        cancellation: Option<CancellationToken>,
    ) -> Result<String, PipelineError> {
        self.run_with_observer(initial_input, steps, cancellation, &NoObserver)
            .await
    }

    /// Run the pipeline, reporting step completion to the observer.
    ///
    /// Step *k+1* receives its own instruction combined with step *k*'s
    /// output — never the original input. Fails fast on the first step
    /// whose execution fails, identifying the step by 1-based number.
    /// An empty step list returns the initial input unchanged.
    pub async fn run_with_observer(
        &self,
        initial_input: &str,
        steps: &[StepSpec],
        cancellation: Option<CancellationToken>,
        observer: &dyn RunObserver,
    ) -> Result<String, PipelineError> {
        info!(steps = steps.len(), "Starting pipeline");

        let mut current = initial_input.to_string();

        for (index, step) in steps.iter().enumerate() {
            let step_number = index + 1;

            if let Some(token) = &cancellation
                && token.is_cancelled()
            {
                return Err(PipelineError::Cancelled { step: step_number });
            }

            debug!(step = step_number, total = steps.len(), "Running pipeline step");

            let payload = PromptTemplate::step_payload(&step.instruction, &current);
            let item = WorkItem::new(index as u64, payload);
            let options = DispatchOptions::with_max_concurrency(1).stage(Stage::Pipeline);
            let options = match &cancellation {
                Some(token) => options.cancellation(token.clone()),
                None => options,
            };

            let report = self
                .dispatcher
                .run_with_observer(vec![item], options, observer)
                .await?;

            let Some(result) = report.results.into_iter().next() else {
                // The run was cancelled before the step completed.
                return Err(PipelineError::Cancelled { step: step_number });
            };

            match result.outcome {
                WorkOutcome::Completed { output } => {
                    debug!(step = step_number, "Pipeline step completed");
                    current = output;
                }
                WorkOutcome::Failed { error } => {
                    return Err(PipelineError::StepFailed {
                        step: step_number,
                        reason: error,
                    });
                }
            }
        }

        info!("Pipeline completed");
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::work_executor::ExecutionError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use swarm_domain::CapabilityTier;

    /// Records every payload and answers with a numbered output.
    struct ScriptedSteps {
        calls: Mutex<Vec<String>>,
        fail_at_call: Option<usize>,
    }

    impl ScriptedSteps {
        fn new() -> Self {
            Self {
                calls: Mutex::new(vec![]),
                fail_at_call: None,
            }
        }

        fn failing_at(call: usize) -> Self {
            Self {
                calls: Mutex::new(vec![]),
                fail_at_call: Some(call),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl WorkExecutor for ScriptedSteps {
        async fn execute(
            &self,
            payload: &str,
            _worker: Option<&str>,
            _tier: CapabilityTier,
        ) -> Result<String, ExecutionError> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(payload.to_string());
                calls.len()
            };
            if self.fail_at_call == Some(call) {
                return Err(ExecutionError::Backend("step blew up".to_string()));
            }
            Ok(format!("step-{}-output", call))
        }
    }

    fn steps(instructions: &[&str]) -> Vec<StepSpec> {
        instructions.iter().map(|i| StepSpec::new(*i)).collect()
    }

    #[tokio::test]
    async fn test_each_step_receives_previous_output() {
        let executor = Arc::new(ScriptedSteps::new());
        let pipeline = Pipeline::new(Arc::clone(&executor));

        let result = pipeline
            .run("raw data", &steps(&["extract", "calculate", "format"]), None)
            .await
            .unwrap();

        assert_eq!(result, "step-3-output");

        let calls = executor.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        // Step 1 sees the original input.
        assert!(calls[0].contains("extract"));
        assert!(calls[0].contains("raw data"));
        // Step 2 sees step 1's output, not the original input.
        assert!(calls[1].contains("calculate"));
        assert!(calls[1].contains("step-1-output"));
        assert!(!calls[1].contains("raw data"));
        // Step 3 sees step 2's output.
        assert!(calls[2].contains("step-2-output"));
    }

    #[tokio::test]
    async fn test_fail_fast_identifies_step_and_skips_rest() {
        let executor = Arc::new(ScriptedSteps::failing_at(2));
        let pipeline = Pipeline::new(Arc::clone(&executor));

        let err = pipeline
            .run("input", &steps(&["a", "b", "c"]), None)
            .await
            .unwrap_err();

        match err {
            PipelineError::StepFailed { step, reason } => {
                assert_eq!(step, 2);
                assert!(reason.contains("step blew up"));
            }
            other => panic!("Expected StepFailed, got {:?}", other),
        }
        // Step 3 was never invoked.
        assert_eq!(executor.call_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_steps_return_input_unchanged() {
        let pipeline = Pipeline::new(Arc::new(ScriptedSteps::new()));
        let result = pipeline.run("unchanged", &[], None).await.unwrap();
        assert_eq!(result, "unchanged");
    }

    #[tokio::test]
    async fn test_cancelled_before_first_step() {
        let token = CancellationToken::new();
        token.cancel();

        let executor = Arc::new(ScriptedSteps::new());
        let pipeline = Pipeline::new(Arc::clone(&executor));
        let err = pipeline
            .run("input", &steps(&["a", "b"]), Some(token))
            .await
            .unwrap_err();

        match err {
            PipelineError::Cancelled { step } => assert_eq!(step, 1),
            other => panic!("Expected Cancelled, got {:?}", other),
        }
        assert_eq!(executor.call_count(), 0);
    }
}
