//! Subprocess-backed work executor.
//!
//! Runs one external command per work item: the payload goes to the
//! child's stdin, the trimmed stdout comes back as the result. The
//! command is chosen by capability tier, so synthesis and voting can be
//! routed to a different (typically stronger) backend than worker-level
//! fan-out.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use swarm_application::{ExecutionError, WorkExecutor};
use swarm_domain::CapabilityTier;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// One external command: program plus fixed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec![],
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// Executes work items by piping payloads through external commands.
///
/// The worker identity and tier are exported to the child as
/// `SWARM_WORKER` and `SWARM_TIER` environment variables, so a single
/// wrapper script can still specialize per worker.
pub struct CommandExecutor {
    worker_command: CommandSpec,
    coordinator_command: CommandSpec,
    timeout: Option<Duration>,
}

impl CommandExecutor {
    /// Create an executor running the same command at both tiers.
    pub fn new(command: CommandSpec) -> Self {
        Self {
            worker_command: command.clone(),
            coordinator_command: command,
            timeout: None,
        }
    }

    /// Route coordinator-tier work to a different command.
    pub fn with_coordinator_command(mut self, command: CommandSpec) -> Self {
        self.coordinator_command = command;
        self
    }

    /// Kill the child and fail with a timeout after this long.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn command_for(&self, tier: CapabilityTier) -> &CommandSpec {
        match tier {
            CapabilityTier::Worker => &self.worker_command,
            CapabilityTier::Coordinator => &self.coordinator_command,
        }
    }

    async fn run_child(
        &self,
        payload: &str,
        worker: Option<&str>,
        tier: CapabilityTier,
    ) -> Result<String, ExecutionError> {
        let spec = self.command_for(tier);

        debug!(program = %spec.program, tier = %tier, "Spawning executor command");

        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .env("SWARM_TIER", tier.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(worker) = worker {
            command.env("SWARM_WORKER", worker);
        }

        let mut child = command
            .spawn()
            .map_err(|e| ExecutionError::Spawn(format!("{}: {}", spec.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(payload.as_bytes())
                .await
                .map_err(|e| ExecutionError::Backend(format!("stdin write failed: {}", e)))?;
            // Dropping stdin closes the pipe so the child sees EOF.
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ExecutionError::Backend(format!("wait failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExecutionError::Backend(format!(
                "{} exited with {}: {}",
                spec.program,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| ExecutionError::MalformedResponse(format!("non-UTF8 output: {}", e)))?;

        Ok(stdout.trim_end().to_string())
    }
}

#[async_trait]
impl WorkExecutor for CommandExecutor {
    async fn execute(
        &self,
        payload: &str,
        worker: Option<&str>,
        tier: CapabilityTier,
    ) -> Result<String, ExecutionError> {
        match self.timeout {
            // kill_on_drop reaps the child when the timeout wins.
            Some(limit) => tokio::time::timeout(limit, self.run_child(payload, worker, tier))
                .await
                .map_err(|_| ExecutionError::Timeout)?,
            None => self.run_child(payload, worker, tier).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandSpec {
        CommandSpec::new("sh").with_args(["-c", script])
    }

    #[tokio::test]
    async fn test_payload_round_trips_through_stdin_stdout() {
        let executor = CommandExecutor::new(CommandSpec::new("cat"));

        let output = executor
            .execute("hello swarm", None, CapabilityTier::Worker)
            .await
            .unwrap();

        assert_eq!(output, "hello swarm");
    }

    #[tokio::test]
    async fn test_tier_routes_to_coordinator_command() {
        let executor = CommandExecutor::new(sh("echo worker"))
            .with_coordinator_command(sh("echo coordinator"));

        let worker = executor
            .execute("x", None, CapabilityTier::Worker)
            .await
            .unwrap();
        let coordinator = executor
            .execute("x", None, CapabilityTier::Coordinator)
            .await
            .unwrap();

        assert_eq!(worker, "worker");
        assert_eq!(coordinator, "coordinator");
    }

    #[tokio::test]
    async fn test_worker_identity_exported_to_child() {
        let executor = CommandExecutor::new(sh("printf '%s' \"$SWARM_WORKER\""));

        let output = executor
            .execute("x", Some("security"), CapabilityTier::Worker)
            .await
            .unwrap();

        assert_eq!(output, "security");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_a_backend_error() {
        let executor = CommandExecutor::new(sh("echo boom >&2; exit 3"));

        let err = executor
            .execute("x", None, CapabilityTier::Worker)
            .await
            .unwrap_err();

        match err {
            ExecutionError::Backend(message) => assert!(message.contains("boom")),
            other => panic!("Expected Backend, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_a_spawn_error() {
        let executor = CommandExecutor::new(CommandSpec::new("definitely-not-a-real-program"));

        let err = executor
            .execute("x", None, CapabilityTier::Worker)
            .await
            .unwrap_err();

        assert!(matches!(err, ExecutionError::Spawn(_)));
    }

    #[tokio::test]
    async fn test_slow_command_times_out() {
        let executor =
            CommandExecutor::new(sh("sleep 5")).with_timeout(Duration::from_millis(100));

        let err = executor
            .execute("x", None, CapabilityTier::Worker)
            .await
            .unwrap_err();

        assert!(matches!(err, ExecutionError::Timeout));
    }
}
