//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application and
//! domain types after validation.

use crate::executors::CommandSpec;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use swarm_application::RunConfig;
use swarm_domain::{ConfigError, WorkerSet, WorkerSpec};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("command list cannot be empty")]
    EmptyCommand,

    #[error(transparent)]
    Domain(#[from] ConfigError),
}

/// Raw run configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRunConfig {
    /// Maximum number of concurrently running work items
    pub max_concurrency: usize,
    /// Number of independent voters for consensus votes
    pub num_voters: usize,
    /// Timeout in seconds for a whole run
    pub timeout_seconds: Option<u64>,
}

impl Default for FileRunConfig {
    fn default() -> Self {
        let defaults = RunConfig::default();
        Self {
            max_concurrency: defaults.max_concurrency,
            num_voters: defaults.num_voters,
            timeout_seconds: None,
        }
    }
}

/// One named worker from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWorkerConfig {
    pub name: String,
    /// Role description framed into the worker's payloads
    pub role: String,
}

/// Executor command configuration from TOML
///
/// Each entry is the program followed by its arguments. An empty
/// coordinator entry falls back to the worker command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCommandConfig {
    pub worker: Vec<String>,
    pub coordinator: Vec<String>,
}

impl FileCommandConfig {
    fn to_spec(entry: &[String]) -> Option<CommandSpec> {
        let (program, args) = entry.split_first()?;
        Some(CommandSpec::new(program).with_args(args.iter().cloned()))
    }

    /// Worker-tier command, if configured.
    pub fn worker_spec(&self) -> Option<CommandSpec> {
        Self::to_spec(&self.worker)
    }

    /// Coordinator-tier command, falling back to the worker command.
    pub fn coordinator_spec(&self) -> Option<CommandSpec> {
        Self::to_spec(&self.coordinator).or_else(|| self.worker_spec())
    }
}

/// Root of the TOML config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub run: FileRunConfig,
    pub workers: Vec<FileWorkerConfig>,
    pub command: FileCommandConfig,
}

impl FileConfig {
    /// Convert the raw run section into an application [`RunConfig`].
    pub fn run_config(&self) -> Result<RunConfig, ConfigValidationError> {
        if self.run.timeout_seconds == Some(0) {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        Ok(RunConfig {
            max_concurrency: self.run.max_concurrency,
            num_voters: self.run.num_voters,
            timeout: self.run.timeout_seconds.map(Duration::from_secs),
        })
    }

    /// Build the validated worker set from the raw worker list.
    pub fn worker_set(&self) -> Result<WorkerSet, ConfigValidationError> {
        let workers = self
            .workers
            .iter()
            .map(|w| WorkerSpec::new(&w.name, &w.role))
            .collect();
        Ok(WorkerSet::new(workers)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_defaults() {
        let config = FileConfig::default();
        let run = config.run_config().unwrap();
        assert_eq!(run, RunConfig::default());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = FileConfig {
            run: FileRunConfig {
                timeout_seconds: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.run_config(),
            Err(ConfigValidationError::InvalidTimeout)
        ));
    }

    #[test]
    fn test_duplicate_worker_names_rejected() {
        let config = FileConfig {
            workers: vec![
                FileWorkerConfig {
                    name: "security".to_string(),
                    role: "architect".to_string(),
                },
                FileWorkerConfig {
                    name: "security".to_string(),
                    role: "reviewer".to_string(),
                },
            ],
            ..Default::default()
        };
        assert!(matches!(
            config.worker_set(),
            Err(ConfigValidationError::Domain(
                ConfigError::DuplicateWorkerName(_)
            ))
        ));
    }

    #[test]
    fn test_coordinator_command_falls_back_to_worker() {
        let command = FileCommandConfig {
            worker: vec!["llm".to_string(), "--fast".to_string()],
            coordinator: vec![],
        };

        let worker = command.worker_spec().unwrap();
        assert_eq!(worker.program, "llm");
        assert_eq!(worker.args, vec!["--fast"]);

        let coordinator = command.coordinator_spec().unwrap();
        assert_eq!(coordinator, worker);
    }
}
