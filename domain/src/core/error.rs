//! Domain error types

use thiserror::Error;

/// Construction-time validation errors.
///
/// Every variant is detected before any work is dispatched. A run that
/// fails with `ConfigError` has executed nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Duplicate worker name: {0}")]
    DuplicateWorkerName(String),

    #[error("No workers configured")]
    NoWorkers,

    #[error("No vote options provided")]
    NoOptions,

    #[error("Duplicate vote option: {0}")]
    DuplicateOption(String),

    #[error("Voter count must be greater than zero")]
    ZeroVoters,

    #[error("Concurrency limit must be greater than zero")]
    ZeroConcurrency,

    #[error("No worker reports to synthesize")]
    EmptyReports,
}
