//! Application-level configuration.
//!
//! Run configuration is a plain value object consumed as input and never
//! persisted; file discovery and merging live in the infrastructure
//! layer.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Behavior configuration for one orchestration run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunConfig {
    /// Maximum number of concurrently running work items
    pub max_concurrency: usize,
    /// Number of independent voters for consensus votes
    pub num_voters: usize,
    /// Maximum wall-clock time for a whole run, if any
    pub timeout: Option<Duration>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 3,
            num_voters: 5,
            timeout: None,
        }
    }
}

impl RunConfig {
    /// Creates a RunConfig with a timeout specified in seconds.
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout = Some(Duration::from_secs(seconds));
        self
    }

    /// Creates a RunConfig from an optional timeout in seconds.
    ///
    /// If `seconds` is `None`, no timeout is applied.
    pub fn from_timeout_seconds(seconds: Option<u64>) -> Self {
        Self {
            timeout: seconds.map(Duration::from_secs),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_run_config() {
        let config = RunConfig::default();
        assert_eq!(config.max_concurrency, 3);
        assert_eq!(config.num_voters, 5);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_timeout_helpers() {
        let config = RunConfig::default().with_timeout_seconds(30);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));

        let config = RunConfig::from_timeout_seconds(None);
        assert_eq!(config.timeout, None);
    }
}
