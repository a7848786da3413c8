//! Worker specifications.
//!
//! A worker is a named role configuration used to specialize how a work
//! unit is framed — not a thread. Concurrency is handled by the
//! dispatcher independently of worker identity.

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};

/// A named, specialized worker role (Value Object).
///
/// # Example
///
/// ```
/// use swarm_domain::WorkerSpec;
///
/// let worker = WorkerSpec::new(
///     "security-architect",
///     "You are a security architect. Analyze the system for vulnerabilities.",
/// );
/// assert_eq!(worker.name, "security-architect");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSpec {
    /// Unique name within one coordinator instance
    pub name: String,
    /// Role description used to frame this worker's payload
    pub role: String,
}

impl WorkerSpec {
    /// Create a new worker spec
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
        }
    }
}

/// An immutable, validated set of workers.
///
/// Construction fails fast on an empty set or a duplicate name; caller
/// order is preserved and drives deterministic delegation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerSet {
    workers: Vec<WorkerSpec>,
}

impl WorkerSet {
    /// Validate and build a worker set.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoWorkers`] when `workers` is empty
    /// - [`ConfigError::DuplicateWorkerName`] when two workers share a name
    pub fn new(workers: Vec<WorkerSpec>) -> Result<Self, ConfigError> {
        if workers.is_empty() {
            return Err(ConfigError::NoWorkers);
        }

        for (i, worker) in workers.iter().enumerate() {
            if workers[..i].iter().any(|w| w.name == worker.name) {
                return Err(ConfigError::DuplicateWorkerName(worker.name.clone()));
            }
        }

        Ok(Self { workers })
    }

    /// Number of workers in the set
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// A worker set is never empty by construction
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Iterate over workers in caller-supplied order
    pub fn iter(&self) -> impl Iterator<Item = &WorkerSpec> {
        self.workers.iter()
    }

    /// Worker names in caller-supplied order
    pub fn names(&self) -> Vec<&str> {
        self.workers.iter().map(|w| w.name.as_str()).collect()
    }

    /// Look up a worker by name
    pub fn get(&self, name: &str) -> Option<&WorkerSpec> {
        self.workers.iter().find(|w| w.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_set_preserves_order() {
        let set = WorkerSet::new(vec![
            WorkerSpec::new("security", "security role"),
            WorkerSpec::new("performance", "performance role"),
            WorkerSpec::new("quality", "quality role"),
        ])
        .unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(set.names(), vec!["security", "performance", "quality"]);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = WorkerSet::new(vec![
            WorkerSpec::new("security", "role a"),
            WorkerSpec::new("security", "role b"),
        ]);

        assert_eq!(
            result.unwrap_err(),
            ConfigError::DuplicateWorkerName("security".to_string())
        );
    }

    #[test]
    fn test_empty_set_rejected() {
        assert_eq!(WorkerSet::new(vec![]).unwrap_err(), ConfigError::NoWorkers);
    }

    #[test]
    fn test_lookup_by_name() {
        let set = WorkerSet::new(vec![WorkerSpec::new("security", "role")]).unwrap();
        assert!(set.get("security").is_some());
        assert!(set.get("missing").is_none());
    }
}
