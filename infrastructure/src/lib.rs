//! Infrastructure layer for agent-swarm
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration file loading and
//! tracing setup.

pub mod config;
pub mod executors;
pub mod logging;

// Re-export commonly used types
pub use config::{ConfigLoader, FileCommandConfig, FileConfig, FileRunConfig, FileWorkerConfig};
pub use executors::{CommandExecutor, CommandSpec};
pub use logging::{JsonlRunObserver, init_tracing};
