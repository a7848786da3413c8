//! Ports (interfaces) for the application layer.
//!
//! Adapters live in the infrastructure layer; tests substitute
//! deterministic stubs.

pub mod observer;
pub mod work_executor;

pub use observer::{NoObserver, RunObserver, Stage};
pub use work_executor::{ExecutionError, WorkExecutor};
