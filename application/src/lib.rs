//! Application layer for agent-swarm
//!
//! Use cases and ports for the orchestration core. The four public entry
//! points are [`Pipeline::run`], [`ParallelMapper::run`],
//! [`HierarchicalCoordinator::execute`] and [`ConsensusVoter::run`];
//! all of them fan work out through the [`Dispatcher`], the sole place
//! where concurrency and per-item failure containment are implemented.
//!
//! The compute backend is a port: anything implementing [`WorkExecutor`]
//! can be orchestrated, and tests substitute deterministic stubs for it.

pub mod config;
pub mod dispatcher;
pub mod ports;
pub mod use_cases;

pub use config::RunConfig;
pub use dispatcher::{CancelPolicy, DispatchOptions, Dispatcher};
pub use ports::observer::{NoObserver, RunObserver, Stage};
pub use ports::work_executor::{ExecutionError, WorkExecutor};
pub use use_cases::consensus::{ConsensusError, ConsensusVoter};
pub use use_cases::hierarchical::{CoordinatorError, HierarchicalCoordinator};
pub use use_cases::parallel_map::{MapError, MapReport, ParallelMapper};
pub use use_cases::pipeline::{Pipeline, PipelineError, StepSpec};
