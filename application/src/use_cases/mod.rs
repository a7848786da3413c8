//! Orchestration use cases.
//!
//! The four composition strategies over the dispatcher:
//!
//! - [`pipeline::Pipeline`] — sequential chaining with fail-fast
//! - [`parallel_map::ParallelMapper`] — concurrent map with order restoration
//! - [`hierarchical::HierarchicalCoordinator`] — delegation plus synthesis
//! - [`consensus::ConsensusVoter`] — quorum voting with discard accounting

pub mod consensus;
pub mod hierarchical;
pub mod parallel_map;
pub mod pipeline;

pub use consensus::{ConsensusError, ConsensusVoter};
pub use hierarchical::{CoordinatorError, HierarchicalCoordinator};
pub use parallel_map::{MapError, MapReport, ParallelMapper};
pub use pipeline::{Pipeline, PipelineError, StepSpec};
