//! Domain layer for agent-swarm
//!
//! This crate contains the core orchestration entities and value objects.
//! It has no dependencies on infrastructure concerns: no I/O, no runtime,
//! no executor. Everything here is pure data and pure logic.
//!
//! # Core Concepts
//!
//! ## Work
//!
//! A [`WorkItem`] is one discrete request submitted for execution against
//! the compute backend. Completed runs are collected into a [`RunReport`],
//! which accounts for every submitted item exactly once.
//!
//! ## Workers
//!
//! A [`WorkerSpec`] is a named role configuration used to specialize how a
//! work unit is framed. Workers are not threads; concurrency is handled by
//! the dispatcher independently of worker identity.
//!
//! ## Consensus
//!
//! A [`VoteTally`] counts parsed ballots against a caller-supplied option
//! list, with deterministic tie-breaking and explicit discard accounting.

pub mod core;
pub mod prompt;
pub mod vote;
pub mod work;
pub mod worker;

// Re-export commonly used types
pub use core::{error::ConfigError, tier::CapabilityTier};
pub use prompt::PromptTemplate;
pub use vote::{
    ChoiceParser, ConsensusResult, TaggedChoiceParser, VoteTally, parse_tagged,
};
pub use work::{RunReport, WorkItem, WorkItemId, WorkOutcome, WorkResult};
pub use worker::{WorkerSet, WorkerSpec};
