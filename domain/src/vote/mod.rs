//! Consensus voting primitives.
//!
//! This module defines the tally used in quorum decision making and the
//! pluggable ballot parsing strategy that extracts a single choice from a
//! voter's raw output.

pub mod parsing;
pub mod tally;

pub use parsing::{ChoiceParser, TaggedChoiceParser, parse_tagged};
pub use tally::{ConsensusResult, VoteTally};
