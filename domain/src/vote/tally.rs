//! Vote tallying for quorum consensus.
//!
//! Counts are kept in the caller-supplied option order, which makes the
//! tie-break rule deterministic: the winner is the first option, in that
//! order, among those tied for the maximum count. Map iteration order
//! never enters the picture.

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Tally of ballots against a fixed option list.
///
/// Invalid or unparseable ballots are discarded, never attributed to an
/// option; they remain visible through [`VoteTally::discarded`].
///
/// # Example
///
/// ```
/// use swarm_domain::VoteTally;
///
/// let mut tally = VoteTally::new(
///     &["A".to_string(), "B".to_string()],
///     4,
/// ).unwrap();
///
/// for ballot in ["A", "B", "A", "B"] {
///     tally.record(ballot);
/// }
///
/// // Tie resolves to the first option in caller-supplied order.
/// assert_eq!(tally.winner(), Some("A"));
/// assert_eq!(tally.consensus_strength(), 0.5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteTally {
    /// Per-option counts, in caller-supplied option order
    counts: Vec<(String, usize)>,
    /// Number of voters requested (not number of valid ballots)
    total_votes: usize,
    /// Ballots that were unparseable, unmatched, or never produced
    discarded: usize,
}

impl VoteTally {
    /// Create an empty tally over a distinct, non-empty option list.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoOptions`] for an empty list
    /// - [`ConfigError::DuplicateOption`] when two options are equal —
    ///   silently deduplicating would change the tally shape behind the
    ///   caller's back
    /// - [`ConfigError::ZeroVoters`] when `total_votes` is zero
    pub fn new(options: &[String], total_votes: usize) -> Result<Self, ConfigError> {
        if options.is_empty() {
            return Err(ConfigError::NoOptions);
        }
        if total_votes == 0 {
            return Err(ConfigError::ZeroVoters);
        }
        for (i, option) in options.iter().enumerate() {
            if options[..i].contains(option) {
                return Err(ConfigError::DuplicateOption(option.clone()));
            }
        }

        Ok(Self {
            counts: options.iter().map(|o| (o.clone(), 0)).collect(),
            total_votes,
            discarded: 0,
        })
    }

    /// Record one ballot.
    ///
    /// The ballot must match an option by exact text equality; anything
    /// else is counted as discarded. Returns whether the ballot was valid.
    pub fn record(&mut self, ballot: &str) -> bool {
        match self.counts.iter_mut().find(|(option, _)| option == ballot) {
            Some((_, count)) => {
                *count += 1;
                true
            }
            None => {
                self.discarded += 1;
                false
            }
        }
    }

    /// Record a ballot that was never produced or could not be parsed.
    pub fn discard(&mut self) {
        self.discarded += 1;
    }

    /// Count for a specific option, if it exists.
    pub fn count(&self, option: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|(o, _)| o == option)
            .map(|(_, c)| *c)
    }

    /// Per-option counts in caller-supplied order.
    pub fn counts(&self) -> &[(String, usize)] {
        &self.counts
    }

    /// Number of voters requested for this tally.
    pub fn total_votes(&self) -> usize {
        self.total_votes
    }

    /// Number of discarded ballots.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Number of ballots attributed to an option.
    pub fn valid_votes(&self) -> usize {
        self.counts.iter().map(|(_, c)| c).sum()
    }

    /// The winning option: strictly highest count, ties resolved to the
    /// first option in caller-supplied order. `None` until at least one
    /// valid ballot has been recorded.
    pub fn winner(&self) -> Option<&str> {
        let max = self.counts.iter().map(|(_, c)| *c).max()?;
        if max == 0 {
            return None;
        }
        self.counts
            .iter()
            .find(|(_, c)| *c == max)
            .map(|(option, _)| option.as_str())
    }

    /// Winning vote count divided by *requested* voters.
    ///
    /// Using the requested count rather than valid ballots keeps a high
    /// discard rate visible as low strength instead of hiding it.
    pub fn consensus_strength(&self) -> f64 {
        match self.winner().and_then(|w| self.count(w)) {
            Some(count) => count as f64 / self.total_votes as f64,
            None => 0.0,
        }
    }
}

/// Final outcome of a consensus vote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// The winning option text
    pub winner: String,
    /// Winning count over requested voters (0.0 to 1.0)
    pub consensus_strength: f64,
    /// The full tally for detailed analysis
    pub tally: VoteTally,
}

impl ConsensusResult {
    /// Build the result from a tally with at least one valid ballot.
    ///
    /// Returns `None` when no valid ballot was recorded — the vote has no
    /// winner and the caller must surface an aggregation failure.
    pub fn from_tally(tally: VoteTally) -> Option<Self> {
        let winner = tally.winner()?.to_string();
        let consensus_strength = tally.consensus_strength();
        Some(Self {
            winner,
            consensus_strength,
            tally,
        })
    }

    /// Whether every requested voter backed the winner.
    pub fn is_unanimous(&self) -> bool {
        self.tally.count(&self.winner) == Some(self.tally.total_votes())
    }
}
