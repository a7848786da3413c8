//! Consensus voting use case.
//!
//! Puts one question to N independent voters simultaneously and tallies
//! their choices. A voter whose execution fails, or whose response does
//! not parse to one of the offered options, is discarded rather than
//! guessed at — discards still count against consensus strength.

use crate::dispatcher::DispatchOptions;
use crate::ports::observer::{NoObserver, RunObserver, Stage};
use crate::ports::work_executor::WorkExecutor;
use crate::use_cases::parallel_map::ParallelMapper;
use std::sync::Arc;
use swarm_domain::{
    ChoiceParser, ConfigError, ConsensusResult, PromptTemplate, TaggedChoiceParser, VoteTally,
    WorkItem, WorkOutcome,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during a consensus vote
#[derive(Error, Debug)]
pub enum ConsensusError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Every voter either failed or produced an unparseable response.
    #[error("No valid ballots were cast")]
    NoValidBallots,

    #[error("Vote cancelled")]
    Cancelled,
}

/// Runs independent voters over a fixed option list and reduces their
/// responses to a single winner with a strength score.
///
/// The choice parser is pluggable; the default extracts the text between
/// `<vote>` tags. Ties break toward the option listed first by the
/// caller, so option order is part of the vote's contract.
pub struct ConsensusVoter<E: WorkExecutor + 'static> {
    mapper: ParallelMapper<E>,
    parser: Box<dyn ChoiceParser>,
    num_voters: usize,
}

impl<E: WorkExecutor + 'static> ConsensusVoter<E> {
    pub fn new(executor: Arc<E>, num_voters: usize) -> Self {
        Self {
            mapper: ParallelMapper::new(executor),
            parser: Box::new(TaggedChoiceParser::default()),
            num_voters,
        }
    }

    /// Replace the default tagged parser.
    pub fn with_parser(mut self, parser: Box<dyn ChoiceParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn num_voters(&self) -> usize {
        self.num_voters
    }

    /// Run the vote with default (no-op) observation.
    pub async fn run(
        &self,
        question: &str,
        options_list: &[String],
        options: DispatchOptions,
    ) -> Result<ConsensusResult, ConsensusError> {
        self.run_with_observer(question, options_list, options, &NoObserver)
            .await
    }

    /// Run the vote, reporting ballot completion to the observer.
    ///
    /// All voters receive the identical payload and run concurrently.
    /// Consensus strength is measured against the *requested* number of
    /// voters, so discarded ballots weaken the winner rather than
    /// disappearing from the denominator.
    pub async fn run_with_observer(
        &self,
        question: &str,
        options_list: &[String],
        options: DispatchOptions,
        observer: &dyn RunObserver,
    ) -> Result<ConsensusResult, ConsensusError> {
        let mut tally = VoteTally::new(options_list, self.num_voters)?;

        info!(
            voters = self.num_voters,
            options = options_list.len(),
            "Starting consensus vote"
        );

        let payload = PromptTemplate::voting_payload(question, options_list, "vote");
        let items: Vec<WorkItem> = (0..self.num_voters as u64)
            .map(|i| WorkItem::new(i, payload.clone()))
            .collect();

        let report = self
            .mapper
            .dispatch_ordered(items, options.stage(Stage::Vote), observer)
            .await?;

        if report.cancelled {
            return Err(ConsensusError::Cancelled);
        }

        for result in report.results {
            let voter = result.item.id;
            match result.outcome {
                WorkOutcome::Completed { output } => match self.parser.parse_choice(&output) {
                    Some(choice) => {
                        if tally.record(&choice) {
                            debug!(voter = %voter, choice = %choice, "Ballot recorded");
                        } else {
                            warn!(voter = %voter, choice = %choice, "Ballot names an unknown option, discarding");
                        }
                    }
                    None => {
                        tally.discard();
                        warn!(voter = %voter, "Ballot did not parse, discarding");
                    }
                },
                WorkOutcome::Failed { error } => {
                    tally.discard();
                    warn!(voter = %voter, error = %error, "Voter failed, discarding ballot");
                }
            }
        }

        let result = ConsensusResult::from_tally(tally).ok_or(ConsensusError::NoValidBallots)?;

        info!(
            winner = %result.winner,
            strength = result.consensus_strength,
            "Consensus vote completed"
        );

        Ok(result)
    }
}
