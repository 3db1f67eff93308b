//! Breadth-first state-space exploration.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use groundforge_config::ExplorationConfig;
use groundforge_core::{Bitset, Result};
use groundforge_grounding::GroundActionIndex;
use tracing::{debug, info};

use crate::repository::StateRepository;
use crate::state::StateIndex;
use crate::stopwatch::Stopwatch;

/// How an exploration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorationStatus {
    /// Every reachable state was expanded.
    Complete,
    /// The time limit expired with states left to expand.
    TimedOut,
    /// The state limit was reached with states left to expand.
    StateLimitReached,
}

impl fmt::Display for ExplorationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplorationStatus::Complete => write!(f, "Complete"),
            ExplorationStatus::TimedOut => write!(f, "TimedOut"),
            ExplorationStatus::StateLimitReached => write!(f, "StateLimitReached"),
        }
    }
}

/// One applied action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub source: StateIndex,
    pub action: GroundActionIndex,
    pub target: StateIndex,
    pub cost: f64,
}

/// Summary of an exploration run.
#[derive(Debug, Clone)]
pub struct ExplorationResult {
    pub status: ExplorationStatus,
    /// States known to the repository when the run ended.
    pub num_states: usize,
    /// States whose successors were generated.
    pub num_expanded: usize,
    pub transitions: Vec<Transition>,
    /// Reached goal states, in order of discovery.
    pub goal_states: Vec<StateIndex>,
    pub elapsed: Duration,
}

impl ExplorationResult {
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.status == ExplorationStatus::Complete
    }

    #[inline]
    pub fn num_transitions(&self) -> usize {
        self.transitions.len()
    }
}

/// Expands every state reachable from the initial state, breadth first.
///
/// The time and state limits of `config` are checked once per expanded
/// state. Hitting one ends the run with a partial result; the states and
/// ground actions cached so far stay valid.
///
/// # Errors
///
/// Propagates grounding errors; the repository keeps what it cached.
pub fn explore(repository: &mut StateRepository, config: &ExplorationConfig) -> Result<ExplorationResult> {
    let stopwatch = Stopwatch::start(config.time_limit());
    let max_states = config.max_num_states();

    info!(
        event = "exploration_start",
        problem = %repository.problem().name,
        generator = ?config.generator,
        time_limit_ms = stopwatch.limit().map(|l| l.as_millis() as u64),
        max_states,
    );

    let initial = repository.get_or_create_initial_state()?;
    let mut reached = Bitset::new();
    reached.insert(initial.index());
    let mut num_reached = 1;
    let mut goal_states = Vec::new();
    if repository.is_goal_state(initial) {
        goal_states.push(initial);
    }

    let mut queue = VecDeque::from([initial]);
    let mut transitions = Vec::new();
    let mut num_expanded = 0;
    let mut status = ExplorationStatus::Complete;

    while let Some(state) = queue.pop_front() {
        if stopwatch.is_expired() {
            status = ExplorationStatus::TimedOut;
            break;
        }
        if max_states.is_some_and(|max| num_reached >= max) {
            status = ExplorationStatus::StateLimitReached;
            break;
        }

        let actions = repository.generate_applicable_actions(state)?;
        debug!(
            event = "state_expanded",
            state = state.index(),
            applicable = actions.len(),
            frontier = queue.len(),
        );
        for action in actions {
            let (target, cost) = repository.get_or_create_successor_state(state, action)?;
            transitions.push(Transition {
                source: state,
                action,
                target,
                cost,
            });
            if reached.insert(target.index()) {
                num_reached += 1;
                if repository.is_goal_state(target) {
                    goal_states.push(target);
                }
                queue.push_back(target);
            }
        }
        num_expanded += 1;
    }

    let result = ExplorationResult {
        status,
        num_states: num_reached,
        num_expanded,
        transitions,
        goal_states,
        elapsed: stopwatch.elapsed(),
    };

    info!(
        event = "exploration_end",
        status = %result.status,
        states = result.num_states,
        expanded = result.num_expanded,
        transitions = result.num_transitions(),
        goal_states = result.goal_states.len(),
        ground_actions = repository.generator().num_ground_actions(),
        duration_ms = result.elapsed.as_millis() as u64,
    );

    Ok(result)
}
