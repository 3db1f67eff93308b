//! GroundForge State - States, successors and state-space exploration
//!
//! This crate sits on top of an [`ApplicableActionGenerator`]:
//! - [`StateRepository`] deduplicates states by their fluent atoms and
//!   computes derived atoms once per new state
//! - [`explore`] walks the reachable state space breadth first under the
//!   limits of an [`ExplorationConfig`]
//! - [`explore_batch`] explores independent problems on a worker pool
//!
//! [`ApplicableActionGenerator`]: groundforge_grounding::ApplicableActionGenerator
//! [`ExplorationConfig`]: groundforge_config::ExplorationConfig

pub mod batch;
pub mod exploration;
pub mod repository;
pub mod state;
pub mod stopwatch;

pub use batch::{explore_batch, explore_problem};
pub use exploration::{explore, ExplorationResult, ExplorationStatus, Transition};
pub use repository::StateRepository;
pub use state::{State, StateIndex};
pub use stopwatch::Stopwatch;
