//! Applicable-action generators.
//!
//! A generator answers two questions about a state: which ground actions are
//! applicable, and which derived atoms hold. [`LiftedGenerator`] grounds
//! schemas per state; [`GroundedGenerator`] grounds everything reachable in
//! the delete relaxation up front and answers with match trees. Both hand
//! out handles into their own ground-action table.

mod grounded;
mod lifted;

use std::fmt::Debug;
use std::sync::Arc;

use groundforge_config::GeneratorKind;
use groundforge_core::{AtomRepository, Problem, Result};

use crate::action::{GroundAction, GroundActionIndex};
use crate::strips::{StateAtoms, StateBuilder};

pub use grounded::GroundedGenerator;
pub use lifted::LiftedGenerator;

/// Source of applicable actions and derived atoms for a state repository.
pub trait ApplicableActionGenerator: Debug + Send {
    /// Returns the handles of every ground action applicable in `state`.
    fn generate_applicable_actions(&mut self, state: StateAtoms<'_>) -> Result<Vec<GroundActionIndex>>;

    /// Adds the derived atoms implied by the fluent part of `state`.
    fn generate_and_apply_axioms(&mut self, state: &mut StateBuilder) -> Result<()>;

    /// Returns the ground action behind a handle issued by this generator.
    fn ground_action(&self, index: GroundActionIndex) -> &GroundAction;

    /// Number of ground actions instantiated so far.
    fn num_ground_actions(&self) -> usize;

    fn problem(&self) -> &Problem;

    fn atoms(&self) -> &AtomRepository;

    fn atoms_mut(&mut self) -> &mut AtomRepository;
}

/// Builds the generator selected by `kind`.
///
/// # Errors
///
/// Fails if the problem uses an unsupported construct, its axioms are not
/// stratifiable, or (for the grounded generator) relaxed exploration fails.
pub fn create_generator(
    problem: Arc<Problem>,
    kind: GeneratorKind,
) -> Result<Box<dyn ApplicableActionGenerator>> {
    Ok(match kind {
        GeneratorKind::Lifted => Box::new(LiftedGenerator::new(problem)?),
        GeneratorKind::Grounded => Box::new(GroundedGenerator::new(problem)?),
    })
}

#[cfg(test)]
mod tests;
