//! Per-state lifted grounding.

use std::sync::Arc;

use groundforge_core::{AtomRepository, Problem, Result};
use tracing::info;

use super::ApplicableActionGenerator;
use crate::action::{GroundAction, GroundActionIndex};
use crate::axiom::AxiomEvaluator;
use crate::grounder::ActionGrounder;
use crate::strips::{GroundingMode, StateAtoms, StateBuilder};

/// Grounds every schema against each queried state.
///
/// Nothing is pre-computed beyond the static consistency graphs, so the
/// generator is cheap to build and its cost is paid per state.
#[derive(Debug)]
pub struct LiftedGenerator {
    grounder: ActionGrounder,
    axioms: AxiomEvaluator,
}

impl LiftedGenerator {
    pub fn new(problem: Arc<Problem>) -> Result<Self> {
        let grounder = ActionGrounder::new(problem)?;
        let axioms = AxiomEvaluator::new(grounder.context())?;
        info!(
            event = "generator_ready",
            kind = "lifted",
            problem = %grounder.problem().name,
            strata = axioms.strata().len(),
        );
        Ok(Self { grounder, axioms })
    }

    pub fn grounder(&self) -> &ActionGrounder {
        &self.grounder
    }

    pub fn grounder_mut(&mut self) -> &mut ActionGrounder {
        &mut self.grounder
    }
}

impl ApplicableActionGenerator for LiftedGenerator {
    fn generate_applicable_actions(&mut self, state: StateAtoms<'_>) -> Result<Vec<GroundActionIndex>> {
        self.grounder.ground_all(state, GroundingMode::Exact)
    }

    fn generate_and_apply_axioms(&mut self, state: &mut StateBuilder) -> Result<()> {
        self.axioms.evaluate(self.grounder.context_mut(), state);
        Ok(())
    }

    fn ground_action(&self, index: GroundActionIndex) -> &GroundAction {
        self.grounder.ground_action(index)
    }

    fn num_ground_actions(&self) -> usize {
        self.grounder.actions().len()
    }

    fn problem(&self) -> &Problem {
        self.grounder.problem()
    }

    fn atoms(&self) -> &AtomRepository {
        self.grounder.context().atoms()
    }

    fn atoms_mut(&mut self) -> &mut AtomRepository {
        self.grounder.context_mut().atoms_mut()
    }
}
