//! Pre-grounded generation with match trees.

use std::sync::Arc;

use groundforge_core::{AtomRepository, PredicateCategory, Problem, Result};
use tracing::info;

use super::ApplicableActionGenerator;
use crate::action::{GroundAction, GroundActionIndex};
use crate::axiom::{AxiomEvaluator, GroundAxiomIndex};
use crate::grounder::ActionGrounder;
use crate::match_tree::MatchTree;
use crate::relaxed::explore_delete_relaxation;
use crate::strips::{StateAtoms, StateBuilder};

/// Grounds everything reachable in the delete relaxation once, then answers
/// queries with one match tree for actions and one per axiom stratum.
///
/// Construction cost grows with the size of the relaxed task; each query
/// afterwards only walks the trees. States must not hold atoms created
/// after construction, which relaxed reachability rules out for every state
/// reached from the initial one.
#[derive(Debug)]
pub struct GroundedGenerator {
    grounder: ActionGrounder,
    axioms: AxiomEvaluator,
    action_tree: MatchTree<GroundActionIndex>,
    axiom_trees: Vec<MatchTree<GroundAxiomIndex>>,
}

impl GroundedGenerator {
    pub fn new(problem: Arc<Problem>) -> Result<Self> {
        let mut grounder = ActionGrounder::new(problem)?;
        let mut axioms = AxiomEvaluator::new(grounder.context())?;
        let relaxed = explore_delete_relaxation(&mut grounder, &mut axioms)?;

        let atoms = grounder.context().atoms();
        let num_fluent = atoms.len(PredicateCategory::Fluent);
        let num_derived = atoms.len(PredicateCategory::Derived);

        let action_tree = MatchTree::build(
            relaxed
                .actions
                .iter()
                .map(|&index| (index, grounder.ground_action(index).precondition())),
            num_fluent,
            num_derived,
        );

        let axiom_trees: Vec<MatchTree<GroundAxiomIndex>> = axioms
            .strata()
            .iter()
            .map(|stratum| {
                MatchTree::build(
                    relaxed
                        .axioms
                        .iter()
                        .map(|&index| (index, axioms.ground_axiom(index)))
                        .filter(|(_, axiom)| stratum.contains(&axiom.axiom))
                        .map(|(index, axiom)| (index, &axiom.precondition)),
                    num_fluent,
                    num_derived,
                )
            })
            .collect();

        info!(
            event = "generator_ready",
            kind = "grounded",
            problem = %grounder.problem().name,
            ground_actions = action_tree.len(),
            action_tree_nodes = action_tree.num_nodes(),
            ground_axioms = relaxed.axioms.len(),
            strata = axiom_trees.len(),
        );

        Ok(Self {
            grounder,
            axioms,
            action_tree,
            axiom_trees,
        })
    }

    /// Match tree over the relaxed-reachable ground actions.
    pub fn action_tree(&self) -> &MatchTree<GroundActionIndex> {
        &self.action_tree
    }

    pub fn grounder(&self) -> &ActionGrounder {
        &self.grounder
    }
}

impl ApplicableActionGenerator for GroundedGenerator {
    fn generate_applicable_actions(&mut self, state: StateAtoms<'_>) -> Result<Vec<GroundActionIndex>> {
        let mut applicable = Vec::new();
        self.action_tree.applicable(state, &mut applicable)?;
        applicable.sort_unstable();
        Ok(applicable)
    }

    fn generate_and_apply_axioms(&mut self, state: &mut StateBuilder) -> Result<()> {
        let mut matched = Vec::new();
        for tree in &self.axiom_trees {
            loop {
                matched.clear();
                tree.applicable(state.atoms(), &mut matched)?;
                let mut changed = false;
                for &index in &matched {
                    changed |= state.derived.insert(self.axioms.ground_axiom(index).head);
                }
                if !changed {
                    break;
                }
            }
        }
        Ok(())
    }

    fn ground_action(&self, index: GroundActionIndex) -> &GroundAction {
        self.grounder.ground_action(index)
    }

    fn num_ground_actions(&self) -> usize {
        self.action_tree.len()
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
