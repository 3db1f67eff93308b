//! Delete-relaxed reachability analysis.
//!
//! Ignoring delete effects and negative literals makes the set of true atoms
//! grow monotonically. Saturating it from the initial state yields a
//! superset of every atom, ground action and ground axiom that can matter in
//! any reachable state, which is what the grounded generator pre-computes.

use groundforge_core::{Bitset, GroundForgeError, PredicateCategory, Result};
use tracing::{debug, info};

use crate::action::GroundActionIndex;
use crate::axiom::{AxiomEvaluator, GroundAxiomIndex};
use crate::grounder::ActionGrounder;
use crate::strips::{GroundingMode, StateBuilder};

/// Outcome of [`explore_delete_relaxation`].
#[derive(Debug, Clone, Default)]
pub struct RelaxedReachability {
    /// Ground actions applicable in the relaxed fixpoint.
    pub actions: Vec<GroundActionIndex>,
    /// Ground axioms applicable in the relaxed fixpoint.
    pub axioms: Vec<GroundAxiomIndex>,
    /// Fluent atoms reachable under the relaxation.
    pub fluent_atoms: Bitset,
    /// Derived atoms reachable under the relaxation.
    pub derived_atoms: Bitset,
    /// Number of saturation rounds.
    pub rounds: usize,
}

/// Saturates the delete relaxation from the initial state.
///
/// Every atom, action and axiom discovered along the way is interned in
/// `grounder` and `axioms`.
///
/// # Errors
///
/// Fails if the initial state lists a negated atom or a cost expression
/// references a numeric fluent without value.
pub fn explore_delete_relaxation(
    grounder: &mut ActionGrounder,
    axioms: &mut AxiomEvaluator,
) -> Result<RelaxedReachability> {
    let problem = std::sync::Arc::clone(grounder.context().problem_arc());
    let mut state = StateBuilder::default();
    for literal in &problem.initial {
        if literal.negated {
            return Err(GroundForgeError::NegativeInitialLiteral {
                atom: problem.display_atom(&literal.atom),
            });
        }
        let atoms = grounder.context_mut().atoms_mut();
        if atoms.category(literal.atom.predicate) == PredicateCategory::Fluent {
            state.fluent.insert(atoms.get_or_create(literal.atom.clone()));
        }
    }

    let mut rounds = 0;
    let actions = loop {
        rounds += 1;
        axioms.evaluate_relaxed(grounder.context_mut(), &mut state);
        let applicable = grounder.ground_all(state.atoms(), GroundingMode::DeleteRelaxed)?;

        let mut added = Bitset::new();
        for &index in &applicable {
            let action = grounder.ground_action(index);
            added.union_with(&action.effect().positive);
            for conditional in action.conditional_effects() {
                if conditional.precondition.is_relaxed_applicable(state.atoms()) {
                    added.union_with(&conditional.effect.positive);
                }
            }
        }
        if added.is_subset(&state.fluent) {
            break applicable;
        }
        state.fluent.union_with(&added);
        debug!(
            event = "relaxed_round",
            round = rounds,
            fluent_atoms = state.fluent.count(),
            derived_atoms = state.derived.count(),
            actions = applicable.len(),
        );
    };

    let relaxed_axioms: Vec<GroundAxiomIndex> = axioms
        .ground_axioms()
        .filter(|(_, axiom)| {
            axiom
                .precondition
                .is_applicable_in(state.atoms(), GroundingMode::DeleteRelaxed)
        })
        .map(|(index, _)| index)
        .collect();

    info!(
        event = "relaxed_exploration_done",
        problem = %problem.name,
        rounds,
        fluent_atoms = state.fluent.count(),
        derived_atoms = state.derived.count(),
        actions = actions.len(),
        axioms = relaxed_axioms.len(),
    );

    Ok(RelaxedReachability {
        actions,
        axioms: relaxed_axioms,
        fluent_atoms: state.fluent,
        derived_atoms: state.derived,
        rounds,
    })
}
