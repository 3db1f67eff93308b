//! Problem-wide grounding state shared by action and axiom grounding.

use std::sync::Arc;

use groundforge_core::{
    AtomRepository, Bitset, GroundAtom, GroundForgeError, ObjectId, PredicateCategory, Problem,
    Result,
};
use tracing::debug;

use crate::assignment_set::AssignmentSet;
use crate::condition::LiteralConjunction;
use crate::strips::{StateAtoms, StripsPrecondition};

/// The atom repository plus everything derived once from the static part of
/// the initial state.
#[derive(Debug)]
pub struct GroundingContext {
    problem: Arc<Problem>,
    atoms: AtomRepository,
    static_atoms: Bitset,
    static_assignments: AssignmentSet,
}

impl GroundingContext {
    /// Interns the static initial atoms and indexes their assignments.
    ///
    /// # Errors
    ///
    /// Returns [`GroundForgeError::NegativeInitialLiteral`] if the initial
    /// state lists a negated atom.
    pub fn new(problem: Arc<Problem>) -> Result<Self> {
        let mut atoms = AtomRepository::new(&problem.predicates);
        let mut static_atoms = Bitset::new();

        for literal in &problem.initial {
            if literal.negated {
                return Err(GroundForgeError::NegativeInitialLiteral {
                    atom: problem.display_atom(&literal.atom),
                });
            }
            if atoms.category(literal.atom.predicate) == PredicateCategory::Static {
                static_atoms.insert(atoms.get_or_create(literal.atom.clone()));
            }
        }

        let static_assignments = AssignmentSet::build(
            problem.num_objects(),
            &problem.predicates,
            atoms.atoms_in(PredicateCategory::Static, &static_atoms),
        );

        debug!(
            event = "static_atoms_indexed",
            problem = %problem.name,
            static_atoms = static_atoms.count(),
        );

        Ok(Self {
            problem,
            atoms,
            static_atoms,
            static_assignments,
        })
    }

    #[inline]
    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    /// Shared handle to the problem.
    #[inline]
    pub fn problem_arc(&self) -> &Arc<Problem> {
        &self.problem
    }

    #[inline]
    pub fn atoms(&self) -> &AtomRepository {
        &self.atoms
    }

    #[inline]
    pub fn atoms_mut(&mut self) -> &mut AtomRepository {
        &mut self.atoms
    }

    /// Indices of the static atoms true in the initial state.
    #[inline]
    pub fn static_atoms(&self) -> &Bitset {
        &self.static_atoms
    }

    #[inline]
    pub fn static_assignments(&self) -> &AssignmentSet {
        &self.static_assignments
    }

    /// Returns true if the static `atom` holds.
    pub fn holds_static(&self, atom: &GroundAtom) -> bool {
        self.atoms
            .find(atom)
            .is_some_and(|index| self.static_atoms.contains(index))
    }

    /// Returns true if the parameter-free fluent or derived `atom` holds in `state`.
    pub fn holds_in(&self, atom: &GroundAtom, state: StateAtoms<'_>) -> bool {
        let category = self.atoms.category(atom.predicate);
        self.atoms
            .find(atom)
            .is_some_and(|index| state.contains(category, index))
    }

    /// Builds the assignment set of the fluent and derived atoms of `state`.
    pub fn state_assignments(&self, state: StateAtoms<'_>) -> AssignmentSet {
        AssignmentSet::build(
            self.problem.num_objects(),
            &self.problem.predicates,
            self.atoms
                .atoms_in(PredicateCategory::Fluent, state.fluent)
                .chain(self.atoms.atoms_in(PredicateCategory::Derived, state.derived)),
        )
    }

    /// Grounds `conjunction` under `binding`.
    ///
    /// Returns `None` if a static literal is violated or some atom is
    /// required both true and false; such groundings can never apply.
    pub fn ground_conjunction(
        &mut self,
        conjunction: &LiteralConjunction,
        binding: &[ObjectId],
    ) -> Option<StripsPrecondition> {
        let mut precondition = StripsPrecondition::default();

        for literal in &conjunction.static_literals {
            let index = self.atoms.ground(&literal.atom, binding);
            if self.static_atoms.contains(index) == literal.negated {
                return None;
            }
            if literal.negated {
                precondition.negative_static.insert(index);
            } else {
                precondition.positive_static.insert(index);
            }
        }
        for literal in &conjunction.fluent_literals {
            let index = self.atoms.ground(&literal.atom, binding);
            if literal.negated {
                precondition.negative_fluent.insert(index);
            } else {
                precondition.positive_fluent.insert(index);
            }
        }
        for literal in &conjunction.derived_literals {
            let index = self.atoms.ground(&literal.atom, binding);
            if literal.negated {
                precondition.negative_derived.insert(index);
            } else {
                precondition.positive_derived.insert(index);
            }
        }

        (!precondition.is_contradictory()).then_some(precondition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groundforge_core::{Atom, GroundLiteral, Literal, PredicateId, ProblemBuilder, Term};

    fn problem() -> (Arc<Problem>, PredicateId, PredicateId) {
        let mut builder = ProblemBuilder::new("context");
        let a = builder.object("a");
        let b = builder.object("b");
        let road = builder.predicate("road", 2, PredicateCategory::Static);
        let at = builder.predicate("at", 1, PredicateCategory::Fluent);
        builder.initial_atom(road, [a, b]).initial_atom(at, [a]);
        (Arc::new(builder.build().unwrap()), road, at)
    }

    #[test]
    fn test_static_atoms_are_indexed() {
        let (problem, road, _) = problem();
        let context = GroundingContext::new(problem).unwrap();

        assert_eq!(context.static_atoms().count(), 1);
        assert!(context.holds_static(&GroundAtom::new(road, [ObjectId(0), ObjectId(1)])));
        assert!(!context.holds_static(&GroundAtom::new(road, [ObjectId(1), ObjectId(0)])));
        assert!(context
            .static_assignments()
            .consistent_binary(road, 0, ObjectId(0), 1, ObjectId(1)));
        // Fluent initial atoms are left to the state repository.
        assert_eq!(context.atoms().len(PredicateCategory::Fluent), 0);
    }

    #[test]
    fn test_negative_initial_literal_rejected() {
        let (problem, _, at) = problem();
        let mut problem = (*problem).clone();
        problem
            .initial
            .push(GroundLiteral::negative(GroundAtom::new(at, [ObjectId(1)])));

        let err = GroundingContext::new(Arc::new(problem)).unwrap_err();
        assert!(matches!(err, GroundForgeError::NegativeInitialLiteral { ref atom } if atom == "at(b)"));
    }

    #[test]
    fn test_ground_conjunction() {
        let (problem, road, at) = problem();
        let mut context = GroundingContext::new(problem.clone()).unwrap();
        let mut conjunction = LiteralConjunction::default();
        conjunction.push(
            &problem,
            Literal::positive(Atom::new(road, [Term::Parameter(0), Term::Parameter(1)])),
        );
        conjunction.push(&problem, Literal::positive(Atom::new(at, [Term::Parameter(0)])));
        conjunction.push(&problem, Literal::negative(Atom::new(at, [Term::Parameter(1)])));

        let precondition = context
            .ground_conjunction(&conjunction, &[ObjectId(0), ObjectId(1)])
            .unwrap();
        assert_eq!(precondition.positive_static.count(), 1);
        assert_eq!(precondition.positive_fluent.count(), 1);
        assert_eq!(precondition.negative_fluent.count(), 1);

        assert!(context
            .ground_conjunction(&conjunction, &[ObjectId(1), ObjectId(0)])
            .is_none());

        // at(?x) and not at(?y) with ?x = ?y
        conjunction.static_literals.clear();
        assert!(context
            .ground_conjunction(&conjunction, &[ObjectId(0), ObjectId(0)])
            .is_none());
        assert!(context
            .ground_conjunction(&conjunction, &[ObjectId(1), ObjectId(0)])
            .is_some());
    }
}
