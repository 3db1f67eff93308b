//! Deduplicating state storage and successor generation.
//!
//! States are keyed by their fluent atoms only. Derived atoms are computed
//! once, when a fluent signature is first seen, and cached alongside it.

use std::sync::Arc;

use groundforge_config::GeneratorKind;
use groundforge_core::{Bitset, GroundAtom, GroundForgeError, PredicateCategory, Problem, Result};
use groundforge_grounding::{
    create_generator, ApplicableActionGenerator, GroundAction, GroundActionIndex, StateAtoms,
    StateBuilder, StripsPrecondition,
};
use indexmap::IndexMap;
use tracing::trace;

use crate::state::{State, StateIndex};

/// Owns the generator and every state created so far.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use groundforge_config::GeneratorKind;
/// use groundforge_core::{
///     ActionSchema, Atom, Condition, Effect, Literal, PredicateCategory, ProblemBuilder, Term,
/// };
/// use groundforge_state::StateRepository;
///
/// let mut builder = ProblemBuilder::new("leave");
/// let r1 = builder.object("r1");
/// let at = builder.predicate("at", 1, PredicateCategory::Fluent);
/// builder.schema(ActionSchema::new(
///     "move",
///     1,
///     Condition::atom(Atom::new(at, [Term::Parameter(0)])),
///     Effect::Literal(Literal::negative(Atom::new(at, [Term::Parameter(0)]))),
/// ));
/// builder.initial_atom(at, [r1]);
/// let problem = Arc::new(builder.build().unwrap());
///
/// let mut repository = StateRepository::from_problem(problem, GeneratorKind::Lifted).unwrap();
/// let initial = repository.get_or_create_initial_state().unwrap();
/// let actions = repository.generate_applicable_actions(initial).unwrap();
/// assert_eq!(actions.len(), 1);
///
/// let (successor, cost) = repository.get_or_create_successor_state(initial, actions[0]).unwrap();
/// assert!(repository.state(successor).fluent_atoms().is_empty());
/// assert_eq!(cost, 1.0);
/// assert_eq!(repository.state_count(), 2);
/// ```
#[derive(Debug)]
pub struct StateRepository {
    generator: Box<dyn ApplicableActionGenerator>,
    /// Fluent atoms to derived atoms, in creation order.
    states: IndexMap<Bitset, Bitset>,
    reached_fluent: Bitset,
    reached_derived: Bitset,
    /// `None` if a static goal literal is violated.
    goal: Option<StripsPrecondition>,
}

impl StateRepository {
    /// Wraps an existing generator.
    pub fn new(mut generator: Box<dyn ApplicableActionGenerator>) -> Self {
        let goal = goal_condition(generator.as_mut());
        Self {
            generator,
            states: IndexMap::new(),
            reached_fluent: Bitset::new(),
            reached_derived: Bitset::new(),
            goal,
        }
    }

    /// Builds the generator selected by `kind` and wraps it.
    ///
    /// # Errors
    ///
    /// Propagates generator construction errors.
    pub fn from_problem(problem: Arc<Problem>, kind: GeneratorKind) -> Result<Self> {
        Ok(Self::new(create_generator(problem, kind)?))
    }

    #[inline]
    pub fn problem(&self) -> &Problem {
        self.generator.problem()
    }

    #[inline]
    pub fn generator(&self) -> &dyn ApplicableActionGenerator {
        self.generator.as_ref()
    }

    /// Creates (or finds) the state of the problem's initial fluent atoms.
    ///
    /// # Errors
    ///
    /// Returns [`GroundForgeError::NegativeInitialLiteral`] if the initial
    /// state lists a negated atom.
    pub fn get_or_create_initial_state(&mut self) -> Result<StateIndex> {
        let mut fluent = Bitset::new();
        for literal in self.generator.problem().initial.clone() {
            if literal.negated {
                return Err(GroundForgeError::NegativeInitialLiteral {
                    atom: self.problem().display_atom(&literal.atom),
                });
            }
            let atoms = self.generator.atoms_mut();
            if atoms.category(literal.atom.predicate) == PredicateCategory::Fluent {
                fluent.insert(atoms.get_or_create(literal.atom));
            }
        }
        self.get_or_create_state(fluent)
    }

    /// Returns the state with exactly the fluent atoms `fluent`, creating it
    /// and evaluating its axioms if it is new.
    pub fn get_or_create_state(&mut self, fluent: Bitset) -> Result<StateIndex> {
        if let Some(index) = self.states.get_index_of(&fluent) {
            return Ok(StateIndex(index));
        }

        let mut state = StateBuilder::new(fluent);
        if self.generator.problem().has_axioms() {
            self.generator.generate_and_apply_axioms(&mut state)?;
        }
        self.reached_fluent.union_with(&state.fluent);
        self.reached_derived.union_with(&state.derived);

        let fluent_atoms = state.fluent.count();
        let derived_atoms = state.derived.count();
        let (index, _) = self.states.insert_full(state.fluent, state.derived);
        trace!(
            event = "state_created",
            state = index,
            fluent_atoms,
            derived_atoms,
        );
        Ok(StateIndex(index))
    }

    /// Applies `action` to `state` and returns the resulting state together
    /// with the cost of this application.
    ///
    /// # Panics
    ///
    /// Panics if `state` was not issued by this repository.
    pub fn get_or_create_successor_state(
        &mut self,
        state: StateIndex,
        action: GroundActionIndex,
    ) -> Result<(StateIndex, f64)> {
        let (fluent, derived) = lookup(&self.states, state);
        let (successor, cost) = self
            .generator
            .ground_action(action)
            .apply(StateAtoms::new(fluent, derived));
        Ok((self.get_or_create_state(successor)?, cost))
    }

    /// Returns the handles of the ground actions applicable in `state`.
    ///
    /// # Panics
    ///
    /// Panics if `state` was not issued by this repository.
    pub fn generate_applicable_actions(&mut self, state: StateIndex) -> Result<Vec<GroundActionIndex>> {
        let (fluent, derived) = lookup(&self.states, state);
        self.generator
            .generate_applicable_actions(StateAtoms::new(fluent, derived))
    }

    #[inline]
    pub fn ground_action(&self, index: GroundActionIndex) -> &GroundAction {
        self.generator.ground_action(index)
    }

    /// Returns a view of `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` was not issued by this repository.
    pub fn state(&self, index: StateIndex) -> State<'_> {
        let (fluent, derived) = lookup(&self.states, index);
        State::new(index, fluent, derived)
    }

    /// Iterates every state in creation order.
    pub fn states(&self) -> impl Iterator<Item = State<'_>> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(i, (fluent, derived))| State::new(StateIndex(i), fluent, derived))
    }

    #[inline]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Union of the fluent atoms of every state created so far.
    #[inline]
    pub fn reached_fluent_atoms(&self) -> &Bitset {
        &self.reached_fluent
    }

    /// Union of the derived atoms of every state created so far.
    #[inline]
    pub fn reached_derived_atoms(&self) -> &Bitset {
        &self.reached_derived
    }

    /// Returns true if every goal literal holds in `state`.
    pub fn is_goal_state(&self, state: StateIndex) -> bool {
        let (fluent, derived) = lookup(&self.states, state);
        self.goal
            .as_ref()
            .is_some_and(|goal| goal.is_dynamically_applicable(StateAtoms::new(fluent, derived)))
    }

    /// Renders the fluent and derived atoms of `state`, sorted by name.
    pub fn display_state(&self, state: StateIndex) -> String {
        let (fluent, derived) = lookup(&self.states, state);
        let atoms = self.generator.atoms();
        let problem = self.generator.problem();
        let mut names: Vec<String> = atoms
            .atoms_in(PredicateCategory::Fluent, fluent)
            .chain(atoms.atoms_in(PredicateCategory::Derived, derived))
            .map(|atom| problem.display_atom(atom))
            .collect();
        names.sort();
        format!("{{{}}}", names.join(", "))
    }
}

fn lookup(states: &IndexMap<Bitset, Bitset>, index: StateIndex) -> (&Bitset, &Bitset) {
    match states.get_index(index.index()) {
        Some(entry) => entry,
        None => panic!("state {} does not belong to this repository", index),
    }
}

/// Interns the fluent and derived goal atoms. Static goal literals are
/// decided here against the initial state.
fn goal_condition(generator: &mut dyn ApplicableActionGenerator) -> Option<StripsPrecondition> {
    let problem = generator.problem();
    let goal = problem.goal.clone();
    let static_holds = |atom: &GroundAtom| problem.initial.iter().any(|l| !l.negated && &l.atom == atom);

    let mut condition = StripsPrecondition::default();
    let mut dynamic = Vec::new();
    for literal in &goal {
        match generator.atoms().category(literal.atom.predicate) {
            PredicateCategory::Static => {
                if static_holds(&literal.atom) == literal.negated {
                    return None;
                }
            }
            category => dynamic.push((category, literal)),
        }
    }

    for (category, literal) in dynamic {
        let index = generator.atoms_mut().get_or_create(literal.atom.clone());
        let target = match (category, literal.negated) {
            (PredicateCategory::Fluent, false) => &mut condition.positive_fluent,
            (PredicateCategory::Fluent, true) => &mut condition.negative_fluent,
            (_, false) => &mut condition.positive_derived,
            (_, true) => &mut condition.negative_derived,
        };
        target.insert(index);
    }
    Some(condition)
}
