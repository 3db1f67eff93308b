use super::*;
use std::sync::Arc;

use groundforge_core::{Axiom, Condition, GroundAtom, PredicateId, ProblemBuilder, Term};
use groundforge_test::{corridor, object, predicate};

fn derived_names(context: &GroundingContext, state: &StateBuilder) -> Vec<String> {
    let mut names: Vec<String> = state
        .derived
        .iter()
        .map(|i| {
            let atom = context.atoms().atom(PredicateCategory::Derived, i);
            context.problem().display_atom(atom)
        })
        .collect();
    names.sort();
    names
}

fn initial_state(context: &mut GroundingContext) -> StateBuilder {
    let problem = Arc::clone(context.problem_arc());
    let atoms = context.atoms_mut();
    StateBuilder::new(
        problem
            .initial
            .iter()
            .filter(|l| problem.predicate(l.atom.predicate).category == PredicateCategory::Fluent)
            .map(|l| atoms.get_or_create(l.atom.clone()))
            .collect(),
    )
}

fn flatten_all(problem: &Problem) -> (Vec<Atom>, Vec<LiteralConjunction>) {
    problem
        .axioms
        .iter()
        .enumerate()
        .map(|(i, axiom)| {
            let body = LiteralConjunction::flatten(problem, &axiom.body, &format!("axiom {}", i)).unwrap();
            (axiom.head.clone(), body)
        })
        .unzip()
}

/// Two derived predicates `p/1` and `q/1`, with `p(x) :- not q(x)` and
/// `q(x) :- not p(x)` when `cyclic`, otherwise only the first.
fn mutual(cyclic: bool) -> (Problem, PredicateId, PredicateId) {
    let mut builder = ProblemBuilder::new("mutual");
    builder.object("a");
    let p = builder.predicate("p", 1, PredicateCategory::Derived);
    let q = builder.predicate("q", 1, PredicateCategory::Derived);
    let x = || [Term::Parameter(0)];
    builder.axiom(Axiom::new(1, Condition::not_atom(Atom::new(q, x())), Atom::new(p, x())));
    if cyclic {
        builder.axiom(Axiom::new(1, Condition::not_atom(Atom::new(p, x())), Atom::new(q, x())));
    }
    (builder.build().unwrap(), p, q)
}

#[test]
fn test_corridor_has_two_strata() {
    let problem = corridor(3);
    let (heads, bodies) = flatten_all(&problem);
    let strata = stratify(&problem, &heads, &bodies).unwrap();
    assert_eq!(strata, vec![vec![AxiomId(0), AxiomId(1)], vec![AxiomId(2)]]);
}

#[test]
fn test_negative_dependency_raises_stratum() {
    let (problem, _, _) = mutual(false);
    let (heads, bodies) = flatten_all(&problem);
    // q has no axioms, so p alone sits in stratum 1 and stratum 0 is dropped.
    let strata = stratify(&problem, &heads, &bodies).unwrap();
    assert_eq!(strata, vec![vec![AxiomId(0)]]);
}

#[test]
fn test_negative_cycle_is_unstratifiable() {
    let (problem, _, _) = mutual(true);
    let (heads, bodies) = flatten_all(&problem);
    let err = stratify(&problem, &heads, &bodies).unwrap_err();
    assert!(matches!(err, GroundForgeError::UnstratifiableAxioms { .. }));
}

#[test]
fn test_negative_self_loop_is_unstratifiable() {
    let mut builder = ProblemBuilder::new("liar");
    builder.object("a");
    let p = builder.predicate("p", 1, PredicateCategory::Derived);
    builder.axiom(Axiom::new(
        1,
        Condition::not_atom(Atom::new(p, [Term::Parameter(0)])),
        Atom::new(p, [Term::Parameter(0)]),
    ));
    let context = GroundingContext::new(Arc::new(builder.build().unwrap())).unwrap();

    let err = AxiomEvaluator::new(&context).unwrap_err();
    assert!(matches!(
        err,
        GroundForgeError::UnstratifiableAxioms { ref predicate } if predicate == "p"
    ));
}

#[test]
fn test_fluent_head_is_rejected() {
    let mut builder = ProblemBuilder::new("fluent-head");
    builder.object("a");
    let at = builder.predicate("at", 1, PredicateCategory::Fluent);
    let seen = builder.predicate("seen", 1, PredicateCategory::Fluent);
    builder.axiom(Axiom::new(
        1,
        Condition::atom(Atom::new(at, [Term::Parameter(0)])),
        Atom::new(seen, [Term::Parameter(0)]),
    ));
    let context = GroundingContext::new(Arc::new(builder.build().unwrap())).unwrap();

    let err = AxiomEvaluator::new(&context).unwrap_err();
    assert!(matches!(
        err,
        GroundForgeError::Unsupported {
            construct: UnsupportedConstruct::NonDerivedAxiomHead,
            ..
        }
    ));
}

#[test]
fn test_evaluate_corridor_initial_state() {
    let mut context = GroundingContext::new(Arc::new(corridor(3))).unwrap();
    let mut evaluator = AxiomEvaluator::new(&context).unwrap();
    let mut state = initial_state(&mut context);

    evaluator.evaluate(&mut context, &mut state);
    assert_eq!(
        derived_names(&context, &state),
        vec!["cut-off(n1)", "cut-off(n2)", "reachable(n0)"]
    );
}

#[test]
fn test_evaluate_follows_unblocked_edges() {
    let problem = Arc::new(corridor(3));
    let mut context = GroundingContext::new(Arc::clone(&problem)).unwrap();
    let mut evaluator = AxiomEvaluator::new(&context).unwrap();

    // Only the agent at n0, nothing blocked.
    let at_n0 = GroundAtom::new(predicate(&problem, "at"), [object(&problem, "n0")]);
    let mut state = StateBuilder::new([context.atoms_mut().get_or_create(at_n0)].into_iter().collect());

    evaluator.evaluate(&mut context, &mut state);
    assert_eq!(
        derived_names(&context, &state),
        vec!["reachable(n0)", "reachable(n1)", "reachable(n2)"]
    );
}

#[test]
fn test_relaxed_evaluation_ignores_negations() {
    let mut context = GroundingContext::new(Arc::new(corridor(3))).unwrap();
    let mut evaluator = AxiomEvaluator::new(&context).unwrap();
    let mut state = initial_state(&mut context);

    evaluator.evaluate_relaxed(&mut context, &mut state);
    assert_eq!(state.derived.count(), 6);
}

#[test]
fn test_instantiation_is_cached() {
    let problem = Arc::new(corridor(2));
    let mut context = GroundingContext::new(Arc::clone(&problem)).unwrap();
    let mut evaluator = AxiomEvaluator::new(&context).unwrap();

    let n0 = object(&problem, "n0");
    let n1 = object(&problem, "n1");
    let first = evaluator.instantiate(&mut context, AxiomId(1), [n0, n1].into_iter().collect());
    let again = evaluator.instantiate(&mut context, AxiomId(1), [n0, n1].into_iter().collect());
    assert!(first.is_some());
    assert_eq!(first, again);
    assert_eq!(evaluator.ground_axioms().count(), 1);

    // edge(n1, n0) does not exist.
    let reversed = evaluator.instantiate(&mut context, AxiomId(1), [n1, n0].into_iter().collect());
    assert_eq!(reversed, None);
}

#[test]
fn test_no_axioms() {
    let context = GroundingContext::new(Arc::new(groundforge_test::gripper(1))).unwrap();
    let evaluator = AxiomEvaluator::new(&context).unwrap();
    assert!(evaluator.is_empty());
    assert!(evaluator.strata().is_empty());
}

#[test]
fn test_negation_of_underived_atom_holds() {
    let (problem, p, _) = mutual(false);
    let problem = Arc::new(problem);
    let mut context = GroundingContext::new(Arc::clone(&problem)).unwrap();
    let mut evaluator = AxiomEvaluator::new(&context).unwrap();
    let mut state = StateBuilder::default();

    evaluator.evaluate(&mut context, &mut state);
    let p_a = GroundAtom::new(p, [object(&problem, "a")]);
    let index = context.atoms().find(&p_a).unwrap();
    assert!(state.derived.contains(index));
}
