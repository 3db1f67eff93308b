use super::*;
use std::collections::{BTreeMap, HashSet, VecDeque};

use groundforge_core::{Bitset, GroundAtom, GroundForgeError, PredicateCategory};
use groundforge_test::{corridor, gripper, lights, object, predicate, routes, single_move};

/// Per reachable state, rendered by name: derived atoms and the applicable
/// actions with their cost in that state.
type TransitionSystem = BTreeMap<Vec<String>, (Vec<String>, Vec<String>)>;

fn names(generator: &dyn ApplicableActionGenerator, category: PredicateCategory, atoms: &Bitset) -> Vec<String> {
    let mut names: Vec<String> = generator
        .atoms()
        .atoms_in(category, atoms)
        .map(|atom| generator.problem().display_atom(atom))
        .collect();
    names.sort();
    names
}

fn explore(generator: &mut dyn ApplicableActionGenerator) -> TransitionSystem {
    let mut initial = Bitset::new();
    for literal in generator.problem().initial.clone() {
        if generator.atoms().category(literal.atom.predicate) == PredicateCategory::Fluent {
            initial.insert(generator.atoms_mut().get_or_create(literal.atom));
        }
    }

    let mut system = TransitionSystem::new();
    let mut seen = HashSet::from([initial.clone()]);
    let mut queue = VecDeque::from([initial]);
    while let Some(fluent) = queue.pop_front() {
        let mut state = StateBuilder::new(fluent);
        generator.generate_and_apply_axioms(&mut state).unwrap();
        let applicable = generator.generate_applicable_actions(state.atoms()).unwrap();

        let mut labels = Vec::with_capacity(applicable.len());
        for index in applicable {
            let action = generator.ground_action(index);
            let (successor, cost) = action.apply(state.atoms());
            labels.push(format!("{} [{}]", action.display(generator.problem()), cost));
            if seen.insert(successor.clone()) {
                queue.push_back(successor);
            }
        }
        labels.sort();

        let key = names(generator, PredicateCategory::Fluent, &state.fluent);
        let derived = names(generator, PredicateCategory::Derived, &state.derived);
        system.insert(key, (derived, labels));
    }
    system
}

fn assert_parity(problem: Problem) -> TransitionSystem {
    let problem = Arc::new(problem);
    let mut lifted = create_generator(Arc::clone(&problem), GeneratorKind::Lifted).unwrap();
    let mut grounded = create_generator(problem, GeneratorKind::Grounded).unwrap();

    let expected = explore(lifted.as_mut());
    let actual = explore(grounded.as_mut());
    assert_eq!(actual, expected);
    expected
}

#[test]
fn test_parity_single_move() {
    let system = assert_parity(single_move());
    assert_eq!(system.len(), 2);
    assert_eq!(system[&vec!["at(r1)".to_string()]].1, vec!["move(r1) [1]"]);
}

#[test]
fn test_parity_gripper() {
    for balls in 1..=2 {
        let system = assert_parity(gripper(balls));
        assert_eq!(system.len(), groundforge_test::gripper::reachable_state_count(balls));
    }
}

#[test]
fn test_parity_corridor() {
    let system = assert_parity(corridor(3));
    assert_eq!(system.len(), 7);

    let initial = vec!["at(n0)".to_string(), "blocked(n1)".to_string()];
    let (derived, actions) = &system[&initial];
    assert_eq!(derived, &vec!["cut-off(n1)", "cut-off(n2)", "reachable(n0)"]);
    assert_eq!(actions, &vec!["clear(n0, n1) [1]"]);
}

#[test]
fn test_parity_lights() {
    let system = assert_parity(lights());
    // s1 flips l1 and l2 together, so only one of them is ever on.
    assert_eq!(system.len(), 4);
    let (_, actions) = &system[&vec!["on(l2)".to_string()]];
    assert!(actions.contains(&"toggle(s1) [2]".to_string()));
    assert!(actions.contains(&"inspect(l2) [11]".to_string()));
}

#[test]
fn test_parity_routes() {
    let system = assert_parity(routes());
    let initial = vec!["at(t1, a)".to_string(), "at(t2, a)".to_string()];
    assert_eq!(
        system[&initial].1,
        vec!["drive(t1, a, b) [1]", "drive(t2, a, c) [1]"]
    );
}

#[test]
fn test_grounded_counts_relaxed_actions() {
    let generator = GroundedGenerator::new(Arc::new(gripper(2))).unwrap();
    assert_eq!(generator.num_ground_actions(), 20);
    assert_eq!(generator.action_tree().len(), 20);
}

#[test]
fn test_grounded_rejects_unknown_atoms() {
    let problem = Arc::new(gripper(1));
    let mut generator = create_generator(Arc::clone(&problem), GeneratorKind::Grounded).unwrap();

    // A ball is never "at" a gripper, so relaxed exploration never created this atom.
    let odd = GroundAtom::new(
        predicate(&problem, "at"),
        [object(&problem, "ball1"), object(&problem, "left")],
    );
    let index = generator.atoms_mut().get_or_create(odd);
    let fluent: Bitset = [index].into_iter().collect();
    let derived = Bitset::new();

    let err = generator
        .generate_applicable_actions(StateAtoms::new(&fluent, &derived))
        .unwrap_err();
    assert!(matches!(err, GroundForgeError::StaleMatchTree { .. }));
}

#[test]
fn test_lifted_grows_its_table_lazily() {
    let mut generator = LiftedGenerator::new(Arc::new(gripper(2))).unwrap();
    assert_eq!(generator.num_ground_actions(), 0);
    explore(&mut generator);
    assert!(generator.num_ground_actions() > 0);
    assert!(generator.num_ground_actions() <= 20);
}
