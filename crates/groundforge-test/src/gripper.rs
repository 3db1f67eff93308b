//! The gripper domain.
//!
//! A robot with two grippers moves balls from `rooma` to `roomb`. All
//! configurations are reachable, so with `n` balls the state space has
//! `2 * (2^n + 2n * 2^(n-1) + n(n-1) * 2^(n-2))` states.

use groundforge_core::{
    ActionSchema, Atom, Condition, Effect, Literal, PredicateCategory, Problem, ProblemBuilder,
    Term,
};

fn p(i: usize) -> Term {
    Term::Parameter(i)
}

/// Builds gripper with `num_balls` balls, all starting in `rooma`.
pub fn gripper(num_balls: usize) -> Problem {
    let mut builder = ProblemBuilder::new(format!("gripper-{}", num_balls));
    let rooma = builder.object("rooma");
    let roomb = builder.object("roomb");
    let left = builder.object("left");
    let right = builder.object("right");
    let balls: Vec<_> = (1..=num_balls)
        .map(|i| builder.object(format!("ball{}", i)))
        .collect();

    let room = builder.predicate("room", 1, PredicateCategory::Static);
    let ball = builder.predicate("ball", 1, PredicateCategory::Static);
    let gripper = builder.predicate("gripper", 1, PredicateCategory::Static);
    let at_robby = builder.predicate("at-robby", 1, PredicateCategory::Fluent);
    let at = builder.predicate("at", 2, PredicateCategory::Fluent);
    let free = builder.predicate("free", 1, PredicateCategory::Fluent);
    let carry = builder.predicate("carry", 2, PredicateCategory::Fluent);

    // move(?from, ?to)
    builder.schema(ActionSchema::new(
        "move",
        2,
        Condition::conjunction([
            Literal::positive(Atom::new(room, [p(0)])),
            Literal::positive(Atom::new(room, [p(1)])),
            Literal::positive(Atom::new(at_robby, [p(0)])),
        ]),
        Effect::literals([
            Literal::positive(Atom::new(at_robby, [p(1)])),
            Literal::negative(Atom::new(at_robby, [p(0)])),
        ]),
    ));

    // pick(?obj, ?room, ?gripper)
    builder.schema(ActionSchema::new(
        "pick",
        3,
        Condition::conjunction([
            Literal::positive(Atom::new(ball, [p(0)])),
            Literal::positive(Atom::new(room, [p(1)])),
            Literal::positive(Atom::new(gripper, [p(2)])),
            Literal::positive(Atom::new(at, [p(0), p(1)])),
            Literal::positive(Atom::new(at_robby, [p(1)])),
            Literal::positive(Atom::new(free, [p(2)])),
        ]),
        Effect::literals([
            Literal::positive(Atom::new(carry, [p(0), p(2)])),
            Literal::negative(Atom::new(at, [p(0), p(1)])),
            Literal::negative(Atom::new(free, [p(2)])),
        ]),
    ));

    // drop(?obj, ?room, ?gripper)
    builder.schema(ActionSchema::new(
        "drop",
        3,
        Condition::conjunction([
            Literal::positive(Atom::new(ball, [p(0)])),
            Literal::positive(Atom::new(room, [p(1)])),
            Literal::positive(Atom::new(gripper, [p(2)])),
            Literal::positive(Atom::new(carry, [p(0), p(2)])),
            Literal::positive(Atom::new(at_robby, [p(1)])),
        ]),
        Effect::literals([
            Literal::positive(Atom::new(at, [p(0), p(1)])),
            Literal::positive(Atom::new(free, [p(2)])),
            Literal::negative(Atom::new(carry, [p(0), p(2)])),
        ]),
    ));

    builder
        .initial_atom(room, [rooma])
        .initial_atom(room, [roomb])
        .initial_atom(gripper, [left])
        .initial_atom(gripper, [right])
        .initial_atom(at_robby, [rooma])
        .initial_atom(free, [left])
        .initial_atom(free, [right]);
    for &b in &balls {
        builder.initial_atom(ball, [b]).initial_atom(at, [b, rooma]);
        builder.goal_atom(at, [b, roomb]);
    }

    builder.build().expect("gripper fixture is valid")
}

/// Number of reachable states of [`gripper`] with `num_balls` balls.
pub fn reachable_state_count(num_balls: usize) -> usize {
    let n = num_balls;
    let pow = |e: usize| 1usize << e;
    let none_held = pow(n);
    let one_held = if n >= 1 { 2 * n * pow(n - 1) } else { 0 };
    let two_held = if n >= 2 { n * (n - 1) * pow(n - 2) } else { 0 };
    2 * (none_held + one_held + two_held)
}
