//! The smallest interesting problem.
//!
//! `move(?x)` requires `at(?x)` and deletes it. With `at(r1)` initially,
//! `move(r1)` is the only applicable action and leads to the empty state.

use groundforge_core::{
    ActionSchema, Atom, Condition, Effect, Literal, PredicateCategory, Problem, ProblemBuilder,
    Term,
};

/// Objects `r1`, `r2`; fluent `at/1`; schema `move(?x)`; initial state `{at(r1)}`.
pub fn single_move() -> Problem {
    let mut builder = ProblemBuilder::new("single-move");
    let r1 = builder.object("r1");
    builder.object("r2");
    let at = builder.predicate("at", 1, PredicateCategory::Fluent);

    let at_x = Atom::new(at, [Term::Parameter(0)]);
    builder.schema(ActionSchema::new(
        "move",
        1,
        Condition::atom(at_x.clone()),
        Effect::Literal(Literal::negative(at_x)),
    ));
    builder.initial_atom(at, [r1]);

    builder.build().expect("single-move fixture is valid")
}
