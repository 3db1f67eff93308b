//! A ternary static predicate.
//!
//! `route(t1, a, b)`, `route(t1, b, c)` and `route(t2, a, c)` make every
//! pair of positions of `route(t1, a, c)` look plausible, although the atom
//! itself does not exist. Grounding must still reject `drive(t1, a, c)`.

use groundforge_core::{
    ActionSchema, Atom, Condition, Effect, Literal, PredicateCategory, Problem, ProblemBuilder,
    Term,
};

fn p(i: usize) -> Term {
    Term::Parameter(i)
}

/// Trucks `t1`, `t2` at `a`; `drive(?t, ?from, ?to)` follows `route/3`.
pub fn routes() -> Problem {
    let mut builder = ProblemBuilder::new("routes");
    let t1 = builder.object("t1");
    let t2 = builder.object("t2");
    let a = builder.object("a");
    let b = builder.object("b");
    let c = builder.object("c");

    let truck = builder.predicate("truck", 1, PredicateCategory::Static);
    let route = builder.predicate("route", 3, PredicateCategory::Static);
    let at = builder.predicate("at", 2, PredicateCategory::Fluent);

    builder.schema(ActionSchema::new(
        "drive",
        3,
        Condition::conjunction([
            Literal::positive(Atom::new(truck, [p(0)])),
            Literal::positive(Atom::new(route, [p(0), p(1), p(2)])),
            Literal::positive(Atom::new(at, [p(0), p(1)])),
        ]),
        Effect::literals([
            Literal::positive(Atom::new(at, [p(0), p(2)])),
            Literal::negative(Atom::new(at, [p(0), p(1)])),
        ]),
    ));

    builder
        .initial_atom(truck, [t1])
        .initial_atom(truck, [t2])
        .initial_atom(route, [t1, a, b])
        .initial_atom(route, [t1, b, c])
        .initial_atom(route, [t2, a, c])
        .initial_atom(at, [t1, a])
        .initial_atom(at, [t2, a])
        .goal_atom(at, [t1, c]);

    builder.build().expect("routes fixture is valid")
}
