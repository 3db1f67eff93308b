//! Negative preconditions that the consistency graph can only partly use.
//!
//! `go(?x, ?y, ?z)` requires `link(?x, ?y)` and `safe(?y)` and forbids
//! `link(?y, ?z)`, the self loop `link(?z, ?z)`, `link(hub, ?z)`, the
//! ternary `blocked(?x, ?y, ?z)` and `safe(?z)`. Negative binary literals
//! prune edges, while the ternary one and the constant term are only
//! settled by the final applicability check.

use groundforge_core::{
    ActionSchema, Atom, Axiom, Condition, Effect, Literal, PredicateCategory, Problem,
    ProblemBuilder, Term,
};

fn p(i: usize) -> Term {
    Term::Parameter(i)
}

/// Objects `hub`, `n1`, `n2` with `link/2`, `blocked/3`, `visited/1` fluent
/// and `safe(?x) :- not visited(?x)` derived.
pub fn detour() -> Problem {
    let mut builder = ProblemBuilder::new("detour");
    let hub = builder.object("hub");
    let n1 = builder.object("n1");
    let n2 = builder.object("n2");

    let link = builder.predicate("link", 2, PredicateCategory::Fluent);
    let blocked = builder.predicate("blocked", 3, PredicateCategory::Fluent);
    let visited = builder.predicate("visited", 1, PredicateCategory::Fluent);
    let safe = builder.predicate("safe", 1, PredicateCategory::Derived);

    builder.schema(ActionSchema::new(
        "go",
        3,
        Condition::conjunction([
            Literal::positive(Atom::new(link, [p(0), p(1)])),
            Literal::positive(Atom::new(safe, [p(1)])),
            Literal::negative(Atom::new(link, [p(1), p(2)])),
            Literal::negative(Atom::new(link, [p(2), p(2)])),
            Literal::negative(Atom::new(link, [Term::Object(hub), p(2)])),
            Literal::negative(Atom::new(blocked, [p(0), p(1), p(2)])),
            Literal::negative(Atom::new(safe, [p(2)])),
        ]),
        Effect::literals([
            Literal::positive(Atom::new(visited, [p(1)])),
            Literal::positive(Atom::new(link, [p(1), p(2)])),
            Literal::negative(Atom::new(link, [p(0), p(1)])),
        ]),
    ));
    builder.axiom(Axiom::new(
        1,
        Condition::not_atom(Atom::new(visited, [p(0)])),
        Atom::new(safe, [p(0)]),
    ));

    builder
        .initial_atom(link, [hub, n1])
        .initial_atom(link, [n1, n2])
        .initial_atom(visited, [n2])
        .initial_atom(blocked, [hub, n1, hub])
        .goal_atom(visited, [n1]);

    builder.build().expect("detour fixture is valid")
}
