//! Stratified axioms over a corridor with blocked cells.
//!
//! Cells `n0 .. n{k-1}` are linked by `edge(n_i, n_{i+1})`. Every odd cell
//! starts blocked. `reachable` is derived from the agent position through
//! unblocked edges; `cut-off` holds for every cell that is not reachable and
//! therefore sits one stratum above `reachable`.
//!
//! - `move(?x, ?y)` walks along an unblocked edge.
//! - `clear(?x, ?y)` unblocks the cell after a reachable one.
//! - `signal()` needs the last cell not to be cut off.

use groundforge_core::{
    ActionSchema, Atom, Axiom, Condition, Effect, Literal, PredicateCategory, Problem,
    ProblemBuilder, Term,
};

fn p(i: usize) -> Term {
    Term::Parameter(i)
}

/// Builds a corridor of `cells` cells (at least 1).
pub fn corridor(cells: usize) -> Problem {
    assert!(cells > 0, "a corridor needs at least one cell");

    let mut builder = ProblemBuilder::new(format!("corridor-{}", cells));
    let nodes: Vec<_> = (0..cells).map(|i| builder.object(format!("n{}", i))).collect();

    let node = builder.predicate("node", 1, PredicateCategory::Static);
    let edge = builder.predicate("edge", 2, PredicateCategory::Static);
    let at = builder.predicate("at", 1, PredicateCategory::Fluent);
    let blocked = builder.predicate("blocked", 1, PredicateCategory::Fluent);
    let signalled = builder.predicate("signalled", 0, PredicateCategory::Fluent);
    let reachable = builder.predicate("reachable", 1, PredicateCategory::Derived);
    let cut_off = builder.predicate("cut-off", 1, PredicateCategory::Derived);

    builder.axiom(Axiom::new(
        1,
        Condition::atom(Atom::new(at, [p(0)])),
        Atom::new(reachable, [p(0)]),
    ));
    builder.axiom(Axiom::new(
        2,
        Condition::conjunction([
            Literal::positive(Atom::new(reachable, [p(0)])),
            Literal::positive(Atom::new(edge, [p(0), p(1)])),
            Literal::negative(Atom::new(blocked, [p(1)])),
        ]),
        Atom::new(reachable, [p(1)]),
    ));
    builder.axiom(Axiom::new(
        1,
        Condition::conjunction([
            Literal::positive(Atom::new(node, [p(0)])),
            Literal::negative(Atom::new(reachable, [p(0)])),
        ]),
        Atom::new(cut_off, [p(0)]),
    ));

    builder.schema(ActionSchema::new(
        "move",
        2,
        Condition::conjunction([
            Literal::positive(Atom::new(at, [p(0)])),
            Literal::positive(Atom::new(edge, [p(0), p(1)])),
            Literal::negative(Atom::new(blocked, [p(1)])),
        ]),
        Effect::literals([
            Literal::positive(Atom::new(at, [p(1)])),
            Literal::negative(Atom::new(at, [p(0)])),
        ]),
    ));
    builder.schema(ActionSchema::new(
        "clear",
        2,
        Condition::conjunction([
            Literal::positive(Atom::new(reachable, [p(0)])),
            Literal::positive(Atom::new(edge, [p(0), p(1)])),
            Literal::positive(Atom::new(blocked, [p(1)])),
        ]),
        Effect::Literal(Literal::negative(Atom::new(blocked, [p(1)]))),
    ));
    let last = nodes[cells - 1];
    builder.schema(ActionSchema::new(
        "signal",
        0,
        Condition::conjunction([
            Literal::negative(Atom::new(cut_off, [Term::Object(last)])),
            Literal::negative(Atom::new(signalled, [])),
        ]),
        Effect::Literal(Literal::positive(Atom::new(signalled, []))),
    ));

    for (i, &n) in nodes.iter().enumerate() {
        builder.initial_atom(node, [n]);
        if i + 1 < cells {
            builder.initial_atom(edge, [n, nodes[i + 1]]);
        }
        if i % 2 == 1 {
            builder.initial_atom(blocked, [n]);
        }
    }
    builder.initial_atom(at, [nodes[0]]);
    builder.goal_atom(signalled, []);

    builder.build().expect("corridor fixture is valid")
}
