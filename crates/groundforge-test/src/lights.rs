//! Conditional effects and action costs.
//!
//! Switches toggle every lamp wired to them: for each wired lamp, a lamp
//! that is off turns on and a lamp that is on turns off, both decided on the
//! source state. Toggling costs `toggle-cost(?s)`; inspecting a lamp costs 1
//! plus `bulb-cost(?l)` if the lamp is on.

use groundforge_core::{
    ActionSchema, Atom, Condition, Effect, FunctionExpression, FunctionTerm, Literal,
    PredicateCategory, Problem, ProblemBuilder, Term,
};

fn p(i: usize) -> Term {
    Term::Parameter(i)
}

/// Switches `s1` (wired to `l1`, `l2`) and `s2` (wired to `l3`); `l2` starts on.
pub fn lights() -> Problem {
    let mut builder = ProblemBuilder::new("lights");
    let s1 = builder.object("s1");
    let s2 = builder.object("s2");
    let l1 = builder.object("l1");
    let l2 = builder.object("l2");
    let l3 = builder.object("l3");

    let switch = builder.predicate("switch", 1, PredicateCategory::Static);
    let lamp = builder.predicate("lamp", 1, PredicateCategory::Static);
    let wired = builder.predicate("wired", 2, PredicateCategory::Static);
    let on = builder.predicate("on", 1, PredicateCategory::Fluent);
    let toggle_cost = builder.function("toggle-cost", 1);
    let bulb_cost = builder.function("bulb-cost", 1);

    let flip = |turn_on: bool| Effect::Forall {
        parameters: 1,
        effect: Box::new(Effect::When {
            condition: Condition::conjunction([
                Literal::positive(Atom::new(wired, [p(0), p(1)])),
                Literal {
                    negated: turn_on,
                    atom: Atom::new(on, [p(1)]),
                },
            ]),
            effect: Box::new(Effect::Literal(Literal {
                negated: !turn_on,
                atom: Atom::new(on, [p(1)]),
            })),
        }),
    };
    builder.schema(ActionSchema::new(
        "toggle",
        1,
        Condition::atom(Atom::new(switch, [p(0)])),
        Effect::And(vec![
            Effect::IncreaseCost(FunctionExpression::Function(FunctionTerm {
                function: toggle_cost,
                terms: vec![p(0)],
            })),
            flip(true),
            flip(false),
        ]),
    ));

    builder.schema(ActionSchema::new(
        "inspect",
        1,
        Condition::atom(Atom::new(lamp, [p(0)])),
        Effect::And(vec![
            Effect::IncreaseCost(FunctionExpression::Number(1.0)),
            Effect::When {
                condition: Condition::atom(Atom::new(on, [p(0)])),
                effect: Box::new(Effect::IncreaseCost(FunctionExpression::Function(
                    FunctionTerm {
                        function: bulb_cost,
                        terms: vec![p(0)],
                    },
                ))),
            },
        ]),
    ));

    builder
        .initial_atom(switch, [s1])
        .initial_atom(switch, [s2])
        .initial_atom(lamp, [l1])
        .initial_atom(lamp, [l2])
        .initial_atom(lamp, [l3])
        .initial_atom(wired, [s1, l1])
        .initial_atom(wired, [s1, l2])
        .initial_atom(wired, [s2, l3])
        .initial_atom(on, [l2])
        .numeric_fluent(toggle_cost, [s1], 2.0)
        .numeric_fluent(toggle_cost, [s2], 5.0)
        .numeric_fluent(bulb_cost, [l1], 10.0)
        .numeric_fluent(bulb_cost, [l2], 10.0)
        .numeric_fluent(bulb_cost, [l3], 20.0)
        .goal_atom(on, [l1])
        .goal_atom(on, [l3])
        .use_action_costs();

    builder.build().expect("lights fixture is valid")
}
