//! Normalization of conditions and effects into flat literal lists.
//!
//! Grounding works on conjunctions of literals split by predicate category.
//! Everything else the front-end can express is either rewritten here
//! (double negation, nested conjunctions) or rejected with
//! [`GroundForgeError::Unsupported`].

use groundforge_core::{
    Condition, Effect, FunctionExpression, GroundForgeError, Literal, PredicateCategory, Problem,
    Result, UnsupportedConstruct,
};

/// A conjunction of literals, split by the category of their predicate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiteralConjunction {
    pub static_literals: Vec<Literal>,
    pub fluent_literals: Vec<Literal>,
    pub derived_literals: Vec<Literal>,
}

impl LiteralConjunction {
    /// Flattens `condition` into a conjunction.
    ///
    /// `location` names the schema or axiom for error messages.
    pub fn flatten(problem: &Problem, condition: &Condition, location: &str) -> Result<Self> {
        let mut conjunction = Self::default();
        conjunction.add_condition(problem, condition, false, location)?;
        Ok(conjunction)
    }

    fn add_condition(
        &mut self,
        problem: &Problem,
        condition: &Condition,
        negated: bool,
        location: &str,
    ) -> Result<()> {
        let unsupported = |construct| Err(GroundForgeError::unsupported(location, construct));
        match condition {
            Condition::Literal(literal) => {
                let literal = Literal {
                    negated: literal.negated != negated,
                    atom: literal.atom.clone(),
                };
                self.push(problem, literal);
                Ok(())
            }
            Condition::Not(inner) if negated => self.add_condition(problem, inner, false, location),
            Condition::Not(inner) => match inner.as_ref() {
                Condition::Literal(_) | Condition::Not(_) => {
                    self.add_condition(problem, inner, true, location)
                }
                _ => unsupported(UnsupportedConstruct::NegatedCompound),
            },
            Condition::And(parts) => parts
                .iter()
                .try_for_each(|part| self.add_condition(problem, part, false, location)),
            Condition::Or(_) => unsupported(UnsupportedConstruct::Disjunction),
            Condition::Imply(..) => unsupported(UnsupportedConstruct::Implication),
            Condition::Exists { .. } => unsupported(UnsupportedConstruct::ExistentialPrecondition),
            Condition::Forall { .. } => unsupported(UnsupportedConstruct::UniversalPrecondition),
        }
    }

    /// Adds a literal to the list matching its predicate's category.
    pub fn push(&mut self, problem: &Problem, literal: Literal) {
        match problem.predicate(literal.atom.predicate).category {
            PredicateCategory::Static => self.static_literals.push(literal),
            PredicateCategory::Fluent => self.fluent_literals.push(literal),
            PredicateCategory::Derived => self.derived_literals.push(literal),
        }
    }

    /// Appends every literal of `other`.
    pub fn extend_from(&mut self, other: &LiteralConjunction) {
        self.static_literals.extend_from_slice(&other.static_literals);
        self.fluent_literals.extend_from_slice(&other.fluent_literals);
        self.derived_literals.extend_from_slice(&other.derived_literals);
    }

    /// Fluent and derived literals, whose truth depends on the state.
    pub fn dynamic_literals(&self) -> impl Iterator<Item = &Literal> + '_ {
        self.fluent_literals.iter().chain(&self.derived_literals)
    }

    /// Every literal of the conjunction.
    pub fn literals(&self) -> impl Iterator<Item = &Literal> + '_ {
        self.static_literals.iter().chain(self.dynamic_literals())
    }

    pub fn is_empty(&self) -> bool {
        self.static_literals.is_empty()
            && self.fluent_literals.is_empty()
            && self.derived_literals.is_empty()
    }
}

/// An effect reduced to unconditional literals plus conditional parts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatEffect {
    /// Fluent literals applied whenever the action is.
    pub literals: Vec<Literal>,
    /// Cost increases applied whenever the action is.
    pub cost: Vec<FunctionExpression>,
    /// Parts guarded by a condition and/or quantified over fresh parameters.
    pub conditional: Vec<FlatConditionalEffect>,
}

/// A `when`/`forall` effect in flat form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatConditionalEffect {
    /// Number of quantified parameters, numbered after the schema's own.
    pub parameters: usize,
    /// Condition evaluated in the source state.
    pub condition: LiteralConjunction,
    pub literals: Vec<Literal>,
    pub cost: Vec<FunctionExpression>,
}

impl FlatEffect {
    /// Flattens an action effect.
    ///
    /// Effects on static or derived predicates and cost increases inside a
    /// `forall` are rejected.
    pub fn flatten(problem: &Problem, effect: &Effect, location: &str) -> Result<Self> {
        let mut flat = FlatEffect::default();
        let mut leaves = EffectLeaves::default();
        collect_effect(
            problem,
            effect,
            0,
            &LiteralConjunction::default(),
            &mut leaves,
            &mut flat.conditional,
            location,
        )?;
        flat.literals = leaves.literals;
        flat.cost = leaves.cost;
        Ok(flat)
    }

    /// Returns true if the effect has no conditional part.
    pub fn is_unconditional(&self) -> bool {
        self.conditional.is_empty()
    }
}

#[derive(Default)]
struct EffectLeaves {
    literals: Vec<Literal>,
    cost: Vec<FunctionExpression>,
}

impl EffectLeaves {
    fn is_empty(&self) -> bool {
        self.literals.is_empty() && self.cost.is_empty()
    }
}

/// Walks `effect`, sending leaves of the current scope to `leaves` and every
/// nested `when`/`forall` scope to `nested`.
fn collect_effect(
    problem: &Problem,
    effect: &Effect,
    parameters: usize,
    condition: &LiteralConjunction,
    leaves: &mut EffectLeaves,
    nested: &mut Vec<FlatConditionalEffect>,
    location: &str,
) -> Result<()> {
    match effect {
        Effect::Literal(literal) => {
            match problem.predicate(literal.atom.predicate).category {
                PredicateCategory::Fluent => leaves.literals.push(literal.clone()),
                PredicateCategory::Static => {
                    return Err(GroundForgeError::unsupported(
                        location,
                        UnsupportedConstruct::StaticEffect,
                    ))
                }
                PredicateCategory::Derived => {
                    return Err(GroundForgeError::unsupported(
                        location,
                        UnsupportedConstruct::DerivedEffect,
                    ))
                }
            }
            Ok(())
        }
        Effect::And(parts) => parts.iter().try_for_each(|part| {
            collect_effect(problem, part, parameters, condition, leaves, nested, location)
        }),
        Effect::IncreaseCost(expression) => {
            if parameters > 0 {
                return Err(GroundForgeError::unsupported(
                    location,
                    UnsupportedConstruct::QuantifiedCost,
                ));
            }
            leaves.cost.push(expression.clone());
            Ok(())
        }
        Effect::When {
            condition: guard,
            effect,
        } => {
            let mut scoped = condition.clone();
            scoped.extend_from(&LiteralConjunction::flatten(problem, guard, location)?);
            collect_scope(problem, effect, parameters, scoped, nested, location)
        }
        Effect::Forall {
            parameters: fresh,
            effect,
        } => collect_scope(
            problem,
            effect,
            parameters + fresh,
            condition.clone(),
            nested,
            location,
        ),
    }
}

fn collect_scope(
    problem: &Problem,
    effect: &Effect,
    parameters: usize,
    condition: LiteralConjunction,
    nested: &mut Vec<FlatConditionalEffect>,
    location: &str,
) -> Result<()> {
    let mut leaves = EffectLeaves::default();
    let position = nested.len();
    collect_effect(problem, effect, parameters, &condition, &mut leaves, nested, location)?;
    if !leaves.is_empty() {
        // Keep the enclosing scope ahead of its own nested scopes.
        nested.insert(
            position,
            FlatConditionalEffect {
                parameters,
                condition,
                literals: leaves.literals,
                cost: leaves.cost,
            },
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use groundforge_core::{Atom, ProblemBuilder, Term};

    struct Fixture {
        problem: Problem,
        road: groundforge_core::PredicateId,
        at: groundforge_core::PredicateId,
        reachable: groundforge_core::PredicateId,
    }

    fn fixture() -> Fixture {
        let mut builder = ProblemBuilder::new("flatten");
        builder.object("a");
        let road = builder.predicate("road", 2, PredicateCategory::Static);
        let at = builder.predicate("at", 1, PredicateCategory::Fluent);
        let reachable = builder.predicate("reachable", 1, PredicateCategory::Derived);
        Fixture {
            problem: builder.build().unwrap(),
            road,
            at,
            reachable,
        }
    }

    fn p(i: usize) -> Term {
        Term::Parameter(i)
    }

    #[test]
    fn test_split_by_category() {
        let f = fixture();
        let condition = Condition::And(vec![
            Condition::atom(Atom::new(f.road, [p(0), p(1)])),
            Condition::And(vec![Condition::atom(Atom::new(f.at, [p(0)]))]),
            Condition::not_atom(Atom::new(f.reachable, [p(1)])),
        ]);

        let flat = LiteralConjunction::flatten(&f.problem, &condition, "test").unwrap();
        assert_eq!(flat.static_literals.len(), 1);
        assert_eq!(flat.fluent_literals.len(), 1);
        assert_eq!(flat.derived_literals.len(), 1);
        assert!(flat.derived_literals[0].negated);
        assert_eq!(flat.dynamic_literals().count(), 2);
        assert_eq!(flat.literals().count(), 3);
    }

    #[test]
    fn test_negation_of_literal_flips_polarity() {
        let f = fixture();
        let condition = Condition::Not(Box::new(Condition::Not(Box::new(Condition::not_atom(
            Atom::new(f.at, [p(0)]),
        )))));

        let flat = LiteralConjunction::flatten(&f.problem, &condition, "test").unwrap();
        assert!(flat.fluent_literals[0].negated);
    }

    #[test]
    fn test_unsupported_conditions() {
        let f = fixture();
        let at = || Condition::atom(Atom::new(f.at, [p(0)]));
        let cases = [
            (Condition::Or(vec![at(), at()]), UnsupportedConstruct::Disjunction),
            (
                Condition::Imply(Box::new(at()), Box::new(at())),
                UnsupportedConstruct::Implication,
            ),
            (
                Condition::Exists {
                    parameters: 1,
                    condition: Box::new(at()),
                },
                UnsupportedConstruct::ExistentialPrecondition,
            ),
            (
                Condition::Forall {
                    parameters: 1,
                    condition: Box::new(at()),
                },
                UnsupportedConstruct::UniversalPrecondition,
            ),
            (
                Condition::Not(Box::new(Condition::And(vec![at()]))),
                UnsupportedConstruct::NegatedCompound,
            ),
        ];

        for (condition, expected) in cases {
            match LiteralConjunction::flatten(&f.problem, &condition, "schema 0 (move)") {
                Err(GroundForgeError::Unsupported {
                    location,
                    construct,
                }) => {
                    assert_eq!(construct, expected);
                    assert_eq!(location, "schema 0 (move)");
                }
                other => panic!("expected {:?}, got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_flatten_effect_scopes() {
        let f = fixture();
        let effect = Effect::And(vec![
            Effect::Literal(Literal::negative(Atom::new(f.at, [p(0)]))),
            Effect::IncreaseCost(FunctionExpression::Number(2.0)),
            Effect::When {
                condition: Condition::atom(Atom::new(f.road, [p(0), p(0)])),
                effect: Box::new(Effect::And(vec![
                    Effect::Literal(Literal::positive(Atom::new(f.at, [p(0)]))),
                    Effect::Forall {
                        parameters: 1,
                        effect: Box::new(Effect::Literal(Literal::positive(Atom::new(
                            f.at,
                            [p(1)],
                        )))),
                    },
                ])),
            },
        ]);

        let flat = FlatEffect::flatten(&f.problem, &effect, "test").unwrap();
        assert_eq!(flat.literals.len(), 1);
        assert_eq!(flat.cost.len(), 1);
        assert_eq!(flat.conditional.len(), 2);

        let when = &flat.conditional[0];
        assert_eq!(when.parameters, 0);
        assert_eq!(when.condition.static_literals.len(), 1);
        assert_eq!(when.literals.len(), 1);

        let forall = &flat.conditional[1];
        assert_eq!(forall.parameters, 1);
        assert_eq!(forall.condition.static_literals.len(), 1);
        assert_eq!(forall.literals[0].atom.terms, vec![p(1)]);
    }

    #[test]
    fn test_unsupported_effects() {
        let f = fixture();
        let cases = [
            (
                Effect::Literal(Literal::positive(Atom::new(f.road, [p(0), p(0)]))),
                UnsupportedConstruct::StaticEffect,
            ),
            (
                Effect::Literal(Literal::positive(Atom::new(f.reachable, [p(0)]))),
                UnsupportedConstruct::DerivedEffect,
            ),
            (
                Effect::Forall {
                    parameters: 1,
                    effect: Box::new(Effect::IncreaseCost(FunctionExpression::Number(1.0))),
                },
                UnsupportedConstruct::QuantifiedCost,
            ),
        ];

        for (effect, expected) in cases {
            let err = FlatEffect::flatten(&f.problem, &effect, "test").unwrap_err();
            assert!(
                matches!(err, GroundForgeError::Unsupported { construct, .. } if construct == expected),
                "expected {:?}, got {:?}",
                expected,
                err
            );
        }
    }
}
