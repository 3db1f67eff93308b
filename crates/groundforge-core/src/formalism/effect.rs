//! Effect syntax.

use super::{Condition, FunctionExpression, Literal};

/// An action effect as produced by the front-end.
///
/// Parameters introduced by [`Effect::Forall`] are numbered after the
/// parameters of the enclosing scope: inside a schema of arity `k`, the first
/// `forall` parameter is `Term::Parameter(k)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Add (positive) or delete (negative) an atom.
    Literal(Literal),
    /// All of the nested effects.
    And(Vec<Effect>),
    /// Apply `effect` only if `condition` holds in the source state.
    When {
        condition: Condition,
        effect: Box<Effect>,
    },
    /// Apply `effect` for every binding of `parameters` fresh parameters.
    Forall {
        parameters: usize,
        effect: Box<Effect>,
    },
    /// Increase the plan cost by the value of the expression.
    IncreaseCost(FunctionExpression),
}

impl Effect {
    /// The empty effect.
    pub fn none() -> Self {
        Effect::And(Vec::new())
    }

    /// Conjunction of the given literals.
    pub fn literals(literals: impl IntoIterator<Item = Literal>) -> Self {
        Effect::And(literals.into_iter().map(Effect::Literal).collect())
    }
}

impl Default for Effect {
    fn default() -> Self {
        Self::none()
    }
}
