//! Precondition and axiom-body syntax.

use super::{Atom, Literal};

/// A condition as produced by the front-end.
///
/// Grounding only accepts conjunctions of literals; the remaining node kinds
/// exist so that an unnormalized input is rejected with a precise error
/// instead of being misread.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A single (possibly negated) atom.
    Literal(Literal),
    /// Conjunction; the empty conjunction is true.
    And(Vec<Condition>),
    /// Disjunction.
    Or(Vec<Condition>),
    /// Negation.
    Not(Box<Condition>),
    /// Implication `lhs -> rhs`.
    Imply(Box<Condition>, Box<Condition>),
    /// Existential quantification over `parameters` fresh parameters.
    Exists {
        parameters: usize,
        condition: Box<Condition>,
    },
    /// Universal quantification over `parameters` fresh parameters.
    Forall {
        parameters: usize,
        condition: Box<Condition>,
    },
}

impl Condition {
    /// The trivially true condition.
    pub fn truth() -> Self {
        Condition::And(Vec::new())
    }

    /// Conjunction of the given literals.
    pub fn conjunction(literals: impl IntoIterator<Item = Literal>) -> Self {
        Condition::And(literals.into_iter().map(Condition::Literal).collect())
    }

    pub fn atom(atom: Atom) -> Self {
        Condition::Literal(Literal::positive(atom))
    }

    pub fn not_atom(atom: Atom) -> Self {
        Condition::Literal(Literal::negative(atom))
    }
}

impl Default for Condition {
    fn default() -> Self {
        Self::truth()
    }
}
