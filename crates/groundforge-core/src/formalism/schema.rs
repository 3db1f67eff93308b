//! Action schemas and axioms.

use super::{Atom, Condition, Effect};

/// A lifted action with `arity` parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSchema {
    pub name: String,
    pub arity: usize,
    pub precondition: Condition,
    pub effect: Effect,
}

impl ActionSchema {
    pub fn new(name: impl Into<String>, arity: usize, precondition: Condition, effect: Effect) -> Self {
        Self {
            name: name.into(),
            arity,
            precondition,
            effect,
        }
    }
}

/// A rule deriving `head` whenever `body` holds.
///
/// The head must be over a derived predicate and may only mention the
/// axiom's own parameters (or objects).
#[derive(Debug, Clone, PartialEq)]
pub struct Axiom {
    pub arity: usize,
    pub body: Condition,
    pub head: Atom,
}

impl Axiom {
    pub fn new(arity: usize, body: Condition, head: Atom) -> Self {
        Self { arity, body, head }
    }
}
