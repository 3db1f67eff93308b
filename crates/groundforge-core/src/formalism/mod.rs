//! Lifted formalism handed over by the front-end.
//!
//! Everything here is identified by dense, zero-based ids assigned by the
//! parser. The grounding core only reads these structures.

mod condition;
mod effect;
mod function;
mod schema;

use std::fmt;

use smallvec::SmallVec;

pub use condition::Condition;
pub use effect::Effect;
pub use function::{BinaryOperator, FunctionExpression, FunctionSkeleton, FunctionTerm, MultiOperator};
pub use schema::{ActionSchema, Axiom};

macro_rules! dense_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);

        impl $name {
            /// Returns the raw index.
            #[inline]
            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

dense_id!(
    /// Identifier of a problem object.
    ObjectId
);
dense_id!(
    /// Identifier of a predicate.
    PredicateId
);
dense_id!(
    /// Identifier of a numeric function skeleton.
    FunctionId
);
dense_id!(
    /// Identifier of an action schema.
    SchemaId
);
dense_id!(
    /// Identifier of an axiom.
    AxiomId
);

/// Inline storage for object tuples; most predicates have arity <= 4.
pub type ObjectTuple = SmallVec<[ObjectId; 4]>;

/// How the truth value of a predicate's atoms may evolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateCategory {
    /// Never changes after the initial state.
    Static,
    /// Changed by action effects.
    Fluent,
    /// Computed from axioms.
    Derived,
}

impl PredicateCategory {
    /// All categories, in index order.
    pub const ALL: [PredicateCategory; 3] = [
        PredicateCategory::Static,
        PredicateCategory::Fluent,
        PredicateCategory::Derived,
    ];

    /// Dense position of the category, used to index per-category tables.
    #[inline]
    pub const fn slot(self) -> usize {
        match self {
            PredicateCategory::Static => 0,
            PredicateCategory::Fluent => 1,
            PredicateCategory::Derived => 2,
        }
    }
}

/// A problem object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    pub name: String,
}

/// A predicate symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub name: String,
    pub arity: usize,
    pub category: PredicateCategory,
}

/// An argument of a lifted atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Term {
    /// A fixed object.
    Object(ObjectId),
    /// The parameter at the given position of the enclosing schema or axiom.
    Parameter(usize),
}

impl Term {
    /// Resolves the term under a binding of parameters to objects.
    #[inline]
    pub fn ground(self, binding: &[ObjectId]) -> ObjectId {
        match self {
            Term::Object(object) => object,
            Term::Parameter(p) => binding[p],
        }
    }
}

/// A predicate applied to terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
    pub predicate: PredicateId,
    pub terms: Vec<Term>,
}

impl Atom {
    pub fn new(predicate: PredicateId, terms: impl IntoIterator<Item = Term>) -> Self {
        Self {
            predicate,
            terms: terms.into_iter().collect(),
        }
    }

    /// Returns true if no term is a parameter.
    pub fn is_ground(&self) -> bool {
        self.terms.iter().all(|t| matches!(t, Term::Object(_)))
    }

    /// Iterates the parameter positions mentioned by this atom, possibly with repeats.
    pub fn parameters(&self) -> impl Iterator<Item = usize> + '_ {
        self.terms.iter().filter_map(|t| match t {
            Term::Parameter(p) => Some(*p),
            Term::Object(_) => None,
        })
    }
}

/// A possibly negated atom.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    pub negated: bool,
    pub atom: Atom,
}

impl Literal {
    pub fn positive(atom: Atom) -> Self {
        Self {
            negated: false,
            atom,
        }
    }

    pub fn negative(atom: Atom) -> Self {
        Self { negated: true, atom }
    }
}

#[cfg(test)]
mod tests;
