//! Error types for GroundForge

use std::fmt;

use thiserror::Error;

/// Construct kinds the grounder refuses to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedConstruct {
    /// Disjunctive precondition.
    Disjunction,
    /// Implication inside a precondition.
    Implication,
    /// Existentially quantified precondition.
    ExistentialPrecondition,
    /// Universally quantified precondition.
    UniversalPrecondition,
    /// Negation of anything other than a single atom.
    NegatedCompound,
    /// Effect literal over a static predicate.
    StaticEffect,
    /// Effect literal over a derived predicate.
    DerivedEffect,
    /// Axiom head over a non-derived predicate.
    NonDerivedAxiomHead,
    /// Cost increase nested inside a universally quantified effect.
    QuantifiedCost,
}

impl fmt::Display for UnsupportedConstruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnsupportedConstruct::Disjunction => "disjunctive condition",
            UnsupportedConstruct::Implication => "implication",
            UnsupportedConstruct::ExistentialPrecondition => "existential precondition",
            UnsupportedConstruct::UniversalPrecondition => "universal precondition",
            UnsupportedConstruct::NegatedCompound => "negation of a compound condition",
            UnsupportedConstruct::StaticEffect => "effect on a static predicate",
            UnsupportedConstruct::DerivedEffect => "effect on a derived predicate",
            UnsupportedConstruct::NonDerivedAxiomHead => "axiom head over a non-derived predicate",
            UnsupportedConstruct::QuantifiedCost => "cost increase inside a forall effect",
        };
        f.write_str(name)
    }
}

/// Main error type for GroundForge operations
#[derive(Debug, Error)]
pub enum GroundForgeError {
    /// A precondition or effect shape that grounding cannot represent.
    #[error("Unsupported construct in {location}: {construct}")]
    Unsupported {
        location: String,
        construct: UnsupportedConstruct,
    },

    /// The initial state listed a negated atom.
    #[error("Negative literal in initial state: not {atom}")]
    NegativeInitialLiteral { atom: String },

    /// A cost expression referenced a ground function without a value.
    #[error("Undefined numeric value for ground function {function}")]
    UndefinedFunction { function: String },

    /// Derived predicates depend negatively on themselves.
    #[error("Axioms are not stratifiable: derived predicate {predicate} depends negatively on itself")]
    UnstratifiableAxioms { predicate: String },

    /// A match tree saw an atom it was not built with.
    #[error("Match tree queried with atom index {atom}, but it was built over {known} atoms")]
    StaleMatchTree { atom: usize, known: usize },

    /// The problem handed over by the front-end is inconsistent.
    #[error("Malformed problem: {0}")]
    Malformed(String),
}

impl GroundForgeError {
    /// Shorthand for an [`GroundForgeError::Unsupported`] error.
    pub fn unsupported(location: impl Into<String>, construct: UnsupportedConstruct) -> Self {
        GroundForgeError::Unsupported {
            location: location.into(),
            construct,
        }
    }
}

/// Result type alias for GroundForge operations
pub type Result<T> = std::result::Result<T, GroundForgeError>;
