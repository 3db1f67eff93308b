//! GroundForge Core - Formalism types for lifted planning
//!
//! This crate provides the data the grounding engine consumes and produces:
//! - The lifted formalism (predicates, schemas, axioms, conditions, effects)
//! - Problems and their validation
//! - Ground atoms with dense per-category indices
//! - The `Bitset` used for preconditions, effects and states
//! - The error taxonomy shared by all GroundForge crates

pub mod atoms;
pub mod bitset;
pub mod error;
pub mod formalism;
pub mod problem;

pub use atoms::{AtomRepository, GroundAtom, GroundFunction, GroundLiteral};
pub use bitset::Bitset;
pub use error::{GroundForgeError, Result, UnsupportedConstruct};
pub use formalism::{
    ActionSchema, Atom, Axiom, AxiomId, BinaryOperator, Condition, Effect, FunctionExpression,
    FunctionId, FunctionSkeleton, FunctionTerm, Literal, MultiOperator, Object, ObjectId,
    ObjectTuple, Predicate, PredicateCategory, PredicateId, SchemaId, Term,
};
pub use problem::{Problem, ProblemBuilder};
