//! Shared test fixtures for GroundForge crates.
//!
//! Every fixture builds a small, validated [`Problem`]:
//!
//! - [`movement`] - one schema that deletes the atom it requires
//! - [`gripper`] - the classic two-room gripper domain
//! - [`reachability`] - stratified axioms over a blocked corridor
//! - [`lights`] - conditional `forall`/`when` effects with action costs
//! - [`routes`] - a ternary static predicate that pairwise checks cannot pin down
//! - [`detour`] - negative, repeated-parameter, constant and derived preconditions
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! groundforge-test = { workspace = true }
//! ```
//!
//! Then build the fixtures you need:
//!
//! ```ignore
//! use groundforge_test::{gripper, predicate};
//!
//! let problem = gripper::gripper(4);
//! let at_robby = predicate(&problem, "at-robby");
//! ```

pub mod detour;
pub mod gripper;
pub mod lights;
pub mod movement;
pub mod reachability;
pub mod routes;

use groundforge_core::{ObjectId, PredicateId, Problem, SchemaId};

pub use detour::detour;
pub use gripper::gripper;
pub use lights::lights;
pub use movement::single_move;
pub use reachability::corridor;
pub use routes::routes;

/// Looks up a predicate by name.
///
/// # Panics
///
/// Panics if the problem has no such predicate.
pub fn predicate(problem: &Problem, name: &str) -> PredicateId {
    problem
        .predicates
        .iter()
        .position(|p| p.name == name)
        .map(PredicateId)
        .unwrap_or_else(|| panic!("no predicate named {}", name))
}

/// Looks up an object by name.
///
/// # Panics
///
/// Panics if the problem has no such object.
pub fn object(problem: &Problem, name: &str) -> ObjectId {
    problem
        .objects
        .iter()
        .position(|o| o.name == name)
        .map(ObjectId)
        .unwrap_or_else(|| panic!("no object named {}", name))
}

/// Looks up a schema by name.
///
/// # Panics
///
/// Panics if the problem has no such schema.
pub fn schema(problem: &Problem, name: &str) -> SchemaId {
    problem
        .schemas
        .iter()
        .position(|s| s.name == name)
        .map(SchemaId)
        .unwrap_or_else(|| panic!("no schema named {}", name))
}
