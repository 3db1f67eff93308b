//! GroundForge Grounding - From lifted schemas to applicable ground actions
//!
//! This crate turns the lifted formalism of `groundforge-core` into ground
//! actions and derived atoms, one state at a time or all at once:
//! - Assignment sets and consistency graphs prune candidate bindings
//! - Transversal clique enumeration yields the remaining bindings
//! - A content-addressed table hands out stable ground-action handles
//! - Stratified axiom evaluation computes derived atoms
//! - Delete-relaxed reachability and match trees back the grounded generator
//! - [`ApplicableActionGenerator`] is the seam used by the state repository

pub mod action;
pub mod assignment_set;
pub mod axiom;
pub mod binding;
pub mod clique;
pub mod condition;
pub mod consistency_graph;
pub mod context;
pub mod generator;
pub mod grounder;
pub mod match_tree;
pub mod relaxed;
pub mod strips;

pub use action::{GroundAction, GroundActionIndex, GroundActionTable, GroundConditionalEffect};
pub use assignment_set::AssignmentSet;
pub use axiom::{stratify, AxiomEvaluator, GroundAxiom, GroundAxiomIndex};
pub use binding::BindingGenerator;
pub use clique::{enumerate_transversal_cliques, for_each_transversal_clique, Adjacency};
pub use condition::{FlatConditionalEffect, FlatEffect, LiteralConjunction};
pub use consistency_graph::{DynamicConsistencyGraph, StaticConsistencyGraph, Vertex};
pub use context::GroundingContext;
pub use generator::{
    create_generator, ApplicableActionGenerator, GroundedGenerator, LiftedGenerator,
};
pub use grounder::ActionGrounder;
pub use match_tree::MatchTree;
pub use relaxed::{explore_delete_relaxation, RelaxedReachability};
pub use strips::{GroundingMode, StateAtoms, StateBuilder, StripsEffect, StripsPrecondition};
