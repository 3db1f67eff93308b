//! GroundForge - Lifted grounding and successor generation for STRIPS planning
//!
//! Build a [`Problem`], pick a generator and explore:
//!
//! ```rust
//! use std::sync::Arc;
//! use groundforge::prelude::*;
//!
//! let mut builder = ProblemBuilder::new("switch");
//! let lamp = builder.object("lamp");
//! let on = builder.predicate("on", 1, PredicateCategory::Fluent);
//! builder.schema(ActionSchema::new(
//!     "switch-on",
//!     1,
//!     Condition::not_atom(Atom::new(on, [Term::Parameter(0)])),
//!     Effect::Literal(Literal::positive(Atom::new(on, [Term::Parameter(0)]))),
//! ));
//! builder.goal_atom(on, [lamp]);
//! let problem = Arc::new(builder.build().unwrap());
//!
//! let config = ExplorationConfig::default().with_generator(GeneratorKind::Grounded);
//! let mut repository = StateRepository::from_problem(problem, config.generator).unwrap();
//! let result = explore(&mut repository, &config).unwrap();
//!
//! assert!(result.is_complete());
//! assert_eq!(result.num_states, 2);
//! assert_eq!(result.goal_states.len(), 1);
//! ```

// Formalism and errors
pub use groundforge_core::{
    ActionSchema, Atom, AtomRepository, Axiom, Bitset, Condition, Effect, FunctionExpression,
    FunctionTerm, GroundAtom, GroundForgeError, GroundLiteral, Literal, ObjectId, PredicateCategory,
    PredicateId, Problem, ProblemBuilder, Result, SchemaId, Term, UnsupportedConstruct,
};

// Configuration
pub use groundforge_config::{
    ConfigError, ExplorationConfig, GeneratorKind, TerminationConfig, ThreadCount,
};

// Grounding
pub use groundforge_grounding::{
    create_generator, ApplicableActionGenerator, GroundAction, GroundActionIndex,
    GroundedGenerator, LiftedGenerator, StateAtoms,
};

// States and exploration
pub use groundforge_state::{
    explore, explore_batch, explore_problem, ExplorationResult, ExplorationStatus, State,
    StateIndex, StateRepository, Transition,
};

/// Lower-level building blocks, for callers that drive grounding themselves.
pub mod grounding {
    pub use groundforge_grounding::*;
}

#[cfg(feature = "console")]
pub mod console;

pub mod prelude {
    pub use super::{
        ActionSchema, Atom, Condition, Effect, GroundAtom, Literal, PredicateCategory, Problem,
        ProblemBuilder, Term,
    };
    pub use super::{create_generator, ApplicableActionGenerator, GroundActionIndex};
    pub use super::{explore, explore_batch, ExplorationConfig, GeneratorKind, StateRepository};
}
