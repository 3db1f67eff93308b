//! Lifted action grounding.
//!
//! For each schema, [`ActionGrounder`] keeps the flattened precondition and
//! effect, a [`BindingGenerator`] over the static consistency graph, and a
//! cache from bindings to ground-action handles. Grounding a schema in a
//! state enumerates candidate bindings, instantiates each (or reuses the
//! cached instance) and keeps those whose precondition holds in the state.
//!
//! The cache only records the outcome of the state-independent part of
//! instantiation: a binding that violates a static literal maps to `None`
//! forever, every other binding maps to its handle and is re-tested against
//! each state.

use std::collections::HashMap;
use std::sync::Arc;

use groundforge_core::{
    ActionSchema, FunctionExpression, ObjectId, ObjectTuple, Problem, Result, SchemaId,
};
use tracing::{debug, trace};

use crate::action::{GroundAction, GroundActionIndex, GroundActionTable, GroundConditionalEffect};
use crate::assignment_set::AssignmentSet;
use crate::binding::BindingGenerator;
use crate::condition::{FlatEffect, LiteralConjunction};
use crate::context::GroundingContext;
use crate::strips::{GroundingMode, StateAtoms, StripsEffect};

#[derive(Debug)]
struct SchemaGrounding {
    precondition: LiteralConjunction,
    effect: FlatEffect,
    bindings: BindingGenerator,
    instances: HashMap<ObjectTuple, Option<GroundActionIndex>>,
}

/// Grounds action schemas on demand, one state at a time.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use groundforge_core::{ActionSchema, Atom, Bitset, Condition, Effect, Literal, PredicateCategory, ProblemBuilder, SchemaId, Term};
/// use groundforge_grounding::{ActionGrounder, StateAtoms};
///
/// let mut builder = ProblemBuilder::new("move");
/// let r1 = builder.object("r1");
/// builder.object("r2");
/// let at = builder.predicate("at", 1, PredicateCategory::Fluent);
/// builder.schema(ActionSchema::new(
///     "move",
///     1,
///     Condition::atom(Atom::new(at, [Term::Parameter(0)])),
///     Effect::Literal(Literal::negative(Atom::new(at, [Term::Parameter(0)]))),
/// ));
///
/// let mut grounder = ActionGrounder::new(Arc::new(builder.build().unwrap())).unwrap();
/// let at_r1 = grounder.context_mut().atoms_mut().get_or_create(
///     groundforge_core::GroundAtom::new(at, [r1]),
/// );
/// let fluent: Bitset = [at_r1].into_iter().collect();
/// let derived = Bitset::new();
///
/// let actions = grounder
///     .ground_and_enumerate(SchemaId(0), StateAtoms::new(&fluent, &derived))
///     .unwrap();
/// assert_eq!(actions.len(), 1);
/// assert_eq!(grounder.ground_action(actions[0]).display(grounder.problem()), "move(r1)");
/// ```
#[derive(Debug)]
pub struct ActionGrounder {
    context: GroundingContext,
    schemas: Vec<SchemaGrounding>,
    actions: GroundActionTable,
}

impl ActionGrounder {
    /// Prepares every schema of `problem` for grounding.
    ///
    /// # Errors
    ///
    /// Fails if a precondition or effect uses an unsupported construct or
    /// the initial state lists a negated atom.
    pub fn new(problem: Arc<Problem>) -> Result<Self> {
        let context = GroundingContext::new(problem)?;
        let problem = Arc::clone(context.problem_arc());

        let schemas = problem
            .schemas
            .iter()
            .enumerate()
            .map(|(i, schema)| prepare_schema(&context, i, schema))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            event = "action_grounder_ready",
            problem = %problem.name,
            schemas = schemas.len(),
            statically_dead = schemas
                .iter()
                .filter(|s| !s.bindings.is_statically_satisfiable())
                .count(),
        );

        Ok(Self {
            context,
            schemas,
            actions: GroundActionTable::new(),
        })
    }

    #[inline]
    pub fn problem(&self) -> &Problem {
        self.context.problem()
    }

    #[inline]
    pub fn context(&self) -> &GroundingContext {
        &self.context
    }

    #[inline]
    pub fn context_mut(&mut self) -> &mut GroundingContext {
        &mut self.context
    }

    /// Every ground action instantiated so far.
    #[inline]
    pub fn actions(&self) -> &GroundActionTable {
        &self.actions
    }

    #[inline]
    pub fn ground_action(&self, index: GroundActionIndex) -> &GroundAction {
        self.actions.get(index)
    }

    /// Returns the handles of all ground actions of `schema` applicable in `state`.
    ///
    /// Grounding the same binding twice returns the same handle.
    ///
    /// # Errors
    ///
    /// Fails if a cost expression references a numeric fluent without value.
    pub fn ground_and_enumerate(
        &mut self,
        schema: SchemaId,
        state: StateAtoms<'_>,
    ) -> Result<Vec<GroundActionIndex>> {
        let assignments = self.context.state_assignments(state);
        let mut applicable = Vec::new();
        self.ground_schema(schema, state, &assignments, GroundingMode::Exact, &mut applicable)?;
        Ok(applicable)
    }

    /// Grounds every schema in `state`, sharing one assignment set.
    pub fn ground_all(
        &mut self,
        state: StateAtoms<'_>,
        mode: GroundingMode,
    ) -> Result<Vec<GroundActionIndex>> {
        let assignments = self.context.state_assignments(state);
        let mut applicable = Vec::new();
        for schema in 0..self.schemas.len() {
            self.ground_schema(SchemaId(schema), state, &assignments, mode, &mut applicable)?;
        }
        trace!(
            event = "actions_grounded",
            mode = ?mode,
            applicable = applicable.len(),
            known = self.actions.len(),
        );
        Ok(applicable)
    }

    fn ground_schema(
        &mut self,
        schema: SchemaId,
        state: StateAtoms<'_>,
        assignments: &AssignmentSet,
        mode: GroundingMode,
        applicable: &mut Vec<GroundActionIndex>,
    ) -> Result<()> {
        let bindings =
            self.schemas[schema.index()]
                .bindings
                .bindings(&self.context, state, assignments, mode);
        for binding in bindings {
            if let Some(index) = self.instantiate(schema, binding)? {
                if self.actions.get(index).precondition().is_applicable_in(state, mode) {
                    applicable.push(index);
                }
            }
        }
        Ok(())
    }

    /// Instantiates `schema` with `binding`.
    ///
    /// Returns `None` if a static literal of the precondition is violated.
    pub fn instantiate(
        &mut self,
        schema: SchemaId,
        binding: ObjectTuple,
    ) -> Result<Option<GroundActionIndex>> {
        let Self {
            context,
            schemas,
            actions,
        } = self;
        let grounding = &mut schemas[schema.index()];
        if let Some(&cached) = grounding.instances.get(&binding) {
            return Ok(cached);
        }

        let instance = match build_ground_action(context, schema, grounding, &binding)? {
            Some(action) => {
                let index = actions.get_or_insert(action);
                trace!(
                    event = "action_instantiated",
                    action = %actions.get(index).display(context.problem()),
                    handle = index.index(),
                );
                Some(index)
            }
            None => None,
        };
        grounding.instances.insert(binding, instance);
        Ok(instance)
    }
}

fn prepare_schema(
    context: &GroundingContext,
    index: usize,
    schema: &ActionSchema,
) -> Result<SchemaGrounding> {
    let problem = context.problem();
    let location = format!("schema {} ({})", index, schema.name);
    let precondition = LiteralConjunction::flatten(problem, &schema.precondition, &location)?;
    let effect = FlatEffect::flatten(problem, &schema.effect, &location)?;
    let bindings = BindingGenerator::new(context, schema.arity, &precondition);
    Ok(SchemaGrounding {
        precondition,
        effect,
        bindings,
        instances: HashMap::new(),
    })
}

fn build_ground_action(
    context: &mut GroundingContext,
    schema: SchemaId,
    grounding: &SchemaGrounding,
    binding: &ObjectTuple,
) -> Result<Option<GroundAction>> {
    let Some(precondition) = context.ground_conjunction(&grounding.precondition, binding) else {
        return Ok(None);
    };
    let problem = Arc::clone(context.problem_arc());

    let mut effect = StripsEffect::default();
    for literal in &grounding.effect.literals {
        let index = context.atoms_mut().ground(&literal.atom, binding);
        if literal.negated {
            effect.negative.insert(index);
        } else {
            effect.positive.insert(index);
        }
    }
    let mut cost = if problem.uses_action_costs {
        total_cost(&problem, &grounding.effect.cost, binding)?
    } else {
        1.0
    };

    let mut conditional_effects = Vec::new();
    for conditional in &grounding.effect.conditional {
        for extended in extensions(binding, conditional.parameters, problem.num_objects()) {
            let Some(guard) = context.ground_conjunction(&conditional.condition, &extended) else {
                continue;
            };
            let mut part = StripsEffect::default();
            for literal in &conditional.literals {
                let index = context.atoms_mut().ground(&literal.atom, &extended);
                if literal.negated {
                    part.negative.insert(index);
                } else {
                    part.positive.insert(index);
                }
            }
            let part_cost = if problem.uses_action_costs {
                total_cost(&problem, &conditional.cost, &extended)?
            } else {
                0.0
            };

            if guard.is_static_only() {
                effect.union_with(&part);
                cost += part_cost;
            } else {
                conditional_effects.push(GroundConditionalEffect {
                    precondition: guard,
                    effect: part,
                    cost: part_cost,
                });
            }
        }
    }

    Ok(Some(GroundAction::new(
        schema,
        binding.clone(),
        precondition,
        effect,
        conditional_effects,
        cost,
    )))
}

fn total_cost(
    problem: &Problem,
    expressions: &[FunctionExpression],
    binding: &[ObjectId],
) -> Result<f64> {
    expressions
        .iter()
        .map(|expression| problem.evaluate(expression, binding))
        .sum()
}

/// Every extension of `binding` by `extra` further objects, in lexicographic order.
fn extensions(binding: &[ObjectId], extra: usize, num_objects: usize) -> Vec<ObjectTuple> {
    if extra == 0 {
        return vec![ObjectTuple::from_slice(binding)];
    }
    if num_objects == 0 {
        return Vec::new();
    }

    let mut result = Vec::new();
    let mut current: ObjectTuple = binding.iter().copied().collect();
    current.extend(std::iter::repeat(ObjectId(0)).take(extra));
    loop {
        result.push(current.clone());
        let mut position = current.len();
        loop {
            if position == binding.len() {
                return result;
            }
            position -= 1;
            current[position].0 += 1;
            if current[position].0 < num_objects {
                break;
            }
            current[position] = ObjectId(0);
        }
    }
}
