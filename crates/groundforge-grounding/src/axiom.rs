//! Axiom stratification, grounding and fixpoint evaluation.
//!
//! Axioms are grouped into strata so that a derived predicate only depends
//! negatively on predicates of strictly lower strata. Evaluating strata in
//! order and saturating each one is then the unique stratified model.

use std::collections::HashMap;
use std::fmt;

use groundforge_core::{
    Atom, AxiomId, GroundForgeError, ObjectTuple, PredicateCategory, Problem, Result,
    UnsupportedConstruct,
};
use indexmap::IndexSet;
use tracing::{debug, trace};

use crate::binding::BindingGenerator;
use crate::condition::LiteralConjunction;
use crate::context::GroundingContext;
use crate::strips::{GroundingMode, StateBuilder, StripsPrecondition};

/// Stable handle of a ground axiom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroundAxiomIndex(pub usize);

impl GroundAxiomIndex {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for GroundAxiomIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An axiom instantiated with objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroundAxiom {
    pub axiom: AxiomId,
    pub binding: ObjectTuple,
    pub precondition: StripsPrecondition,
    /// Index of the derived head atom.
    pub head: usize,
}

/// Computes the strata of `heads[i] :- bodies[i]`.
///
/// Returns the axiom ids grouped by stratum, lowest first, without empty
/// strata.
///
/// # Errors
///
/// Returns [`GroundForgeError::UnstratifiableAxioms`] if a derived predicate
/// depends negatively on itself, directly or through other axioms.
pub fn stratify(
    problem: &Problem,
    heads: &[Atom],
    bodies: &[LiteralConjunction],
) -> Result<Vec<Vec<AxiomId>>> {
    let num_derived = problem
        .predicates
        .iter()
        .filter(|p| p.category == PredicateCategory::Derived)
        .count();
    let mut level = vec![0usize; problem.predicates.len()];

    loop {
        let mut changed = false;
        for (head, body) in heads.iter().zip(bodies) {
            let head = head.predicate.index();
            for literal in &body.derived_literals {
                let required = level[literal.atom.predicate.index()] + usize::from(literal.negated);
                if required > level[head] {
                    if required >= num_derived {
                        return Err(GroundForgeError::UnstratifiableAxioms {
                            predicate: problem.predicates[head].name.clone(),
                        });
                    }
                    level[head] = required;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    let mut strata: Vec<Vec<AxiomId>> = Vec::new();
    for (i, head) in heads.iter().enumerate() {
        let stratum = level[head.predicate.index()];
        if strata.len() <= stratum {
            strata.resize_with(stratum + 1, Vec::new);
        }
        strata[stratum].push(AxiomId(i));
    }
    strata.retain(|s| !s.is_empty());
    Ok(strata)
}

#[derive(Debug)]
struct AxiomGrounding {
    head: Atom,
    body: LiteralConjunction,
    bindings: BindingGenerator,
    instances: HashMap<ObjectTuple, Option<GroundAxiomIndex>>,
}

/// Grounds axioms lazily and extends states with their derived atoms.
#[derive(Debug)]
pub struct AxiomEvaluator {
    axioms: Vec<AxiomGrounding>,
    strata: Vec<Vec<AxiomId>>,
    ground_axioms: IndexSet<GroundAxiom>,
}

impl AxiomEvaluator {
    /// Flattens and stratifies the axioms of the context's problem.
    ///
    /// # Errors
    ///
    /// Fails if a body uses an unsupported construct, a head is not over a
    /// derived predicate, or the axioms are not stratifiable.
    pub fn new(context: &GroundingContext) -> Result<Self> {
        let problem = context.problem();
        let mut axioms = Vec::with_capacity(problem.axioms.len());
        for (i, axiom) in problem.axioms.iter().enumerate() {
            let location = format!("axiom {}", i);
            if problem.predicate(axiom.head.predicate).category != PredicateCategory::Derived {
                return Err(GroundForgeError::unsupported(
                    location,
                    UnsupportedConstruct::NonDerivedAxiomHead,
                ));
            }
            let body = LiteralConjunction::flatten(problem, &axiom.body, &location)?;
            let bindings = BindingGenerator::new(context, axiom.arity, &body);
            axioms.push(AxiomGrounding {
                head: axiom.head.clone(),
                body,
                bindings,
                instances: HashMap::new(),
            });
        }

        let heads: Vec<Atom> = axioms.iter().map(|a| a.head.clone()).collect();
        let bodies: Vec<LiteralConjunction> = axioms.iter().map(|a| a.body.clone()).collect();
        let strata = stratify(problem, &heads, &bodies)?;

        debug!(
            event = "axioms_stratified",
            axioms = axioms.len(),
            strata = strata.len(),
        );

        Ok(Self {
            axioms,
            strata,
            ground_axioms: IndexSet::new(),
        })
    }

    /// Axiom ids per stratum, lowest first.
    pub fn strata(&self) -> &[Vec<AxiomId>] {
        &self.strata
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.axioms.is_empty()
    }

    /// Returns the ground axiom behind `index`.
    #[inline]
    pub fn ground_axiom(&self, index: GroundAxiomIndex) -> &GroundAxiom {
        &self.ground_axioms[index.0]
    }

    /// Every ground axiom instantiated so far.
    pub fn ground_axioms(&self) -> impl Iterator<Item = (GroundAxiomIndex, &GroundAxiom)> + '_ {
        self.ground_axioms
            .iter()
            .enumerate()
            .map(|(i, axiom)| (GroundAxiomIndex(i), axiom))
    }

    /// Adds every derived atom of the stratified model of `state`.
    ///
    /// The derived part of `state` is expected to be empty on entry.
    pub fn evaluate(&mut self, context: &mut GroundingContext, state: &mut StateBuilder) {
        for stratum in 0..self.strata.len() {
            let axioms = self.strata[stratum].clone();
            self.saturate(context, &axioms, state, GroundingMode::Exact);
        }
    }

    /// Adds every derived atom reachable when negative literals are ignored.
    pub fn evaluate_relaxed(&mut self, context: &mut GroundingContext, state: &mut StateBuilder) {
        let axioms: Vec<AxiomId> = (0..self.axioms.len()).map(AxiomId).collect();
        self.saturate(context, &axioms, state, GroundingMode::DeleteRelaxed);
    }

    fn saturate(
        &mut self,
        context: &mut GroundingContext,
        axioms: &[AxiomId],
        state: &mut StateBuilder,
        mode: GroundingMode,
    ) {
        let mut rounds = 0usize;
        loop {
            rounds += 1;
            let assignments = context.state_assignments(state.atoms());
            let mut heads = Vec::new();
            for &axiom in axioms {
                let bindings =
                    self.axioms[axiom.index()]
                        .bindings
                        .bindings(context, state.atoms(), &assignments, mode);
                for binding in bindings {
                    let Some(index) = self.instantiate(context, axiom, binding) else {
                        continue;
                    };
                    let ground = &self.ground_axioms[index.0];
                    if !state.derived.contains(ground.head)
                        && ground.precondition.is_applicable_in(state.atoms(), mode)
                    {
                        heads.push(ground.head);
                    }
                }
            }

            let mut changed = false;
            for head in heads {
                changed |= state.derived.insert(head);
            }
            if !changed {
                break;
            }
        }
        trace!(
            event = "axioms_saturated",
            mode = ?mode,
            axioms = axioms.len(),
            rounds,
            derived = state.derived.count(),
        );
    }

    /// Instantiates `axiom` with `binding`.
    ///
    /// Returns `None` if a static literal of the body is violated.
    pub fn instantiate(
        &mut self,
        context: &mut GroundingContext,
        axiom: AxiomId,
        binding: ObjectTuple,
    ) -> Option<GroundAxiomIndex> {
        let grounding = &mut self.axioms[axiom.index()];
        if let Some(&cached) = grounding.instances.get(&binding) {
            return cached;
        }

        let instance = context
            .ground_conjunction(&grounding.body, &binding)
            .map(|precondition| {
                let head = context.atoms_mut().ground(&grounding.head, &binding);
                let ground = GroundAxiom {
                    axiom,
                    binding: binding.clone(),
                    precondition,
                    head,
                };
                GroundAxiomIndex(self.ground_axioms.insert_full(ground).0)
            });
        grounding.instances.insert(binding, instance);
        instance
    }
}

#[cfg(test)]
mod tests;
