//! Candidate bindings for a lifted conjunction in a state.

use groundforge_core::{GroundAtom, Literal, ObjectTuple};

use crate::assignment_set::AssignmentSet;
use crate::condition::LiteralConjunction;
use crate::consistency_graph::{literal_consistent, DynamicConsistencyGraph, StaticConsistencyGraph};
use crate::context::GroundingContext;
use crate::strips::{GroundingMode, StateAtoms};

/// Enumerates parameter bindings that may satisfy a conjunction.
///
/// Bindings are a superset of the satisfying ones: literals of arity above
/// two and negative literals that are not fully fixed are only checked once
/// the binding is instantiated.
#[derive(Debug, Clone)]
pub struct BindingGenerator {
    arity: usize,
    /// False if some parameter-free static literal is violated.
    statically_satisfiable: bool,
    /// Parameter-free fluent and derived literals, checked once per state.
    ground_literals: Vec<Literal>,
    /// Fluent and derived literals mentioning a parameter.
    dynamic_literals: Vec<Literal>,
    /// The positive subset of `dynamic_literals`, used in relaxed mode.
    positive_dynamic_literals: Vec<Literal>,
    graph: StaticConsistencyGraph,
}

impl BindingGenerator {
    pub fn new(context: &GroundingContext, arity: usize, conjunction: &LiteralConjunction) -> Self {
        let (ground_static, static_literals): (Vec<&Literal>, Vec<&Literal>) = conjunction
            .static_literals
            .iter()
            .partition(|l| l.atom.is_ground());
        let statically_satisfiable = ground_static.iter().all(|l| {
            context.holds_static(&GroundAtom::from_lifted(&l.atom, &[])) != l.negated
        });
        let static_literals: Vec<Literal> = static_literals.into_iter().cloned().collect();

        let (ground_literals, dynamic_literals): (Vec<Literal>, Vec<Literal>) = conjunction
            .dynamic_literals()
            .cloned()
            .partition(|l| l.atom.is_ground());
        let positive_dynamic_literals = dynamic_literals
            .iter()
            .filter(|l| !l.negated)
            .cloned()
            .collect();

        let graph = StaticConsistencyGraph::new(
            arity,
            context.problem().num_objects(),
            &static_literals,
            context.static_assignments(),
            statically_satisfiable,
        );

        Self {
            arity,
            statically_satisfiable,
            ground_literals,
            dynamic_literals,
            positive_dynamic_literals,
            graph,
        }
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Returns false if the conjunction can never hold.
    #[inline]
    pub fn is_statically_satisfiable(&self) -> bool {
        self.statically_satisfiable
    }

    pub fn static_graph(&self) -> &StaticConsistencyGraph {
        &self.graph
    }

    /// Returns the candidate bindings in `state`.
    ///
    /// `assignments` must be the assignment set of `state`.
    pub fn bindings(
        &self,
        context: &GroundingContext,
        state: StateAtoms<'_>,
        assignments: &AssignmentSet,
        mode: GroundingMode,
    ) -> Vec<ObjectTuple> {
        if !self.statically_satisfiable || !self.ground_literals_hold(context, state, mode) {
            return Vec::new();
        }
        let literals = match mode {
            GroundingMode::Exact => &self.dynamic_literals,
            GroundingMode::DeleteRelaxed => &self.positive_dynamic_literals,
        };

        match self.arity {
            0 => vec![ObjectTuple::new()],
            1 => self.graph.partitions()[0]
                .iter()
                .map(|&id| self.graph.vertex(id))
                .filter(|vertex| {
                    literals
                        .iter()
                        .all(|l| literal_consistent(l, std::slice::from_ref(vertex), assignments))
                })
                .map(|vertex| ObjectTuple::from_slice(&[vertex.object]))
                .collect(),
            _ => {
                let dynamic = DynamicConsistencyGraph::new(&self.graph, literals, assignments);
                let mut bindings = Vec::new();
                dynamic.for_each_clique(|clique| {
                    bindings.push(clique.iter().map(|&id| self.graph.vertex(id).object).collect());
                });
                bindings
            }
        }
    }

    fn ground_literals_hold(&self, context: &GroundingContext, state: StateAtoms<'_>, mode: GroundingMode) -> bool {
        self.ground_literals.iter().all(|l| {
            if l.negated && mode == GroundingMode::DeleteRelaxed {
                return true;
            }
            context.holds_in(&GroundAtom::from_lifted(&l.atom, &[]), state) != l.negated
        })
    }
}
