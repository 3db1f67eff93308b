//! Consistency graphs over parameter/object assignments.
//!
//! A vertex `(p, o)` stands for "parameter `p` is bound to object `o`". It
//! exists only if every literal mentioning `p` can still hold with `p = o`.
//! An edge joins two vertices of different parameters if every literal
//! mentioning both parameters can still hold under both assignments. Every
//! binding that satisfies a conjunction is then a transversal clique of the
//! graph; the converse does not hold, so candidates are checked afterwards.
//!
//! The static graph is built once per schema from static literals. Each
//! state restricts it with the fluent and derived literals evaluated against
//! the state's [`AssignmentSet`].

use groundforge_core::{Bitset, Literal, ObjectId, Term};
use smallvec::SmallVec;

use crate::assignment_set::AssignmentSet;
use crate::clique::for_each_transversal_clique;

/// A parameter bound to an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vertex {
    pub parameter: usize,
    pub object: ObjectId,
}

type FixedPositions = SmallVec<[(usize, ObjectId); 4]>;

/// Positions of `literal` whose object is known under `assignment`.
fn fixed_positions(literal: &Literal, assignment: &[Vertex]) -> FixedPositions {
    literal
        .atom
        .terms
        .iter()
        .enumerate()
        .filter_map(|(position, term)| match *term {
            Term::Object(object) => Some((position, object)),
            Term::Parameter(p) => assignment
                .iter()
                .find(|v| v.parameter == p)
                .map(|v| (position, v.object)),
        })
        .collect()
}

/// Returns true if `literal` may hold under the partial `assignment`.
///
/// A positive literal needs every single and pairwise fixed position to
/// appear in `set`. A negative literal only prunes when its atom is fully
/// fixed with arity one or two, in which case the pair test is exact.
pub(crate) fn literal_consistent(literal: &Literal, assignment: &[Vertex], set: &AssignmentSet) -> bool {
    let predicate = literal.atom.predicate;
    let fixed = fixed_positions(literal, assignment);

    if literal.negated {
        let arity = literal.atom.terms.len();
        if fixed.len() != arity {
            return true;
        }
        return match fixed.as_slice() {
            [(p, o)] => !set.consistent_unary(predicate, *p, *o),
            [(p1, o1), (p2, o2)] => !set.consistent_binary(predicate, *p1, *o1, *p2, *o2),
            _ => true,
        };
    }

    for (i, &(p1, o1)) in fixed.iter().enumerate() {
        if !set.consistent_unary(predicate, p1, o1) {
            return false;
        }
        for &(p2, o2) in &fixed[i + 1..] {
            if !set.consistent_binary(predicate, p1, o1, p2, o2) {
                return false;
            }
        }
    }
    true
}

fn mentions(literal: &Literal, parameter: usize) -> bool {
    literal.atom.parameters().any(|p| p == parameter)
}

/// Consistency graph over the static literals of a conjunction.
#[derive(Debug, Clone, Default)]
pub struct StaticConsistencyGraph {
    vertices: Vec<Vertex>,
    /// Vertex ids per parameter.
    partitions: Vec<Vec<usize>>,
    /// Edges `(u, v)` with `u`'s parameter smaller than `v`'s.
    edges: Vec<(usize, usize)>,
}

impl StaticConsistencyGraph {
    /// Builds the graph for a conjunction with `arity` parameters.
    ///
    /// If `ground_literals_hold` is false, some parameter-free static literal
    /// is violated and the edge set is left empty.
    pub fn new(
        arity: usize,
        num_objects: usize,
        static_literals: &[Literal],
        static_assignments: &AssignmentSet,
        ground_literals_hold: bool,
    ) -> Self {
        let mut vertices = Vec::new();
        let mut partitions = Vec::with_capacity(arity);

        for parameter in 0..arity {
            let relevant: Vec<&Literal> = static_literals
                .iter()
                .filter(|l| mentions(l, parameter))
                .collect();
            let mut partition = Vec::new();
            for object in (0..num_objects).map(ObjectId) {
                let vertex = Vertex { parameter, object };
                if relevant
                    .iter()
                    .all(|l| literal_consistent(l, &[vertex], static_assignments))
                {
                    partition.push(vertices.len());
                    vertices.push(vertex);
                }
            }
            partitions.push(partition);
        }

        let mut edges = Vec::new();
        if ground_literals_hold {
            for first in 0..arity {
                for second in (first + 1)..arity {
                    let relevant: Vec<&Literal> = static_literals
                        .iter()
                        .filter(|l| mentions(l, first) && mentions(l, second))
                        .collect();
                    for &u in &partitions[first] {
                        for &v in &partitions[second] {
                            let pair = [vertices[u], vertices[v]];
                            if relevant
                                .iter()
                                .all(|l| literal_consistent(l, &pair, static_assignments))
                            {
                                edges.push((u, v));
                            }
                        }
                    }
                }
            }
        }

        Self {
            vertices,
            partitions,
            edges,
        }
    }

    #[inline]
    pub fn vertex(&self, id: usize) -> Vertex {
        self.vertices[id]
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn partitions(&self) -> &[Vec<usize>] {
        &self.partitions
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }
}

/// The static graph restricted to one state.
#[derive(Debug, Clone)]
pub struct DynamicConsistencyGraph {
    partitions: Vec<Vec<usize>>,
    adjacency: Vec<Bitset>,
}

impl DynamicConsistencyGraph {
    /// Keeps the vertices and edges of `graph` consistent with `literals`
    /// under `assignments`.
    pub fn new(graph: &StaticConsistencyGraph, literals: &[Literal], assignments: &AssignmentSet) -> Self {
        let arity = graph.partitions.len();

        let mut keep = Bitset::with_capacity(graph.vertices.len());
        let partitions: Vec<Vec<usize>> = graph
            .partitions
            .iter()
            .enumerate()
            .map(|(parameter, partition)| {
                let relevant: Vec<&Literal> =
                    literals.iter().filter(|l| mentions(l, parameter)).collect();
                partition
                    .iter()
                    .copied()
                    .filter(|&v| {
                        let vertex = [graph.vertices[v]];
                        relevant
                            .iter()
                            .all(|l| literal_consistent(l, &vertex, assignments))
                    })
                    .inspect(|&v| {
                        keep.insert(v);
                    })
                    .collect()
            })
            .collect();

        // Literals relevant to each parameter pair, computed once.
        let mut pair_literals: Vec<Vec<&Literal>> = vec![Vec::new(); arity * arity];
        for first in 0..arity {
            for second in (first + 1)..arity {
                pair_literals[first * arity + second] = literals
                    .iter()
                    .filter(|l| mentions(l, first) && mentions(l, second))
                    .collect();
            }
        }

        let mut adjacency = vec![Bitset::new(); graph.vertices.len()];
        for &(u, v) in &graph.edges {
            if !keep.contains(u) || !keep.contains(v) {
                continue;
            }
            let pair = [graph.vertices[u], graph.vertices[v]];
            let relevant = &pair_literals[pair[0].parameter * arity + pair[1].parameter];
            if relevant
                .iter()
                .all(|l| literal_consistent(l, &pair, assignments))
            {
                adjacency[u].insert(v);
                adjacency[v].insert(u);
            }
        }

        Self {
            partitions,
            adjacency,
        }
    }

    pub fn partitions(&self) -> &[Vec<usize>] {
        &self.partitions
    }

    pub fn adjacency(&self) -> &[Bitset] {
        &self.adjacency
    }

    /// Calls `visit` with the vertex ids of every transversal clique.
    pub fn for_each_clique<F>(&self, visit: F)
    where
        F: FnMut(&[usize]),
    {
        for_each_transversal_clique(&self.partitions, self.adjacency.as_slice(), visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groundforge_core::{Atom, GroundAtom, Predicate, PredicateCategory, PredicateId};

    fn predicates() -> Vec<Predicate> {
        vec![
            Predicate {
                name: "road".into(),
                arity: 2,
                category: PredicateCategory::Static,
            },
            Predicate {
                name: "at".into(),
                arity: 1,
                category: PredicateCategory::Fluent,
            },
        ]
    }

    const ROAD: PredicateId = PredicateId(0);
    const AT: PredicateId = PredicateId(1);

    fn road(from: usize, to: usize) -> GroundAtom {
        GroundAtom::new(ROAD, [ObjectId(from), ObjectId(to)])
    }

    fn p(i: usize) -> Term {
        Term::Parameter(i)
    }

    fn v(parameter: usize, object: usize) -> Vertex {
        Vertex {
            parameter,
            object: ObjectId(object),
        }
    }

    #[test]
    fn test_negative_literal_prunes_only_when_fixed() {
        let atoms = [road(0, 1)];
        let set = AssignmentSet::build(3, &predicates(), atoms.iter());
        let not_road = Literal::negative(Atom::new(ROAD, [p(0), p(1)]));

        assert!(!literal_consistent(&not_road, &[v(0, 0), v(1, 1)], &set));
        assert!(literal_consistent(&not_road, &[v(0, 1), v(1, 0)], &set));
        // Partially fixed: no pruning.
        assert!(literal_consistent(&not_road, &[v(0, 0)], &set));
    }

    #[test]
    fn test_constants_take_part_in_checks() {
        let atoms = [road(0, 1)];
        let set = AssignmentSet::build(3, &predicates(), atoms.iter());
        let from_zero = Literal::positive(Atom::new(ROAD, [Term::Object(ObjectId(0)), p(0)]));

        assert!(literal_consistent(&from_zero, &[v(0, 1)], &set));
        assert!(!literal_consistent(&from_zero, &[v(0, 2)], &set));
    }

    #[test]
    fn test_static_graph() {
        let atoms = [road(0, 1), road(1, 2)];
        let set = AssignmentSet::build(3, &predicates(), atoms.iter());
        let literals = vec![Literal::positive(Atom::new(ROAD, [p(0), p(1)]))];

        let graph = StaticConsistencyGraph::new(2, 3, &literals, &set, true);
        let objects = |partition: &[usize]| -> Vec<usize> {
            partition.iter().map(|&id| graph.vertex(id).object.index()).collect()
        };
        assert_eq!(objects(&graph.partitions()[0]), vec![0, 1]);
        assert_eq!(objects(&graph.partitions()[1]), vec![1, 2]);

        let edges: Vec<(usize, usize)> = graph
            .edges()
            .iter()
            .map(|&(u, w)| (graph.vertex(u).object.index(), graph.vertex(w).object.index()))
            .collect();
        assert_eq!(edges, vec![(0, 1), (1, 2)]);

        let violated = StaticConsistencyGraph::new(2, 3, &literals, &set, false);
        assert!(violated.edges().is_empty());
    }

    #[test]
    fn test_dynamic_restriction() {
        let statics = [road(0, 1), road(1, 2), road(0, 2)];
        let static_set = AssignmentSet::build(3, &predicates(), statics.iter());
        let static_literals = vec![Literal::positive(Atom::new(ROAD, [p(0), p(1)]))];
        let graph = StaticConsistencyGraph::new(2, 3, &static_literals, &static_set, true);

        let fluents = [GroundAtom::new(AT, [ObjectId(0)])];
        let state_set = AssignmentSet::build(3, &predicates(), fluents.iter());
        let dynamic_literals = vec![Literal::positive(Atom::new(AT, [p(0)]))];
        let dynamic = DynamicConsistencyGraph::new(&graph, &dynamic_literals, &state_set);

        let mut bindings = Vec::new();
        dynamic.for_each_clique(|clique| {
            bindings.push(
                clique
                    .iter()
                    .map(|&id| graph.vertex(id).object.index())
                    .collect::<Vec<_>>(),
            )
        });
        bindings.sort();
        assert_eq!(bindings, vec![vec![0, 1], vec![0, 2]]);
    }
}
