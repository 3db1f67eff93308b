//! Per-predicate sets of partial assignments.
//!
//! For every atom `p(o_1, ..., o_k)` in a set of ground atoms, an
//! `AssignmentSet` records every single `(position, object)` pair and every
//! pair of pairs `(i, o_i), (j, o_j)` with `i < j`. Both kinds are stored in
//! one bitset per predicate under the rank
//!
//! ```text
//! rank = ((first_pos * n + first_obj) * a + second_pos) * n + second_obj
//! ```
//!
//! where `a = arity + 1` and `n = num_objects + 1`. Position/object values are
//! shifted by one so that `0` stands for "absent", which lets single
//! assignments live in the same index space as pairs.
//!
//! A set answers "is there *some* atom of `p` agreeing with this partial
//! assignment on one or two positions?". That is a necessary condition for a
//! positive literal to hold, never a sufficient one.

use groundforge_core::{Bitset, GroundAtom, ObjectId, Predicate, PredicateId};

/// Partial-assignment index over a set of ground atoms.
///
/// # Example
///
/// ```
/// use groundforge_core::{GroundAtom, ObjectId, Predicate, PredicateCategory, PredicateId};
/// use groundforge_grounding::AssignmentSet;
///
/// let predicates = vec![Predicate {
///     name: "road".into(),
///     arity: 2,
///     category: PredicateCategory::Static,
/// }];
/// let road = GroundAtom::new(PredicateId(0), [ObjectId(0), ObjectId(2)]);
/// let set = AssignmentSet::build(3, &predicates, [&road]);
///
/// assert!(set.consistent_unary(PredicateId(0), 1, ObjectId(2)));
/// assert!(set.consistent_binary(PredicateId(0), 0, ObjectId(0), 1, ObjectId(2)));
/// assert!(!set.consistent_binary(PredicateId(0), 0, ObjectId(2), 1, ObjectId(0)));
/// ```
#[derive(Debug, Clone)]
pub struct AssignmentSet {
    num_objects: usize,
    arities: Vec<usize>,
    /// One bitset per predicate; empty when no atom of the predicate was added.
    sets: Vec<Bitset>,
}

impl AssignmentSet {
    /// Creates an empty set for the given predicate table.
    pub fn new(num_objects: usize, predicates: &[Predicate]) -> Self {
        Self {
            num_objects,
            arities: predicates.iter().map(|p| p.arity).collect(),
            sets: vec![Bitset::new(); predicates.len()],
        }
    }

    /// Builds a set holding every partial assignment of `atoms`.
    pub fn build<'a, I>(num_objects: usize, predicates: &[Predicate], atoms: I) -> Self
    where
        I: IntoIterator<Item = &'a GroundAtom>,
    {
        let mut set = Self::new(num_objects, predicates);
        set.extend(atoms);
        set
    }

    /// Records every single and pairwise assignment of `atom`.
    pub fn insert(&mut self, atom: &GroundAtom) {
        let p = atom.predicate.index();
        let arity = self.arities[p];
        debug_assert_eq!(arity, atom.objects.len());

        let num_objects = self.num_objects;
        let set = &mut self.sets[p];
        for (i, &oi) in atom.objects.iter().enumerate() {
            set.insert(rank(Some((i, oi)), None, arity, num_objects));
            for (j, &oj) in atom.objects.iter().enumerate().skip(i + 1) {
                set.insert(rank(Some((i, oi)), Some((j, oj)), arity, num_objects));
            }
        }
    }

    /// Adds the assignments of every atom in `atoms`.
    pub fn extend<'a, I>(&mut self, atoms: I)
    where
        I: IntoIterator<Item = &'a GroundAtom>,
    {
        for atom in atoms {
            self.insert(atom);
        }
    }

    /// Forgets every recorded assignment, keeping the allocated storage.
    pub fn clear(&mut self) {
        for set in &mut self.sets {
            set.clear();
        }
    }

    /// Returns true if some atom of `predicate` has `object` at `position`.
    ///
    /// A predicate without atoms tests false for every query.
    #[inline]
    pub fn consistent_unary(&self, predicate: PredicateId, position: usize, object: ObjectId) -> bool {
        let p = predicate.index();
        self.sets[p].contains(rank(
            Some((position, object)),
            None,
            self.arities[p],
            self.num_objects,
        ))
    }

    /// Returns true if some atom of `predicate` has `first_object` at
    /// `first_position` and `second_object` at `second_position`.
    ///
    /// The two positions may be given in either order but must differ.
    #[inline]
    pub fn consistent_binary(
        &self,
        predicate: PredicateId,
        first_position: usize,
        first_object: ObjectId,
        second_position: usize,
        second_object: ObjectId,
    ) -> bool {
        debug_assert_ne!(first_position, second_position);
        let (first, second) = if first_position < second_position {
            ((first_position, first_object), (second_position, second_object))
        } else {
            ((second_position, second_object), (first_position, first_object))
        };
        let p = predicate.index();
        self.sets[p].contains(rank(
            Some(first),
            Some(second),
            self.arities[p],
            self.num_objects,
        ))
    }

    /// Number of objects the set was built for.
    #[inline]
    pub fn num_objects(&self) -> usize {
        self.num_objects
    }
}

/// Bijective rank of an (up to) two-position partial assignment.
///
/// # Panics
///
/// Debug builds panic on a position outside the arity or an object outside
/// the object range; release builds would silently alias another rank.
#[inline]
fn rank(
    first: Option<(usize, ObjectId)>,
    second: Option<(usize, ObjectId)>,
    arity: usize,
    num_objects: usize,
) -> usize {
    let a = arity + 1;
    let n = num_objects + 1;
    let shift = |assignment: Option<(usize, ObjectId)>| match assignment {
        Some((position, object)) => {
            debug_assert!(position < arity, "position {} out of arity {}", position, arity);
            debug_assert!(object.index() < num_objects, "object {} out of range", object);
            (position + 1, object.index() + 1)
        }
        None => (0, 0),
    };
    let (fp, fo) = shift(first);
    let (sp, so) = shift(second);
    ((fp * n + fo) * a + sp) * n + so
}

#[cfg(test)]
mod tests {
    use super::*;
    use groundforge_core::PredicateCategory;
    use std::collections::HashSet;

    fn predicates() -> Vec<Predicate> {
        vec![
            Predicate {
                name: "link".into(),
                arity: 3,
                category: PredicateCategory::Static,
            },
            Predicate {
                name: "unused".into(),
                arity: 2,
                category: PredicateCategory::Fluent,
            },
        ]
    }

    #[test]
    fn test_rank_is_injective() {
        let arity = 3;
        let num_objects = 4;
        let mut seen = HashSet::new();
        let single = (0..arity).flat_map(|p| (0..num_objects).map(move |o| (p, ObjectId(o))));

        seen.insert(rank(None, None, arity, num_objects));
        for first in single.clone() {
            assert!(seen.insert(rank(Some(first), None, arity, num_objects)));
            for second in single.clone().filter(|s| s.0 > first.0) {
                assert!(seen.insert(rank(Some(first), Some(second), arity, num_objects)));
            }
        }
    }

    #[test]
    fn test_single_and_pair_queries() {
        let atom = GroundAtom::new(PredicateId(0), [ObjectId(1), ObjectId(0), ObjectId(3)]);
        let set = AssignmentSet::build(4, &predicates(), [&atom]);
        let link = PredicateId(0);

        assert!(set.consistent_unary(link, 0, ObjectId(1)));
        assert!(set.consistent_unary(link, 2, ObjectId(3)));
        assert!(!set.consistent_unary(link, 0, ObjectId(0)));

        assert!(set.consistent_binary(link, 0, ObjectId(1), 2, ObjectId(3)));
        assert!(set.consistent_binary(link, 2, ObjectId(3), 0, ObjectId(1)));
        assert!(!set.consistent_binary(link, 0, ObjectId(1), 1, ObjectId(3)));
    }

    #[test]
    fn test_pairs_come_from_one_atom() {
        let a = GroundAtom::new(PredicateId(0), [ObjectId(0), ObjectId(1), ObjectId(2)]);
        let b = GroundAtom::new(PredicateId(0), [ObjectId(3), ObjectId(0), ObjectId(0)]);
        let set = AssignmentSet::build(4, &predicates(), [&a, &b]);
        let link = PredicateId(0);

        assert!(set.consistent_unary(link, 0, ObjectId(3)));
        assert!(set.consistent_unary(link, 1, ObjectId(1)));
        assert!(!set.consistent_binary(link, 0, ObjectId(3), 1, ObjectId(1)));
    }

    #[test]
    fn test_predicate_without_atoms_is_inconsistent() {
        let set = AssignmentSet::new(4, &predicates());
        assert!(!set.consistent_unary(PredicateId(1), 0, ObjectId(0)));
        assert!(!set.consistent_binary(PredicateId(1), 0, ObjectId(0), 1, ObjectId(1)));
    }

    #[test]
    fn test_clear() {
        let atom = GroundAtom::new(PredicateId(1), [ObjectId(0), ObjectId(1)]);
        let mut set = AssignmentSet::build(2, &predicates(), [&atom]);
        assert!(set.consistent_unary(PredicateId(1), 1, ObjectId(1)));

        set.clear();
        assert!(!set.consistent_unary(PredicateId(1), 1, ObjectId(1)));
    }
}
