//! Ground atoms and their dense per-category indices.
//!
//! Every ground atom gets an index the first time it is created. Indices are
//! dense *within a predicate category*, so static, fluent and derived atoms
//! live in three independent index spaces and bitsets over one category never
//! waste bits on the others.

use indexmap::IndexSet;

use crate::formalism::{Atom, FunctionId, ObjectId, ObjectTuple, Predicate, PredicateCategory, PredicateId};
use crate::Bitset;

/// A predicate applied to objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroundAtom {
    pub predicate: PredicateId,
    pub objects: ObjectTuple,
}

impl GroundAtom {
    pub fn new(predicate: PredicateId, objects: impl IntoIterator<Item = ObjectId>) -> Self {
        Self {
            predicate,
            objects: objects.into_iter().collect(),
        }
    }

    /// Grounds a lifted atom under a binding.
    pub fn from_lifted(atom: &Atom, binding: &[ObjectId]) -> Self {
        Self {
            predicate: atom.predicate,
            objects: atom.terms.iter().map(|t| t.ground(binding)).collect(),
        }
    }
}

/// A possibly negated ground atom, as listed in initial states and goals.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroundLiteral {
    pub negated: bool,
    pub atom: GroundAtom,
}

impl GroundLiteral {
    pub fn positive(atom: GroundAtom) -> Self {
        Self {
            negated: false,
            atom,
        }
    }

    pub fn negative(atom: GroundAtom) -> Self {
        Self { negated: true, atom }
    }
}

/// A numeric function applied to objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroundFunction {
    pub function: FunctionId,
    pub objects: ObjectTuple,
}

impl GroundFunction {
    pub fn new(function: FunctionId, objects: impl IntoIterator<Item = ObjectId>) -> Self {
        Self {
            function,
            objects: objects.into_iter().collect(),
        }
    }
}

/// Unique table of ground atoms, one index space per [`PredicateCategory`].
#[derive(Debug, Clone)]
pub struct AtomRepository {
    categories: Vec<PredicateCategory>,
    atoms: [IndexSet<GroundAtom>; 3],
}

impl AtomRepository {
    /// Creates an empty repository for the given predicate table.
    pub fn new(predicates: &[Predicate]) -> Self {
        Self {
            categories: predicates.iter().map(|p| p.category).collect(),
            atoms: Default::default(),
        }
    }

    /// Returns the category of a predicate.
    #[inline]
    pub fn category(&self, predicate: PredicateId) -> PredicateCategory {
        self.categories[predicate.index()]
    }

    /// Returns the index of `atom`, creating it if needed.
    pub fn get_or_create(&mut self, atom: GroundAtom) -> usize {
        let slot = self.category(atom.predicate).slot();
        self.atoms[slot].insert_full(atom).0
    }

    /// Grounds `atom` under `binding` and returns its index.
    pub fn ground(&mut self, atom: &Atom, binding: &[ObjectId]) -> usize {
        self.get_or_create(GroundAtom::from_lifted(atom, binding))
    }

    /// Returns the index of `atom` if it was created before.
    pub fn find(&self, atom: &GroundAtom) -> Option<usize> {
        let slot = self.category(atom.predicate).slot();
        self.atoms[slot].get_index_of(atom)
    }

    /// Returns the atom at `index` of `category`.
    ///
    /// # Panics
    ///
    /// Panics if the index was never handed out.
    #[inline]
    pub fn atom(&self, category: PredicateCategory, index: usize) -> &GroundAtom {
        &self.atoms[category.slot()][index]
    }

    /// Returns the number of atoms created in `category`.
    #[inline]
    pub fn len(&self, category: PredicateCategory) -> usize {
        self.atoms[category.slot()].len()
    }

    /// Returns true if no atom of any category was created.
    pub fn is_empty(&self) -> bool {
        self.atoms.iter().all(IndexSet::is_empty)
    }

    /// Iterates the atoms of `category` whose indices are set in `set`.
    pub fn atoms_in<'a>(
        &'a self,
        category: PredicateCategory,
        set: &'a Bitset,
    ) -> impl Iterator<Item = &'a GroundAtom> + 'a {
        let table = &self.atoms[category.slot()];
        set.iter().map(move |i| &table[i])
    }
}
