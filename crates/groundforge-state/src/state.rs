//! State handles and borrowed state views.

use std::fmt;

use groundforge_core::{Bitset, PredicateCategory};
use groundforge_grounding::StateAtoms;

/// Stable handle of a state in a [`StateRepository`](crate::StateRepository).
///
/// Indices are assigned in creation order, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateIndex(pub usize);

impl StateIndex {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A state as stored by the repository.
///
/// Two states are the same state iff their fluent atoms are equal; the
/// derived atoms are a function of the fluent ones.
#[derive(Debug, Clone, Copy)]
pub struct State<'a> {
    index: StateIndex,
    fluent: &'a Bitset,
    derived: &'a Bitset,
}

impl<'a> State<'a> {
    pub(crate) fn new(index: StateIndex, fluent: &'a Bitset, derived: &'a Bitset) -> Self {
        Self {
            index,
            fluent,
            derived,
        }
    }

    #[inline]
    pub fn index(&self) -> StateIndex {
        self.index
    }

    #[inline]
    pub fn fluent_atoms(&self) -> &'a Bitset {
        self.fluent
    }

    #[inline]
    pub fn derived_atoms(&self) -> &'a Bitset {
        self.derived
    }

    /// The atoms as seen by generators and ground actions.
    #[inline]
    pub fn atoms(&self) -> StateAtoms<'a> {
        StateAtoms::new(self.fluent, self.derived)
    }

    /// Returns true if the fluent or derived atom `index` holds.
    ///
    /// # Panics
    ///
    /// Panics for [`PredicateCategory::Static`]; static atoms are not part of
    /// a state.
    pub fn contains(&self, category: PredicateCategory, index: usize) -> bool {
        self.atoms().contains(category, index)
    }
}

impl PartialEq for State<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.fluent == other.fluent
    }
}

impl Eq for State<'_> {}
