//! Ground preconditions, effects and state views as atom-index bitsets.

use groundforge_core::{Bitset, PredicateCategory};

/// How negative literals are treated while grounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GroundingMode {
    /// Positive and negative literals must both hold.
    #[default]
    Exact,
    /// Negative literals are ignored (delete relaxation).
    DeleteRelaxed,
}

/// Borrowed view of the dynamic atoms of a state.
#[derive(Debug, Clone, Copy)]
pub struct StateAtoms<'a> {
    pub fluent: &'a Bitset,
    pub derived: &'a Bitset,
}

impl<'a> StateAtoms<'a> {
    #[inline]
    pub fn new(fluent: &'a Bitset, derived: &'a Bitset) -> Self {
        Self { fluent, derived }
    }

    /// Returns true if the atom with `index` in `category` holds.
    ///
    /// # Panics
    ///
    /// Panics for static atoms, which are not part of a state.
    #[inline]
    pub fn contains(&self, category: PredicateCategory, index: usize) -> bool {
        match category {
            PredicateCategory::Fluent => self.fluent.contains(index),
            PredicateCategory::Derived => self.derived.contains(index),
            PredicateCategory::Static => panic!("static atoms are not stored in states"),
        }
    }
}

/// Owned, mutable state contents, used while computing successors and
/// applying axioms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateBuilder {
    pub fluent: Bitset,
    pub derived: Bitset,
}

impl StateBuilder {
    pub fn new(fluent: Bitset) -> Self {
        Self {
            fluent,
            derived: Bitset::new(),
        }
    }

    #[inline]
    pub fn atoms(&self) -> StateAtoms<'_> {
        StateAtoms::new(&self.fluent, &self.derived)
    }
}

/// A conjunction of ground literals, one positive and one negative mask per
/// predicate category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StripsPrecondition {
    pub positive_static: Bitset,
    pub negative_static: Bitset,
    pub positive_fluent: Bitset,
    pub negative_fluent: Bitset,
    pub positive_derived: Bitset,
    pub negative_derived: Bitset,
}

impl StripsPrecondition {
    /// Returns true if the static part holds under `static_atoms`.
    pub fn is_statically_applicable(&self, static_atoms: &Bitset) -> bool {
        self.positive_static.is_subset(static_atoms) && self.negative_static.is_disjoint(static_atoms)
    }

    /// Returns true if the fluent and derived parts hold in `state`.
    #[inline]
    pub fn is_dynamically_applicable(&self, state: StateAtoms<'_>) -> bool {
        self.is_relaxed_applicable(state)
            && self.negative_fluent.is_disjoint(state.fluent)
            && self.negative_derived.is_disjoint(state.derived)
    }

    /// Returns true if the positive fluent and derived literals hold in `state`.
    #[inline]
    pub fn is_relaxed_applicable(&self, state: StateAtoms<'_>) -> bool {
        self.positive_fluent.is_subset(state.fluent) && self.positive_derived.is_subset(state.derived)
    }

    #[inline]
    pub fn is_applicable_in(&self, state: StateAtoms<'_>, mode: GroundingMode) -> bool {
        match mode {
            GroundingMode::Exact => self.is_dynamically_applicable(state),
            GroundingMode::DeleteRelaxed => self.is_relaxed_applicable(state),
        }
    }

    /// Returns true if no fluent or derived literal is mentioned.
    pub fn is_static_only(&self) -> bool {
        self.positive_fluent.is_empty()
            && self.negative_fluent.is_empty()
            && self.positive_derived.is_empty()
            && self.negative_derived.is_empty()
    }

    /// Returns true if some atom is required both true and false.
    pub fn is_contradictory(&self) -> bool {
        !self.positive_static.is_disjoint(&self.negative_static)
            || !self.positive_fluent.is_disjoint(&self.negative_fluent)
            || !self.positive_derived.is_disjoint(&self.negative_derived)
    }
}

/// Fluent atoms added and deleted by an effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StripsEffect {
    pub positive: Bitset,
    pub negative: Bitset,
}

impl StripsEffect {
    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }

    pub fn union_with(&mut self, other: &StripsEffect) {
        self.positive.union_with(&other.positive);
        self.negative.union_with(&other.negative);
    }
}
