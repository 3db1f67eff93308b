//! Ground actions and the table that gives each one a stable handle.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;

use groundforge_core::{Bitset, ObjectTuple, Problem, SchemaId};
use indexmap::IndexSet;

use crate::strips::{StateAtoms, StripsEffect, StripsPrecondition};

/// Stable handle of a ground action within one generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroundActionIndex(pub usize);

impl GroundActionIndex {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for GroundActionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bit pattern used to compare and hash costs; `-0.0` equals `0.0`.
#[inline]
fn cost_bits(cost: f64) -> u64 {
    if cost == 0.0 {
        0
    } else {
        cost.to_bits()
    }
}

/// An effect that fires only if its precondition holds in the source state.
#[derive(Debug, Clone)]
pub struct GroundConditionalEffect {
    pub precondition: StripsPrecondition,
    pub effect: StripsEffect,
    pub cost: f64,
}

impl PartialEq for GroundConditionalEffect {
    fn eq(&self, other: &Self) -> bool {
        self.precondition == other.precondition
            && self.effect == other.effect
            && cost_bits(self.cost) == cost_bits(other.cost)
    }
}

impl Eq for GroundConditionalEffect {}

impl Hash for GroundConditionalEffect {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.precondition.hash(state);
        self.effect.hash(state);
        cost_bits(self.cost).hash(state);
    }
}

/// A schema instantiated with objects.
///
/// Structurally equal ground actions are stored once; see
/// [`GroundActionTable`].
#[derive(Debug, Clone)]
pub struct GroundAction {
    schema: SchemaId,
    binding: ObjectTuple,
    precondition: StripsPrecondition,
    effect: StripsEffect,
    conditional_effects: Vec<GroundConditionalEffect>,
    cost: f64,
}

impl GroundAction {
    pub fn new(
        schema: SchemaId,
        binding: ObjectTuple,
        precondition: StripsPrecondition,
        effect: StripsEffect,
        conditional_effects: Vec<GroundConditionalEffect>,
        cost: f64,
    ) -> Self {
        Self {
            schema,
            binding,
            precondition,
            effect,
            conditional_effects,
            cost,
        }
    }

    #[inline]
    pub fn schema(&self) -> SchemaId {
        self.schema
    }

    #[inline]
    pub fn binding(&self) -> &ObjectTuple {
        &self.binding
    }

    #[inline]
    pub fn precondition(&self) -> &StripsPrecondition {
        &self.precondition
    }

    /// The unconditional effect.
    #[inline]
    pub fn effect(&self) -> &StripsEffect {
        &self.effect
    }

    #[inline]
    pub fn conditional_effects(&self) -> &[GroundConditionalEffect] {
        &self.conditional_effects
    }

    /// Cost of the unconditional part.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Returns true if the precondition holds in `state`.
    #[inline]
    pub fn is_applicable(&self, state: StateAtoms<'_>) -> bool {
        self.precondition.is_dynamically_applicable(state)
    }

    /// Applies the action to `state` and returns the successor's fluent
    /// atoms together with the transition cost.
    ///
    /// Conditional effects are evaluated in `state`. All deletes are applied
    /// before all adds, so an atom both added and deleted ends up true.
    pub fn apply(&self, state: StateAtoms<'_>) -> (Bitset, f64) {
        let mut delete = self.effect.negative.clone();
        let mut add = self.effect.positive.clone();
        let mut cost = self.cost;
        for conditional in &self.conditional_effects {
            if conditional.precondition.is_dynamically_applicable(state) {
                delete.union_with(&conditional.effect.negative);
                add.union_with(&conditional.effect.positive);
                cost += conditional.cost;
            }
        }

        let mut successor = state.fluent.clone();
        successor.difference_with(&delete);
        successor.union_with(&add);
        (successor, cost)
    }

    /// Renders the action as `name(obj, ...)`.
    pub fn display(&self, problem: &Problem) -> String {
        let args: Vec<&str> = self
            .binding
            .iter()
            .map(|o| problem.objects[o.index()].name.as_str())
            .collect();
        format!("{}({})", problem.schema(self.schema).name, args.join(", "))
    }
}

impl PartialEq for GroundAction {
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema
            && self.binding == other.binding
            && self.precondition == other.precondition
            && self.effect == other.effect
            && self.conditional_effects == other.conditional_effects
            && cost_bits(self.cost) == cost_bits(other.cost)
    }
}

impl Eq for GroundAction {}

impl Hash for GroundAction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.schema.hash(state);
        self.binding.hash(state);
        self.precondition.hash(state);
        self.effect.hash(state);
        self.conditional_effects.hash(state);
        cost_bits(self.cost).hash(state);
    }
}

/// Content-addressed store of ground actions.
///
/// Inserting an action structurally equal to a stored one returns the
/// stored handle. Handles are dense and never invalidated.
#[derive(Debug, Clone, Default)]
pub struct GroundActionTable {
    actions: IndexSet<GroundAction>,
}

impl GroundActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle of `action`, storing it if new.
    pub fn get_or_insert(&mut self, action: GroundAction) -> GroundActionIndex {
        GroundActionIndex(self.actions.insert_full(action).0)
    }

    /// Returns the action behind `index`.
    ///
    /// # Panics
    ///
    /// Panics if the handle was not issued by this table.
    #[inline]
    pub fn get(&self, index: GroundActionIndex) -> &GroundAction {
        &self.actions[index.0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterates the stored actions in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (GroundActionIndex, &GroundAction)> + '_ {
        self.actions
            .iter()
            .enumerate()
            .map(|(i, action)| (GroundActionIndex(i), action))
    }
}

impl Index<GroundActionIndex> for GroundActionTable {
    type Output = GroundAction;

    fn index(&self, index: GroundActionIndex) -> &GroundAction {
        self.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groundforge_core::ObjectId;

    fn bits(indices: &[usize]) -> Bitset {
        indices.iter().copied().collect()
    }

    fn action(binding: &[usize], cost: f64) -> GroundAction {
        GroundAction::new(
            SchemaId(0),
            binding.iter().copied().map(ObjectId).collect(),
            StripsPrecondition {
                positive_fluent: bits(&[0]),
                ..Default::default()
            },
            StripsEffect {
                positive: bits(&[1]),
                negative: bits(&[0]),
            },
            Vec::new(),
            cost,
        )
    }

    #[test]
    fn test_table_deduplicates() {
        let mut table = GroundActionTable::new();
        let a = table.get_or_insert(action(&[0], 1.0));
        let b = table.get_or_insert(action(&[1], 1.0));
        let again = table.get_or_insert(action(&[0], 1.0));
        let zero = table.get_or_insert(action(&[0], 0.0));
        let negative_zero = table.get_or_insert(action(&[0], -0.0));

        assert_eq!(a, again);
        assert_ne!(a, b);
        assert_ne!(a, zero);
        assert_eq!(zero, negative_zero);
        assert_eq!(table.len(), 3);
        assert_eq!(table[b].binding().as_slice(), &[ObjectId(1)]);
    }

    #[test]
    fn test_apply_deletes_before_adds() {
        let mut action = action(&[0], 1.0);
        action.effect.positive.insert(0);
        action.effect.negative.insert(2);

        let fluent = bits(&[0, 2]);
        let derived = Bitset::new();
        let (successor, cost) = action.apply(StateAtoms::new(&fluent, &derived));
        assert_eq!(successor, bits(&[0, 1]));
        assert_eq!(cost, 1.0);
    }

    #[test]
    fn test_conditional_effects_see_source_state() {
        let mut action = action(&[0], 1.0);
        action.conditional_effects.push(GroundConditionalEffect {
            precondition: StripsPrecondition {
                positive_fluent: bits(&[0]),
                ..Default::default()
            },
            effect: StripsEffect {
                positive: bits(&[5]),
                negative: Bitset::new(),
            },
            cost: 2.5,
        });
        action.conditional_effects.push(GroundConditionalEffect {
            precondition: StripsPrecondition {
                positive_fluent: bits(&[1]),
                ..Default::default()
            },
            effect: StripsEffect {
                positive: bits(&[6]),
                negative: Bitset::new(),
            },
            cost: 10.0,
        });

        let fluent = bits(&[0]);
        let derived = Bitset::new();
        let (successor, cost) = action.apply(StateAtoms::new(&fluent, &derived));
        // Atom 1 is added by the action itself but was false in the source.
        assert_eq!(successor, bits(&[1, 5]));
        assert_eq!(cost, 3.5);
    }
}
