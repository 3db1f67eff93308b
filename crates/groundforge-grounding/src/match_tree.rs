//! Decision trees answering "which elements are applicable in this state?".
//!
//! A [`MatchTree`] is built over a fixed set of elements (ground actions or
//! ground axioms), each with a [`StripsPrecondition`]. Inner nodes test one
//! atom and route elements that require it true, require it false, or do not
//! mention it into three children. A query walks the true/false child that
//! matches the state plus every don't-care child, so it only touches
//! elements whose tested literals all agree with the state.
//!
//! Atoms are ranked with fluent atoms first and derived atoms after them.
//! A tree knows how many atoms of each category existed when it was built;
//! querying it with a state that mentions a newer atom is an error, since the
//! tree cannot know which elements would test it.

use groundforge_core::{Bitset, GroundForgeError, Result};

use crate::strips::{StateAtoms, StripsPrecondition};

#[derive(Debug, Clone)]
enum MatchNode<H> {
    Leaf(Vec<H>),
    Decision {
        atom: usize,
        on_true: Option<usize>,
        on_false: Option<usize>,
        dont_care: Option<usize>,
    },
}

/// Arena-allocated decision tree over element handles `H`.
///
/// # Example
///
/// ```
/// use groundforge_core::Bitset;
/// use groundforge_grounding::{MatchTree, StateAtoms, StripsPrecondition};
///
/// let needs_zero = StripsPrecondition {
///     positive_fluent: [0].into_iter().collect(),
///     ..Default::default()
/// };
/// let forbids_zero = StripsPrecondition {
///     negative_fluent: [0].into_iter().collect(),
///     ..Default::default()
/// };
/// let tree = MatchTree::build([("a", &needs_zero), ("b", &forbids_zero)], 1, 0);
///
/// let fluent: Bitset = [0].into_iter().collect();
/// let derived = Bitset::new();
/// let mut applicable = Vec::new();
/// tree.applicable(StateAtoms::new(&fluent, &derived), &mut applicable).unwrap();
/// assert_eq!(applicable, vec!["a"]);
/// ```
#[derive(Debug, Clone)]
pub struct MatchTree<H> {
    nodes: Vec<MatchNode<H>>,
    num_fluent_atoms: usize,
    num_derived_atoms: usize,
    len: usize,
}

/// Sorted `(rank, required value)` pairs of one element.
type Tests = Vec<(usize, bool)>;

fn tests_of(precondition: &StripsPrecondition, num_fluent_atoms: usize) -> Tests {
    let mut tests: Tests = precondition
        .positive_fluent
        .iter()
        .map(|i| (i, true))
        .chain(precondition.negative_fluent.iter().map(|i| (i, false)))
        .chain(
            precondition
                .positive_derived
                .iter()
                .map(|i| (num_fluent_atoms + i, true)),
        )
        .chain(
            precondition
                .negative_derived
                .iter()
                .map(|i| (num_fluent_atoms + i, false)),
        )
        .collect();
    tests.sort_unstable();
    tests
}

struct Pending {
    node: usize,
    members: Vec<usize>,
    /// Every atom ranked below this was already tested on the path.
    next_rank: usize,
}

impl<H: Copy> MatchTree<H> {
    /// Builds a tree over `elements`.
    ///
    /// `num_fluent_atoms` and `num_derived_atoms` must cover every atom
    /// mentioned by the elements' preconditions. Static parts of the
    /// preconditions are ignored.
    pub fn build<'a, I>(elements: I, num_fluent_atoms: usize, num_derived_atoms: usize) -> Self
    where
        I: IntoIterator<Item = (H, &'a StripsPrecondition)>,
    {
        let (handles, tests): (Vec<H>, Vec<Tests>) = elements
            .into_iter()
            .map(|(handle, precondition)| (handle, tests_of(precondition, num_fluent_atoms)))
            .unzip();
        debug_assert!(tests.iter().flatten().all(|&(rank, _)| {
            rank < num_fluent_atoms + num_derived_atoms
        }));

        let mut nodes = vec![MatchNode::Leaf(Vec::new())];
        let mut stack = vec![Pending {
            node: 0,
            members: (0..handles.len()).collect(),
            next_rank: 0,
        }];

        while let Some(Pending {
            node,
            members,
            next_rank,
        }) = stack.pop()
        {
            let split = members
                .iter()
                .filter_map(|&m| {
                    let t = &tests[m];
                    t.get(t.partition_point(|&(rank, _)| rank < next_rank))
                        .map(|&(rank, _)| rank)
                })
                .min();

            let Some(atom) = split else {
                nodes[node] = MatchNode::Leaf(members.iter().map(|&m| handles[m]).collect());
                continue;
            };

            let mut on_true = Vec::new();
            let mut on_false = Vec::new();
            let mut dont_care = Vec::new();
            for m in members {
                match tests[m].binary_search_by_key(&atom, |&(rank, _)| rank) {
                    Ok(i) if tests[m][i].1 => on_true.push(m),
                    Ok(_) => on_false.push(m),
                    Err(_) => dont_care.push(m),
                }
            }

            let mut child = |group: Vec<usize>| -> Option<usize> {
                if group.is_empty() {
                    return None;
                }
                let id = nodes.len();
                nodes.push(MatchNode::Leaf(Vec::new()));
                stack.push(Pending {
                    node: id,
                    members: group,
                    next_rank: atom + 1,
                });
                Some(id)
            };
            let on_true = child(on_true);
            let on_false = child(on_false);
            let dont_care = child(dont_care);
            nodes[node] = MatchNode::Decision {
                atom,
                on_true,
                on_false,
                dont_care,
            };
        }

        Self {
            nodes,
            num_fluent_atoms,
            num_derived_atoms,
            len: handles.len(),
        }
    }

    /// Appends the handles of every element applicable in `state` to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`GroundForgeError::StaleMatchTree`] if `state` holds an atom
    /// created after the tree was built.
    pub fn applicable(&self, state: StateAtoms<'_>, out: &mut Vec<H>) -> Result<()> {
        check_known(state.fluent, self.num_fluent_atoms)?;
        check_known(state.derived, self.num_derived_atoms)?;

        let mut stack = vec![0usize];
        while let Some(id) = stack.pop() {
            match &self.nodes[id] {
                MatchNode::Leaf(handles) => out.extend_from_slice(handles),
                MatchNode::Decision {
                    atom,
                    on_true,
                    on_false,
                    dont_care,
                } => {
                    stack.extend(*dont_care);
                    let holds = if *atom < self.num_fluent_atoms {
                        state.fluent.contains(*atom)
                    } else {
                        state.derived.contains(*atom - self.num_fluent_atoms)
                    };
                    stack.extend(if holds { *on_true } else { *on_false });
                }
            }
        }
        Ok(())
    }

    /// Number of elements the tree was built over.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes, inner and leaf.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
}

fn check_known(atoms: &Bitset, known: usize) -> Result<()> {
    match atoms.last() {
        Some(atom) if atom >= known => Err(GroundForgeError::StaleMatchTree { atom, known }),
        _ => Ok(()),
    }
}
