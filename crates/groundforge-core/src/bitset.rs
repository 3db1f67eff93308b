//! Growable bit-vector over dense atom indices.
//!
//! `Bitset` is the storage behind precondition/effect masks and state
//! contents. Equality, ordering and hashing only look at the *significant*
//! words, i.e. trailing all-zero words are ignored. Two bitsets holding the
//! same indices therefore compare and hash equal no matter how they grew,
//! which the state repository relies on for deduplication.

use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};

const WORD_BITS: usize = u64::BITS as usize;

/// A growable set of `usize` indices backed by `u64` words.
///
/// # Example
///
/// ```
/// use groundforge_core::Bitset;
///
/// let mut a: Bitset = [1, 5, 130].into_iter().collect();
/// let b: Bitset = [5].into_iter().collect();
///
/// assert!(a.contains(130));
/// assert!(b.is_subset(&a));
///
/// a.difference_with(&b);
/// assert_eq!(a.iter().collect::<Vec<_>>(), vec![1, 130]);
/// ```
#[derive(Clone, Default)]
pub struct Bitset {
    words: Vec<u64>,
}

impl Bitset {
    /// Creates an empty bitset.
    #[inline]
    pub fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Creates an empty bitset with room for `bits` indices.
    #[inline]
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            words: Vec::with_capacity(bits.div_ceil(WORD_BITS)),
        }
    }

    #[inline]
    fn locate(index: usize) -> (usize, u64) {
        (index / WORD_BITS, 1u64 << (index % WORD_BITS))
    }

    /// Sets `index`. Returns true if it was not set before.
    #[inline]
    pub fn insert(&mut self, index: usize) -> bool {
        let (word, mask) = Self::locate(index);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let was_set = self.words[word] & mask != 0;
        self.words[word] |= mask;
        !was_set
    }

    /// Clears `index`. Returns true if it was set before.
    #[inline]
    pub fn remove(&mut self, index: usize) -> bool {
        let (word, mask) = Self::locate(index);
        match self.words.get_mut(word) {
            Some(w) if *w & mask != 0 => {
                *w &= !mask;
                true
            }
            _ => false,
        }
    }

    /// Returns true if `index` is set.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        let (word, mask) = Self::locate(index);
        self.words.get(word).is_some_and(|w| w & mask != 0)
    }

    /// Removes every index.
    #[inline]
    pub fn clear(&mut self) {
        self.words.clear();
    }

    /// Returns true if no index is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Returns the number of set indices.
    #[inline]
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns the highest set index, if any.
    pub fn last(&self) -> Option<usize> {
        let significant = self.significant_words();
        significant.last().map(|&w| {
            (significant.len() - 1) * WORD_BITS + (WORD_BITS - 1 - w.leading_zeros() as usize)
        })
    }

    /// Adds every index of `other` to `self`.
    pub fn union_with(&mut self, other: &Bitset) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w |= o;
        }
    }

    /// Removes every index of `other` from `self`.
    pub fn difference_with(&mut self, other: &Bitset) {
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w &= !o;
        }
    }

    /// Keeps only the indices also set in `other`.
    pub fn intersect_with(&mut self, other: &Bitset) {
        for (i, w) in self.words.iter_mut().enumerate() {
            *w &= other.words.get(i).copied().unwrap_or(0);
        }
    }

    /// Returns true if every index of `self` is set in `other`.
    pub fn is_subset(&self, other: &Bitset) -> bool {
        self.words
            .iter()
            .enumerate()
            .all(|(i, &w)| w & !other.words.get(i).copied().unwrap_or(0) == 0)
    }

    /// Returns true if `self` and `other` share no index.
    pub fn is_disjoint(&self, other: &Bitset) -> bool {
        self.words
            .iter()
            .zip(&other.words)
            .all(|(&w, &o)| w & o == 0)
    }

    /// Iterates the set indices in ascending order.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            words: &self.words,
            word_index: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    /// The words up to and including the last non-zero one.
    #[inline]
    fn significant_words(&self) -> &[u64] {
        let len = self
            .words
            .iter()
            .rposition(|&w| w != 0)
            .map_or(0, |p| p + 1);
        &self.words[..len]
    }
}

/// Ascending iterator over the indices of a [`Bitset`].
#[derive(Clone)]
pub struct Iter<'a> {
    words: &'a [u64],
    word_index: usize,
    current: u64,
}

impl Iterator for Iter<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word_index * WORD_BITS + bit);
            }
            self.word_index += 1;
            self.current = *self.words.get(self.word_index)?;
        }
    }
}

impl<'a> IntoIterator for &'a Bitset {
    type Item = usize;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl FromIterator<usize> for Bitset {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = Bitset::new();
        set.extend(iter);
        set
    }
}

impl Extend<usize> for Bitset {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        for index in iter {
            self.insert(index);
        }
    }
}

impl PartialEq for Bitset {
    fn eq(&self, other: &Self) -> bool {
        self.significant_words() == other.significant_words()
    }
}

impl Eq for Bitset {}

impl Hash for Bitset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant_words().hash(state);
    }
}

impl PartialOrd for Bitset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Bitset {
    fn cmp(&self, other: &Self) -> Ordering {
        self.significant_words().cmp(other.significant_words())
    }
}

impl Debug for Bitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(set: &Bitset) -> u64 {
        let mut hasher = DefaultHasher::new();
        set.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_insert_remove_contains() {
        let mut set = Bitset::new();
        assert!(set.insert(3));
        assert!(!set.insert(3));
        assert!(set.insert(200));
        assert!(set.contains(3));
        assert!(set.contains(200));
        assert!(!set.contains(4));
        assert!(!set.contains(10_000));

        assert!(set.remove(3));
        assert!(!set.remove(3));
        assert_eq!(set.count(), 1);
    }

    #[test]
    fn test_equality_ignores_trailing_words() {
        let mut grown = Bitset::new();
        grown.insert(1);
        grown.insert(500);
        grown.remove(500);

        let small: Bitset = [1].into_iter().collect();
        assert_eq!(grown, small);
        assert_eq!(hash_of(&grown), hash_of(&small));

        let mut emptied = Bitset::new();
        emptied.insert(64);
        emptied.remove(64);
        assert_eq!(emptied, Bitset::new());
        assert!(emptied.is_empty());
    }

    #[test]
    fn test_set_operations() {
        let mut a: Bitset = [0, 2, 64, 65].into_iter().collect();
        let b: Bitset = [2, 65, 300].into_iter().collect();

        assert!(!a.is_disjoint(&b));
        assert!(!b.is_subset(&a));

        let mut u = a.clone();
        u.union_with(&b);
        assert_eq!(u.iter().collect::<Vec<_>>(), vec![0, 2, 64, 65, 300]);

        let mut i = a.clone();
        i.intersect_with(&b);
        assert_eq!(i.iter().collect::<Vec<_>>(), vec![2, 65]);
        assert!(i.is_subset(&a));
        assert!(i.is_subset(&b));

        a.difference_with(&b);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![0, 64]);
        assert!(a.is_disjoint(&b));
    }

    #[test]
    fn test_last() {
        assert_eq!(Bitset::new().last(), None);
        let set: Bitset = [7, 63, 64, 129].into_iter().collect();
        assert_eq!(set.last(), Some(129));

        let mut set = set;
        set.remove(129);
        assert_eq!(set.last(), Some(64));
    }

    #[test]
    fn test_iter_across_words() {
        let indices = vec![0, 1, 63, 64, 127, 128, 1000];
        let set: Bitset = indices.iter().copied().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), indices);
        assert_eq!(set.count(), indices.len());
    }

    proptest! {
        #[test]
        fn prop_matches_btreeset(
            a in proptest::collection::btree_set(0usize..300, 0..40),
            b in proptest::collection::btree_set(0usize..300, 0..40),
        ) {
            let x: Bitset = a.iter().copied().collect();
            let y: Bitset = b.iter().copied().collect();

            let mut union = x.clone();
            union.union_with(&y);
            prop_assert_eq!(union.iter().collect::<Vec<_>>(), a.union(&b).copied().collect::<Vec<_>>());

            let mut difference = x.clone();
            difference.difference_with(&y);
            prop_assert_eq!(
                difference.iter().collect::<Vec<_>>(),
                a.difference(&b).copied().collect::<Vec<_>>()
            );

            prop_assert_eq!(x.is_subset(&y), a.is_subset(&b));
            prop_assert_eq!(x.is_disjoint(&y), a.is_disjoint(&b));
            prop_assert_eq!(x == y, a == b);
        }
    }
}
