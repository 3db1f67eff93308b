//! Transversal clique enumeration in k-partite graphs.
//!
//! A transversal clique picks exactly one vertex from every partition such
//! that all picked vertices are pairwise adjacent. Each one corresponds to a
//! candidate binding of a schema's parameters.
//!
//! The search always branches on the partition with the fewest remaining
//! candidates and filters the candidates of every other open partition by
//! adjacency to the chosen vertex, so dead ends are found as early as
//! possible.

use groundforge_core::Bitset;

/// Symmetric adjacency relation between vertex ids.
pub trait Adjacency {
    fn is_adjacent(&self, u: usize, v: usize) -> bool;
}

impl Adjacency for [Bitset] {
    #[inline]
    fn is_adjacent(&self, u: usize, v: usize) -> bool {
        self[u].contains(v)
    }
}

impl Adjacency for Vec<Bitset> {
    #[inline]
    fn is_adjacent(&self, u: usize, v: usize) -> bool {
        self.as_slice().is_adjacent(u, v)
    }
}

/// Calls `visit` once per transversal clique.
///
/// The clique is passed as a slice holding the chosen vertex of partition
/// `i` at position `i`. With zero partitions the empty clique is visited
/// once; if any partition is empty nothing is visited.
pub fn for_each_transversal_clique<A, F>(partitions: &[Vec<usize>], adjacency: &A, mut visit: F)
where
    A: Adjacency + ?Sized,
    F: FnMut(&[usize]),
{
    if partitions.iter().any(Vec::is_empty) {
        return;
    }
    let mut clique = vec![usize::MAX; partitions.len()];
    let open: Vec<usize> = (0..partitions.len()).collect();
    search(adjacency, partitions, &open, &mut clique, &mut visit);
}

/// Collects every transversal clique.
///
/// # Example
///
/// ```
/// use groundforge_core::Bitset;
/// use groundforge_grounding::enumerate_transversal_cliques;
///
/// // Partitions {0, 1} and {2}; only 1-2 is an edge.
/// let mut adjacency = vec![Bitset::new(); 3];
/// adjacency[1].insert(2);
/// adjacency[2].insert(1);
///
/// let cliques = enumerate_transversal_cliques(&[vec![0, 1], vec![2]], adjacency.as_slice());
/// assert_eq!(cliques, vec![vec![1, 2]]);
/// ```
pub fn enumerate_transversal_cliques<A>(partitions: &[Vec<usize>], adjacency: &A) -> Vec<Vec<usize>>
where
    A: Adjacency + ?Sized,
{
    let mut cliques = Vec::new();
    for_each_transversal_clique(partitions, adjacency, |clique| cliques.push(clique.to_vec()));
    cliques
}

fn search<A, F>(
    adjacency: &A,
    candidates: &[Vec<usize>],
    open: &[usize],
    clique: &mut [usize],
    visit: &mut F,
) where
    A: Adjacency + ?Sized,
    F: FnMut(&[usize]),
{
    let Some(&pivot) = open.iter().min_by_key(|&&p| candidates[p].len()) else {
        visit(clique);
        return;
    };
    let rest: Vec<usize> = open.iter().copied().filter(|&p| p != pivot).collect();

    let mut next = vec![Vec::new(); candidates.len()];
    'vertices: for &vertex in &candidates[pivot] {
        for &p in &rest {
            next[p].clear();
            next[p].extend(
                candidates[p]
                    .iter()
                    .copied()
                    .filter(|&w| adjacency.is_adjacent(vertex, w)),
            );
            if next[p].is_empty() {
                continue 'vertices;
            }
        }
        clique[pivot] = vertex;
        search(adjacency, &next, &rest, clique, visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn brute_force(partitions: &[Vec<usize>], adjacency: &[Bitset]) -> Vec<Vec<usize>> {
        let mut result: Vec<Vec<usize>> = vec![Vec::new()];
        for partition in partitions {
            let mut extended = Vec::new();
            for prefix in &result {
                for &v in partition {
                    if prefix.iter().all(|&u| adjacency[u].contains(v)) {
                        let mut clique = prefix.clone();
                        clique.push(v);
                        extended.push(clique);
                    }
                }
            }
            result = extended;
        }
        result
    }

    fn graph(partition_sizes: &[usize], edges: &[bool]) -> (Vec<Vec<usize>>, Vec<Bitset>) {
        let mut partitions = Vec::new();
        let mut owner = Vec::new();
        for (i, &size) in partition_sizes.iter().enumerate() {
            let start = owner.len();
            owner.extend(std::iter::repeat(i).take(size));
            partitions.push((start..owner.len()).collect::<Vec<_>>());
        }

        let n = owner.len();
        let mut adjacency = vec![Bitset::new(); n];
        let mut bits = edges.iter().cycle();
        for u in 0..n {
            for v in (u + 1)..n {
                let bit = bits.next().copied().unwrap_or(false);
                if owner[u] != owner[v] && bit {
                    adjacency[u].insert(v);
                    adjacency[v].insert(u);
                }
            }
        }
        (partitions, adjacency)
    }

    #[test]
    fn test_complete_tripartite() {
        let (partitions, adjacency) = graph(&[2, 2, 2], &[true]);
        let cliques = enumerate_transversal_cliques(&partitions, adjacency.as_slice());
        assert_eq!(cliques.len(), 8);
        for clique in &cliques {
            for (i, &v) in clique.iter().enumerate() {
                assert!(partitions[i].contains(&v));
            }
        }
    }

    #[test]
    fn test_empty_partition_yields_nothing() {
        let (mut partitions, adjacency) = graph(&[2, 2], &[true]);
        partitions.push(Vec::new());
        assert!(enumerate_transversal_cliques(&partitions, adjacency.as_slice()).is_empty());
    }

    #[test]
    fn test_zero_partitions_yield_empty_clique() {
        let adjacency: Vec<Bitset> = Vec::new();
        let cliques = enumerate_transversal_cliques(&[], &adjacency);
        assert_eq!(cliques, vec![Vec::<usize>::new()]);
    }

    #[test]
    fn test_missing_edge_breaks_clique() {
        // 0 | 1 | 2 with edges 0-1 and 1-2 only.
        let mut adjacency = vec![Bitset::new(); 3];
        for (u, v) in [(0, 1), (1, 2)] {
            adjacency[u].insert(v);
            adjacency[v].insert(u);
        }
        let partitions = vec![vec![0], vec![1], vec![2]];
        assert!(enumerate_transversal_cliques(&partitions, &adjacency).is_empty());

        adjacency[0].insert(2);
        adjacency[2].insert(0);
        assert_eq!(
            enumerate_transversal_cliques(&partitions, &adjacency),
            vec![vec![0, 1, 2]]
        );
    }

    proptest! {
        #[test]
        fn prop_matches_brute_force(
            sizes in prop::collection::vec(0usize..4, 1..5),
            edges in prop::collection::vec(any::<bool>(), 1..64),
        ) {
            let (partitions, adjacency) = graph(&sizes, &edges);

            let mut found = enumerate_transversal_cliques(&partitions, adjacency.as_slice());
            let mut expected = brute_force(&partitions, &adjacency);
            found.sort();
            expected.sort();

            let mut deduped = found.clone();
            deduped.dedup();
            prop_assert_eq!(deduped.len(), found.len());
            prop_assert_eq!(found, expected);
        }
    }
}
