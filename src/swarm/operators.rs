//! Permutation operators used by the swarm.
//!
//! All operators take a tour (a permutation of the non-depot cities) and
//! return new tours that are again permutations.
//!
//! # Mutation
//!
//! - [`mutate`]: one of rotate-insert, swap, or segment reversal, chosen by
//!   two independent draws
//! - [`reverse_mutation`]: segment reversal only (2-opt move)
//!
//! # Crossover
//!
//! - [`crossover`]: two-child ordered crossover with a post-crossover
//!   reversal on each child
//! - [`ordered_child`]: the deterministic child construction
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Croes (1958), "A method for solving traveling salesman problems"

use crate::Tour;
use rand::Rng;

/// Probability of the rotate-insert branch of [`mutate`].
pub const ROTATE_INSERT_PROBABILITY: f64 = 0.2;

/// Probability of the swap branch of [`mutate`], drawn only after the
/// rotate-insert draw fails.
pub const SWAP_PROBABILITY: f64 = 0.2;

// ============================================================================
// Mutation operators
// ============================================================================

/// One of the three segment moves [`mutate`] can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationMove {
    /// Rotate `[point1, point2]` right by one: the element at `point2`
    /// moves to `point1` and the rest shift right.
    RotateInsert,
    /// Swap the elements at `point1` and `point2`.
    Swap,
    /// Reverse `[point1, point2]`.
    Reverse,
}

impl MutationMove {
    pub const ALL: [MutationMove; 3] = [Self::RotateInsert, Self::Swap, Self::Reverse];

    /// Applies the move in place.
    ///
    /// # Panics
    /// Panics if `point1 > point2` or `point2 >= tour.len()`.
    pub fn apply(self, tour: &mut [usize], point1: usize, point2: usize) {
        match self {
            Self::RotateInsert => tour[point1..=point2].rotate_right(1),
            Self::Swap => tour.swap(point1, point2),
            Self::Reverse => tour[point1..=point2].reverse(),
        }
    }
}

/// Mutates a copy of `tour`.
///
/// Draws `point1 < point2`, then applies
///
/// 1. [`MutationMove::RotateInsert`] with probability
///    [`ROTATE_INSERT_PROBABILITY`];
/// 2. else, with an independent draw of [`SWAP_PROBABILITY`],
///    [`MutationMove::Swap`];
/// 3. else [`MutationMove::Reverse`].
///
/// The effective branch probabilities are therefore 0.2, 0.16 and 0.64.
/// Tours shorter than 2 are returned unchanged.
///
/// # Complexity
/// O(n)
pub fn mutate<R: Rng>(tour: &[usize], rng: &mut R) -> Tour {
    let mut child = tour.to_vec();
    if child.len() < 2 {
        return child;
    }
    let (point1, point2) = ordered_points(child.len(), rng);

    let mv = if rng.random_range(0.0..1.0) < ROTATE_INSERT_PROBABILITY {
        MutationMove::RotateInsert
    } else if rng.random_range(0.0..1.0) < SWAP_PROBABILITY {
        MutationMove::Swap
    } else {
        MutationMove::Reverse
    };
    mv.apply(&mut child, point1, point2);
    child
}

/// Reverses a random segment `[point1, point2]` of `tour` in place.
///
/// # Complexity
/// O(n) worst case for segment reversal
pub fn reverse_mutation<R: Rng>(tour: &mut [usize], rng: &mut R) {
    if tour.len() < 2 {
        return;
    }
    let (point1, point2) = ordered_points(tour.len(), rng);
    tour[point1..=point2].reverse();
}

// ============================================================================
// Crossover operators
// ============================================================================

/// Two-child ordered crossover.
///
/// Draws cut points `0 < point1 < point2 < n - 1`, builds the son from dad's
/// center and mom's order ([`ordered_child`]), the daughter from mom's center
/// and dad's order, then applies [`reverse_mutation`] to each child.
///
/// Tours shorter than 4 have no strictly internal center; the children are
/// then reversed copies of the parents.
///
/// # Panics
/// Panics if the parents have different lengths.
pub fn crossover<R: Rng>(dad: &[usize], mom: &[usize], rng: &mut R) -> (Tour, Tour) {
    let n = dad.len();
    assert_eq!(n, mom.len(), "parents must have equal length");

    let (mut son, mut daughter) = if n < 4 {
        (dad.to_vec(), mom.to_vec())
    } else {
        let (point1, point2) = internal_points(n, rng);
        (
            ordered_child(dad, mom, point1, point2),
            ordered_child(mom, dad, point1, point2),
        )
    };

    reverse_mutation(&mut son, rng);
    reverse_mutation(&mut daughter, rng);
    (son, daughter)
}

/// Builds one child: `template[point1..=point2]` as the center, the rest
/// filled in `donor` order.
///
/// The right region is filled first by scanning `donor` circularly from
/// `point2 + 1`; the left region is filled by scanning `donor` from index 0.
/// Both scans skip cities already placed, so the three regions partition
/// the city set.
///
/// With `template == donor` the child equals the parent.
///
/// # Panics
/// Panics if the parents differ in length or `point1 > point2` or
/// `point2 >= n`.
pub fn ordered_child(template: &[usize], donor: &[usize], point1: usize, point2: usize) -> Tour {
    let n = template.len();
    assert_eq!(n, donor.len(), "parents must have equal length");
    assert!(point1 <= point2 && point2 < n, "invalid cut points");

    let bound = template.iter().copied().max().map_or(0, |m| m + 1);
    let mut placed = vec![false; bound];

    let center = &template[point1..=point2];
    for &city in center {
        placed[city] = true;
    }

    let right_len = n - 1 - point2;
    let mut right = Vec::with_capacity(right_len);
    let mut j = point2 + 1;
    while right.len() < right_len {
        if j == n {
            j = 0;
        }
        let city = donor[j];
        j += 1;
        if !placed[city] {
            placed[city] = true;
            right.push(city);
        }
    }

    let mut child = Vec::with_capacity(n);
    for &city in donor {
        if child.len() == point1 {
            break;
        }
        if !placed[city] {
            placed[city] = true;
            child.push(city);
        }
    }
    child.extend_from_slice(center);
    child.extend(right);
    child
}

// ============================================================================
// Helpers
// ============================================================================

/// Draws `point1 < point2` in `0..n` by rejection sampling.
///
/// Requires `n >= 2`. Each attempt succeeds with probability
/// `(n - 1) / (2n)`, so about two to three attempts are expected.
fn ordered_points<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    loop {
        let a = rng.random_range(0..n);
        let b = rng.random_range(0..n);
        if a < b {
            return (a, b);
        }
    }
}

/// Draws `0 < point1 < point2 < n - 1` by rejection sampling.
///
/// Requires `n >= 4`. For large `n` roughly half the attempts succeed; the
/// worst case `n = 4` accepts one pair in sixteen.
fn internal_points<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    loop {
        let (a, b) = (rng.random_range(0..n), rng.random_range(0..n));
        if a < b && a != 0 && b != n - 1 {
            return (a, b);
        }
    }
}

/// The move that turns `from` into `to`, if `to` is exactly one
/// [`MutationMove`] away. Cut points are the first and last differing
/// positions, which every move on distinct cities changes.
#[cfg(test)]
pub(crate) fn single_move(from: &[usize], to: &[usize]) -> Option<MutationMove> {
    let point1 = from.iter().zip(to).position(|(a, b)| a != b)?;
    let point2 = from.iter().zip(to).rposition(|(a, b)| a != b)?;
    MutationMove::ALL.into_iter().find(|mv| {
        let mut moved = from.to_vec();
        mv.apply(&mut moved, point1, point2);
        moved == to
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use u_numflow::random::create_rng;

    /// Check that a slice is a permutation of 1..=n.
    fn is_valid_tour(tour: &[usize], n: usize) -> bool {
        if tour.len() != n {
            return false;
        }
        let set: HashSet<usize> = tour.iter().copied().collect();
        set.len() == n && tour.iter().all(|&v| (1..=n).contains(&v))
    }

    // ---- Mutation ----

    #[test]
    fn test_mutate_preserves_permutation() {
        let mut rng = create_rng(42);
        let tour: Vec<usize> = (1..=10).collect();
        for _ in 0..500 {
            let child = mutate(&tour, &mut rng);
            assert!(is_valid_tour(&child, 10), "invalid: {child:?}");
        }
    }

    #[test]
    fn test_mutate_always_changes_tour() {
        // Every branch moves at least two distinct elements.
        let mut rng = create_rng(3);
        let tour: Vec<usize> = (1..=8).collect();
        for _ in 0..200 {
            assert_ne!(mutate(&tour, &mut rng), tour);
        }
    }

    #[test]
    fn test_mutate_two_elements_swaps() {
        let mut rng = create_rng(1);
        for _ in 0..20 {
            assert_eq!(mutate(&[1, 2], &mut rng), vec![2, 1]);
        }
    }

    #[test]
    fn test_mutate_short_tours_unchanged() {
        let mut rng = create_rng(42);
        assert_eq!(mutate(&[1], &mut rng), vec![1]);
        assert!(mutate(&[], &mut rng).is_empty());
    }

    #[test]
    fn test_move_shapes() {
        // [a, b, c, d] on [1, 3] rotates to [a, d, b, c].
        let mut tour = vec![10, 20, 30, 40];
        MutationMove::RotateInsert.apply(&mut tour, 1, 3);
        assert_eq!(tour, vec![10, 40, 20, 30]);

        let base = vec![1, 2, 3, 4, 5];
        let shapes = [
            (MutationMove::RotateInsert, vec![1, 5, 2, 3, 4]),
            (MutationMove::Swap, vec![1, 5, 3, 4, 2]),
            (MutationMove::Reverse, vec![1, 5, 4, 3, 2]),
        ];
        for (mv, expected) in shapes {
            let mut tour = base.clone();
            mv.apply(&mut tour, 1, 4);
            assert_eq!(tour, expected, "{mv:?}");
        }
    }

    #[test]
    fn test_mutate_applies_exactly_one_move() {
        let mut rng = create_rng(17);
        let tour: Vec<usize> = (1..=8).collect();
        let mut rotations = 0;
        for _ in 0..2000 {
            let child = mutate(&tour, &mut rng);
            let mv = single_move(&tour, &child);
            assert!(mv.is_some(), "not a single move: {child:?}");
            // On segments of 3+ cities only the rotate-insert shape matches.
            let p1 = tour.iter().zip(&child).position(|(a, b)| a != b);
            let p2 = tour.iter().zip(&child).rposition(|(a, b)| a != b);
            if let (Some(p1), Some(p2), Some(MutationMove::RotateInsert)) = (p1, p2, mv) {
                if p2 - p1 >= 2 {
                    assert_eq!(child[p1], tour[p2]);
                    rotations += 1;
                }
            }
        }
        // About 0.2 * 2000 draws, most of them on segments of 3+ cities.
        assert!(rotations > 100, "rotate-insert seen {rotations} times");
    }

    #[test]
    fn test_reverse_mutation_preserves_permutation() {
        let mut rng = create_rng(42);
        for _ in 0..200 {
            let mut tour: Vec<usize> = (1..=9).collect();
            reverse_mutation(&mut tour, &mut rng);
            assert!(is_valid_tour(&tour, 9));
        }
    }

    // ---- Crossover ----

    #[test]
    fn test_crossover_produces_valid_children() {
        let mut rng = create_rng(42);
        let dad: Vec<usize> = (1..=12).collect();
        let mom: Vec<usize> = (1..=12).rev().collect();
        for _ in 0..200 {
            let (son, daughter) = crossover(&dad, &mom, &mut rng);
            assert!(is_valid_tour(&son, 12), "son invalid: {son:?}");
            assert!(is_valid_tour(&daughter, 12), "daughter invalid: {daughter:?}");
        }
    }

    #[test]
    fn test_crossover_short_tours() {
        let mut rng = create_rng(42);
        for n in 1..4 {
            let dad: Vec<usize> = (1..=n).collect();
            let mom: Vec<usize> = (1..=n).rev().collect();
            for _ in 0..20 {
                let (son, daughter) = crossover(&dad, &mom, &mut rng);
                assert!(is_valid_tour(&son, n));
                assert!(is_valid_tour(&daughter, n));
            }
        }
    }

    #[test]
    #[should_panic(expected = "equal length")]
    fn test_crossover_length_mismatch_panics() {
        let mut rng = create_rng(42);
        crossover(&[1, 2, 3, 4], &[1, 2, 3], &mut rng);
    }

    #[test]
    fn test_ordered_child_identical_parents_reproduce_parent() {
        let dad = vec![5, 3, 8, 1, 7, 2, 6, 4];
        for point1 in 1..dad.len() - 1 {
            for point2 in point1 + 1..dad.len() - 1 {
                assert_eq!(ordered_child(&dad, &dad, point1, point2), dad);
            }
        }
    }

    #[test]
    fn test_ordered_child_known_layout() {
        let dad = vec![1, 2, 3, 4, 5, 6, 7];
        let mom = vec![7, 6, 5, 4, 3, 2, 1];
        // center = dad[2..=4] = [3, 4, 5]
        // right (2 slots): scan mom from 5 → 2, 1
        // left (2 slots): scan mom from 0 → 7, 6
        assert_eq!(ordered_child(&dad, &mom, 2, 4), vec![7, 6, 3, 4, 5, 2, 1]);
    }

    #[test]
    fn test_ordered_child_right_fill_wraps() {
        let dad = vec![1, 2, 3, 4, 5, 6];
        let mom = vec![6, 5, 1, 2, 3, 4];
        // center = dad[1..=3] = [2, 3, 4]
        // right (2 slots): mom[4] = 3 skip, mom[5] = 4 skip, wrap: 6, 5
        // left (1 slot): mom from 0 → 1
        assert_eq!(ordered_child(&dad, &mom, 1, 3), vec![1, 2, 3, 4, 6, 5]);
    }

    #[test]
    fn test_internal_points_bounds() {
        let mut rng = create_rng(42);
        for _ in 0..1000 {
            let (a, b) = internal_points(10, &mut rng);
            assert!(0 < a && a < b && b < 9);
        }
        let (a, b) = internal_points(4, &mut rng);
        assert_eq!((a, b), (1, 2));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use u_numflow::random::create_rng;

    fn sorted(tour: &[usize]) -> Vec<usize> {
        let mut v = tour.to_vec();
        v.sort_unstable();
        v
    }

    proptest! {
        /// Mutation keeps the city set for any length and seed.
        #[test]
        fn prop_mutate_is_permutation(n in 0usize..40, seed in any::<u64>()) {
            let mut rng = create_rng(seed);
            let tour: Vec<usize> = (1..=n).collect();
            let child = mutate(&tour, &mut rng);
            prop_assert_eq!(sorted(&child), tour);
        }

        /// Both crossover children are permutations of the parents' cities.
        #[test]
        fn prop_crossover_children_are_permutations(n in 4usize..40, seed in any::<u64>()) {
            let mut rng = create_rng(seed);
            let expected: Vec<usize> = (1..=n).collect();
            let mut dad = expected.clone();
            let mut mom = expected.clone();
            reverse_mutation(&mut dad, &mut rng);
            mom.rotate_left(seed as usize % n);

            let (son, daughter) = crossover(&dad, &mom, &mut rng);
            prop_assert_eq!(sorted(&son), expected.clone());
            prop_assert_eq!(sorted(&daughter), expected);
        }

        /// Identical parents reproduce the parent for any valid cut.
        #[test]
        fn prop_ordered_child_fixed_point(n in 4usize..30, a in 0usize..30, b in 0usize..30) {
            let (x, y) = (a % n, b % n);
            let (point1, point2) = (x.min(y), x.max(y));
            let parent: Vec<usize> = (1..=n).rev().collect();
            prop_assert_eq!(ordered_child(&parent, &parent, point1, point2), parent);
        }
    }
}
