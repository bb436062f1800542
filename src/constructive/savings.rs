//! Greedy single-tour construction from Clarke-Wright savings.
//!
//! # Algorithm
//!
//! For every ordered pair of non-depot cities compute
//!
//! ```text
//! s(i, j) = c(i, 0) + c(0, j) - c(i, j)
//! ```
//!
//! and sort the pairs by decreasing savings. The tour starts with the
//! highest-savings pair and is then extended one city at a time: from the
//! current last city, follow the highest remaining pair that leads to an
//! unplaced city.
//!
//! # Complexity
//!
//! O(n² log n), dominated by sorting the savings.
//!
//! # Reference
//!
//! Clarke, G. & Wright, J.W. (1964). "Scheduling of Vehicles from a Central
//! Depot to a Number of Delivery Points", *Operations Research* 12(4), 568-581.

use crate::cost::{CostOracle, DEPOT};
use crate::error::{Result, SwarmError};
use crate::Tour;

/// Savings of travelling `from → to` directly instead of via the depot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsEntry {
    pub from: usize,
    pub to: usize,
    pub value: f64,
}

/// All ordered pairs `(i, j)`, `i != j`, of non-depot cities, sorted by
/// decreasing savings.
///
/// The sort is stable: equal savings keep their construction order
/// (row-major over `from`, then `to`).
pub fn savings_list(oracle: &CostOracle) -> Vec<SavingsEntry> {
    let n = oracle.num_cities();
    let mut savings = Vec::with_capacity(n.saturating_sub(1) * n.saturating_sub(2));
    for from in 1..n {
        for to in 1..n {
            if from == to {
                continue;
            }
            let value = oracle.cost(from, DEPOT) + oracle.cost(DEPOT, to) - oracle.cost(from, to);
            savings.push(SavingsEntry { from, to, value });
        }
    }
    savings.sort_by(|a, b| b.value.total_cmp(&a.value));
    savings
}

/// Builds a tour greedily from the savings list.
///
/// # Errors
///
/// Returns [`SwarmError::SavingsExhaustion`] if no pair leads from the
/// current last city to an unplaced one. The full ordered-pair list always
/// offers such a pair, so this only guards the construction invariant.
///
/// # Examples
///
/// ```
/// use u_swarm_tsp::cost::{CostMatrix, CostOracle};
/// use u_swarm_tsp::constructive::savings_tour;
///
/// // Depot at x = 0, cities at x = 1, 2, 3.
/// let cm = CostMatrix::from_fn(4, |i, j| (i as f64 - j as f64).abs()).unwrap();
/// let oracle = CostOracle::new(cm);
/// let tour = savings_tour(&oracle).unwrap();
/// assert_eq!(oracle.evaluate_cost(&tour), 6.0);
/// ```
pub fn savings_tour(oracle: &CostOracle) -> Result<Tour> {
    let n = oracle.num_cities();
    let len = oracle.tour_len();
    if len <= 1 {
        return Ok((1..n).collect());
    }

    let savings = savings_list(oracle);

    // Outgoing pairs per city, in global savings order.
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); n];
    for entry in &savings {
        outgoing[entry.from].push(entry.to);
    }

    let first = savings[0];
    let mut tour = Vec::with_capacity(len);
    let mut placed = vec![false; n];
    for city in [first.from, first.to] {
        tour.push(city);
        placed[city] = true;
    }

    while tour.len() < len {
        let last = tour[tour.len() - 1];
        let next = outgoing[last]
            .iter()
            .copied()
            .find(|&to| !placed[to])
            .ok_or(SwarmError::SavingsExhaustion {
                last,
                placed: tour.len(),
            })?;
        placed[next] = true;
        tour.push(next);
    }

    Ok(tour)
}
