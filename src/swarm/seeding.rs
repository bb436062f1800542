//! Population seeding and population statistics.
//!
//! Two selection criteria are used on purpose:
//!
//! - [`most_diverse_population`] (highest mean Hamming distance) builds the
//!   swarm once, at construction;
//! - [`cheapest_population`] (lowest average cost) re-seeds it every epoch.

use crate::cost::CostOracle;
use crate::error::{Result, SwarmError};
use crate::Tour;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;
use u_numflow::stats::mean;

/// Number of positions at which two tours differ.
///
/// # Panics
/// Panics if the tours differ in length.
pub fn hamming(a: &[usize], b: &[usize]) -> usize {
    assert_eq!(a.len(), b.len(), "tours must have equal length");
    a.iter().zip(b).filter(|(x, y)| x != y).count()
}

/// Mean Hamming distance over all ordered pairs of value-distinct tours.
///
/// Returns 0.0 when no such pair exists (empty, single-element, or
/// all-equal populations). Higher means more diverse.
///
/// # Complexity
/// O(p² · n) for p tours of length n
pub fn diversity(population: &[Tour]) -> f64 {
    let row = |a: &Tour| -> (usize, usize) {
        population
            .iter()
            .filter(|b| *b != a)
            .fold((0, 0), |(sum, count), b| (sum + hamming(a, b), count + 1))
    };

    #[cfg(feature = "parallel")]
    let (sum, count) = population
        .par_iter()
        .map(row)
        .reduce(|| (0, 0), |x, y| (x.0 + y.0, x.1 + y.1));
    #[cfg(not(feature = "parallel"))]
    let (sum, count) = population
        .iter()
        .map(row)
        .fold((0, 0), |x, y| (x.0 + y.0, x.1 + y.1));

    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// Mean circuit cost of the population; `+∞` when empty.
pub fn average_cost(oracle: &CostOracle, population: &[Tour]) -> f64 {
    // Costs are collected before summing so the parallel path adds them in
    // the same order as the sequential one.
    #[cfg(feature = "parallel")]
    let costs: Vec<f64> = population
        .par_iter()
        .map(|t| oracle.evaluate_cost(t))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let costs: Vec<f64> = population.iter().map(|t| oracle.evaluate_cost(t)).collect();

    mean(&costs).unwrap_or(f64::INFINITY)
}

/// Generates `candidates` random populations and keeps the most diverse.
///
/// The first population wins ties. Fails with
/// [`SwarmError::EmptyPopulation`] if the kept population is empty.
pub fn most_diverse_population<R: Rng>(
    oracle: &CostOracle,
    size: usize,
    candidates: usize,
    rng: &mut R,
) -> Result<Vec<Tour>> {
    select_population(oracle, size, candidates, rng, |pop| -diversity(pop))
}

/// Generates `candidates` random populations and keeps the one with the
/// lowest average cost.
///
/// The first population wins ties. Fails with
/// [`SwarmError::EmptyPopulation`] if the kept population is empty.
pub fn cheapest_population<R: Rng>(
    oracle: &CostOracle,
    size: usize,
    candidates: usize,
    rng: &mut R,
) -> Result<Vec<Tour>> {
    select_population(oracle, size, candidates, rng, |pop| average_cost(oracle, pop))
}

/// Keeps the candidate with the strictly lowest `score`.
fn select_population<R, F>(
    oracle: &CostOracle,
    size: usize,
    candidates: usize,
    rng: &mut R,
    score: F,
) -> Result<Vec<Tour>>
where
    R: Rng,
    F: Fn(&[Tour]) -> f64,
{
    let mut best = oracle.random_population(size, rng);
    let mut best_score = score(&best);

    for _ in 1..candidates {
        let candidate = oracle.random_population(size, rng);
        let candidate_score = score(&candidate);
        debug!(score = candidate_score, tours = candidate.len(), "candidate population");
        if candidate_score < best_score {
            best = candidate;
            best_score = candidate_score;
        }
    }

    if best.is_empty() {
        return Err(SwarmError::EmptyPopulation { requested: size });
    }
    debug!(score = best_score, tours = best.len(), "population selected");
    Ok(best)
}
