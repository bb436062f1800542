//! Tour evaluation and random tour generation over a [`CostMatrix`].

use super::matrix::CostMatrix;
use crate::error::{Result, SwarmError};
use crate::Tour;
use rand::Rng;
use std::collections::HashSet;

/// The depot location. Implicit at both ends of every tour.
pub const DEPOT: usize = 0;

/// Wraps an immutable cost matrix and answers every cost question the
/// solver asks.
///
/// A tour is the sequence of the `N - 1` non-depot cities; the depot is
/// implied at both ends of the circuit.
#[derive(Debug, Clone)]
pub struct CostOracle {
    matrix: CostMatrix,
}

impl CostOracle {
    /// Wraps a validated matrix; location 0 is the depot.
    pub fn new(matrix: CostMatrix) -> Self {
        Self { matrix }
    }

    /// Number of locations, depot included.
    pub fn num_cities(&self) -> usize {
        self.matrix.size()
    }

    /// Length of a tour: the number of non-depot cities.
    pub fn tour_len(&self) -> usize {
        self.matrix.size().saturating_sub(1)
    }

    /// Cost of the directed edge `from → to`.
    #[inline]
    pub fn cost(&self, from: usize, to: usize) -> f64 {
        self.matrix.get(from, to)
    }

    /// The underlying cost matrix.
    pub fn matrix(&self) -> &CostMatrix {
        &self.matrix
    }

    /// Circuit cost: depot → tour\[0\] → … → tour\[n-1\] → depot.
    ///
    /// Does not validate the tour; an empty tour costs 0.
    ///
    /// # Complexity
    /// O(n)
    pub fn evaluate_cost(&self, tour: &[usize]) -> f64 {
        let (first, last) = match (tour.first(), tour.last()) {
            (Some(&f), Some(&l)) => (f, l),
            _ => return 0.0,
        };
        let inner: f64 = tour.windows(2).map(|w| self.cost(w[0], w[1])).sum();
        inner + self.cost(DEPOT, first) + self.cost(last, DEPOT)
    }

    /// Builds a uniformly random tour by rejection sampling.
    ///
    /// Each position draws a city from `1..N` and redraws while the city is
    /// already used. Expected O(n log n) draws (coupon collector).
    pub fn random_tour<R: Rng>(&self, rng: &mut R) -> Tour {
        let n = self.num_cities();
        let mut visited = vec![false; n];
        let mut tour = Vec::with_capacity(self.tour_len());
        while tour.len() < self.tour_len() {
            let mut city = rng.random_range(1..n);
            while visited[city] {
                city = rng.random_range(1..n);
            }
            visited[city] = true;
            tour.push(city);
        }
        tour
    }

    /// Generates up to `size` random tours, dropping exact duplicates.
    ///
    /// On tiny instances the result may hold fewer than `size` tours.
    pub fn random_population<R: Rng>(&self, size: usize, rng: &mut R) -> Vec<Tour> {
        let mut seen = HashSet::with_capacity(size);
        let mut population = Vec::with_capacity(size);
        for _ in 0..size {
            let tour = self.random_tour(rng);
            if seen.insert(tour.clone()) {
                population.push(tour);
            }
        }
        population
    }

    /// Checks that `tour` is a permutation of `1..N`.
    pub fn check_tour(&self, tour: &[usize]) -> Result<()> {
        if tour.len() != self.tour_len() {
            return Err(SwarmError::InvalidTour {
                reason: format!("length {} but expected {}", tour.len(), self.tour_len()),
            });
        }
        let mut seen = vec![false; self.num_cities()];
        for &city in tour {
            if city == DEPOT || city >= self.num_cities() {
                return Err(SwarmError::InvalidTour {
                    reason: format!("city {city} is out of range 1..{}", self.num_cities()),
                });
            }
            if seen[city] {
                return Err(SwarmError::InvalidTour {
                    reason: format!("city {city} appears more than once"),
                });
            }
            seen[city] = true;
        }
        Ok(())
    }
}
