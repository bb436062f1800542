//! Particle state and the global-best snapshot.

use crate::Tour;
use std::collections::VecDeque;

/// Fixed-capacity FIFO of recently adopted tours.
///
/// Membership is by value. The oldest tour is evicted first.
#[derive(Debug, Clone)]
pub struct TourHistory {
    tours: VecDeque<Tour>,
    capacity: usize,
}

impl TourHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            tours: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Evicts the oldest tour if the history is full.
    pub fn make_room(&mut self) {
        while self.tours.len() >= self.capacity {
            if self.tours.pop_front().is_none() {
                break;
            }
        }
    }

    /// Appends a tour, evicting the oldest if full.
    pub fn push(&mut self, tour: Tour) {
        self.make_room();
        self.tours.push_back(tour);
    }

    pub fn contains(&self, tour: &[usize]) -> bool {
        self.tours.iter().any(|t| t.as_slice() == tour)
    }

    pub fn len(&self) -> usize {
        self.tours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// One candidate tour with its personal best and recent history.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Tour the particle currently sits on.
    pub current: Tour,
    /// Cost of `current`.
    pub current_cost: f64,
    /// Personal best. May be worse than `current` after an annealing-style
    /// acceptance.
    pub personal_best: Tour,
    /// Cost of `personal_best`.
    pub personal_best_cost: f64,
    /// Recently adopted tours; a neighbor already in here is not adopted.
    pub history: TourHistory,
}

impl Particle {
    /// Creates a particle whose personal best is its starting tour.
    pub fn new(tour: Tour, cost: f64, history_capacity: usize) -> Self {
        Self {
            personal_best: tour.clone(),
            personal_best_cost: cost,
            current: tour,
            current_cost: cost,
            history: TourHistory::new(history_capacity),
        }
    }
}

/// Value snapshot of the best particle seen so far.
///
/// Never aliases a live particle: it is replaced wholesale when a particle
/// improves on it, so readers within an iteration always see a frozen value.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalBest {
    /// The particle's current tour at capture time.
    pub current: Tour,
    pub current_cost: f64,
    /// Best tour of the snapshot: the cheaper of the particle's current
    /// tour and personal best at capture time.
    pub personal_best: Tour,
    pub personal_best_cost: f64,
    /// Index of the particle in the live population that produced this
    /// snapshot. Cleared when the population is re-seeded.
    pub holder: Option<usize>,
}

impl GlobalBest {
    /// Captures `particle` at population index `index`.
    pub fn capture(particle: &Particle, index: usize) -> Self {
        let (personal_best, personal_best_cost) =
            if particle.current_cost < particle.personal_best_cost {
                (particle.current.clone(), particle.current_cost)
            } else {
                (particle.personal_best.clone(), particle.personal_best_cost)
            };
        Self {
            current: particle.current.clone(),
            current_cost: particle.current_cost,
            personal_best,
            personal_best_cost,
            holder: Some(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = TourHistory::new(2);
        history.push(vec![1, 2, 3]);
        history.push(vec![1, 3, 2]);
        history.push(vec![2, 1, 3]);
        assert_eq!(history.len(), 2);
        assert!(!history.contains(&[1, 2, 3]));
        assert!(history.contains(&[1, 3, 2]));
        assert!(history.contains(&[2, 1, 3]));
    }

    #[test]
    fn test_history_make_room() {
        let mut history = TourHistory::new(2);
        history.push(vec![1, 2]);
        history.make_room();
        assert_eq!(history.len(), 1);
        history.push(vec![2, 1]);
        history.make_room();
        assert_eq!(history.len(), 1);
        assert!(history.contains(&[2, 1]));
    }

    #[test]
    fn test_particle_new() {
        let p = Particle::new(vec![2, 1, 3], 12.5, 100);
        assert_eq!(p.current, p.personal_best);
        assert_eq!(p.current_cost, p.personal_best_cost);
        assert!(p.history.is_empty());
        assert_eq!(p.history.capacity(), 100);
    }

    #[test]
    fn test_capture_prefers_cheaper_tour() {
        let mut p = Particle::new(vec![1, 2, 3], 10.0, 10);
        p.personal_best = vec![3, 2, 1];
        p.personal_best_cost = 14.0;

        let snapshot = GlobalBest::capture(&p, 4);
        assert_eq!(snapshot.personal_best, vec![1, 2, 3]);
        assert_eq!(snapshot.personal_best_cost, 10.0);
        assert_eq!(snapshot.holder, Some(4));

        p.personal_best_cost = 8.0;
        let snapshot = GlobalBest::capture(&p, 0);
        assert_eq!(snapshot.personal_best, vec![3, 2, 1]);
        assert_eq!(snapshot.personal_best_cost, 8.0);
    }

    #[test]
    fn test_snapshot_is_independent_of_particle() {
        let mut p = Particle::new(vec![1, 2, 3], 10.0, 10);
        let snapshot = GlobalBest::capture(&p, 0);
        p.current = vec![3, 1, 2];
        p.current_cost = 1.0;
        assert_eq!(snapshot.current, vec![1, 2, 3]);
        assert_eq!(snapshot.current_cost, 10.0);
    }
}
