//! Error types for the swarm solver.
//!
//! Every variant is fatal at the point of detection: the solver never
//! retries internally and a failed run returns no partial result.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SwarmError>;

/// Unified error type for solver construction and execution.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SwarmError {
    /// A tour is not a permutation of the non-depot cities.
    ///
    /// Indicates an operator defect, not a recoverable condition.
    #[error("invalid tour: {reason}")]
    InvalidTour {
        /// What was wrong with the tour.
        reason: String,
    },

    /// Population generation yielded no tours at all.
    #[error("population generation produced no tours (requested {requested})")]
    EmptyPopulation {
        /// Number of tours that were requested.
        requested: usize,
    },

    /// The savings constructor found no continuation edge.
    #[error("savings construction stalled at city {last} after placing {placed} cities")]
    SavingsExhaustion {
        /// Last city of the partial tour.
        last: usize,
        /// Number of cities placed so far.
        placed: usize,
    },

    /// Invalid solver configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed cost matrix.
    #[error("invalid cost matrix: {0}")]
    InvalidMatrix(String),
}
