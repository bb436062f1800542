//! Hybrid particle-swarm / genetic solver for the travelling salesman problem.
//!
//! - **Cost**: dense cost matrix and the oracle that evaluates closed
//!   circuits through a fixed depot (location 0).
//! - **Swarm**: particle-swarm search whose moves are mutation and ordered
//!   crossover, with annealing-style acceptance of worse personal bests and
//!   epoch-level re-seeding.
//! - **Constructive**: Clarke-Wright savings construction, used to seed the
//!   first epoch.
//!
//! # Tours
//!
//! A [`Tour`] is a permutation of the non-depot cities `1..n`. The depot is
//! implicit at both ends: a tour `[3, 1, 2]` is the circuit `0 → 3 → 1 → 2 → 0`.
//!
//! # Example
//!
//! ```
//! use u_swarm_tsp::cost::CostMatrix;
//! use u_swarm_tsp::swarm::{SwarmConfig, SwarmRunner};
//!
//! let points: [(f64, f64); 5] = [(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0), (1.0, -1.0)];
//! let matrix = CostMatrix::from_fn(points.len(), |i, j| {
//!     let (dx, dy) = (points[i].0 - points[j].0, points[i].1 - points[j].1);
//!     (dx * dx + dy * dy).sqrt()
//! })
//! .unwrap();
//!
//! let config = SwarmConfig::for_instance(points.len())
//!     .with_iterations(50)
//!     .with_max_epochs(10)
//!     .with_seed(42);
//! let result = SwarmRunner::run(matrix, &config).unwrap();
//! assert_eq!(result.best_tour.len(), 4);
//! ```

pub mod constructive;
pub mod cost;
pub mod error;
pub mod swarm;

pub use error::{Result, SwarmError};

/// Ordered non-depot cities of a closed circuit.
pub type Tour = Vec<usize>;
