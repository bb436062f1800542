//! Hybrid particle-swarm / genetic search for the TSP.
//!
//! Each particle carries a current tour, a personal best and a short
//! history of adopted tours. Particles move by mutation (insertion, swap,
//! reversal) and by ordered crossover with either the global best or the
//! particle least like it. Worse personal bests are occasionally accepted
//! with a probability that decays over epochs, as in simulated annealing.
//!
//! # Particle update
//!
//! For particle `i`, in order:
//!
//! 1. If `i` is not the global-best holder but sits on the global-best
//!    tour, mutate it away.
//! 2. Make room in the history.
//! 3. Draw a mutated neighbor of the current tour.
//! 4. With probability `beta` cross with the global best; otherwise, with
//!    probability `alfa`, cross with the most dissimilar particle. Keep the
//!    cheaper child (or the current tour if no crossover happened).
//! 5. The cheaper of neighbor and child is the candidate.
//! 6. Adopt the candidate if it beats the cost `i` had at step 1 and is
//!    not in the history.
//! 7. Replace the personal best with the candidate if it is cheaper, or
//!    with the epoch-decayed acceptance probability otherwise.
//! 8. If the current cost beats the global best, snapshot `i`.
//!
//! # Epochs
//!
//! Every epoch re-seeds the swarm with the cheapest of several random
//! populations and plants a mutated copy of the previous epoch's best tour
//! at particle 0. The first epoch runs `warmup_factor` times as many
//! iterations. The run stops at `max_epochs`, when the best cost stays
//! flat for `epoch_stop` epochs, or on cancellation.
//!
//! # References
//!
//! - Kennedy, J. & Eberhart, R. (1995). "Particle swarm optimization",
//!   *Proc. ICNN'95* 4, 1942-1948.
//! - Davis, L. (1985). "Applying adaptive algorithms to epistatic domains",
//!   *Proc. IJCAI* 85, 162-164. (ordered crossover)
//! - Kirkpatrick, S., Gelatt, C.D. & Vecchi, M.P. (1983). "Optimization by
//!   Simulated Annealing", *Science* 220(4598), 671-680.

mod config;
pub mod operators;
mod runner;
mod schedule;
pub mod seeding;
mod types;

pub use config::SwarmConfig;
pub use runner::{IterationSample, Solver, SwarmResult, SwarmRunner};
pub use schedule::mutation_probability;
pub use types::{GlobalBest, Particle, TourHistory};
