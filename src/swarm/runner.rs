//! Swarm execution loop.
//!
//! [`Solver`] owns the particles, the global-best snapshot and the random
//! generator, and drives epochs:
//! re-seed → insert elite → iterate particles → record convergence sample.

use super::config::SwarmConfig;
use super::operators::{crossover, mutate};
use super::schedule::mutation_probability;
use super::seeding::{cheapest_population, hamming, most_diverse_population};
use super::types::{GlobalBest, Particle};
use crate::constructive::savings_tour;
use crate::cost::{CostMatrix, CostOracle};
use crate::error::{Result, SwarmError};
use crate::Tour;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use u_numflow::random::create_rng;
use u_numflow::stats::{mean, population_std_dev};

/// Swarm statistics captured every `sample_interval` iterations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationSample {
    pub epoch: usize,
    /// Iteration index within the epoch.
    pub iteration: usize,
    pub global_best_cost: f64,
    pub mean_personal_best_cost: f64,
    pub std_personal_best_cost: f64,
}

/// Result of a swarm run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwarmResult {
    /// Best tour found (depot excluded).
    pub best_tour: Tour,

    /// Circuit cost of `best_tour`.
    pub best_cost: f64,

    /// Number of completed epochs.
    pub epochs: usize,

    /// Whether the run stopped on the zero-deviation convergence test.
    pub converged: bool,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Global best cost at the end of each epoch.
    pub convergence_samples: Vec<f64>,

    /// Periodic swarm statistics.
    pub iteration_samples: Vec<IterationSample>,
}

/// Hybrid particle-swarm / genetic TSP solver.
///
/// All randomness comes from the single generator `R` handed to
/// [`Solver::new`]. Particles are updated strictly in order, so a particle
/// sees any global-best improvement made by earlier particles in the same
/// iteration.
///
/// # Usage
///
/// ```
/// use u_swarm_tsp::cost::CostMatrix;
/// use u_swarm_tsp::swarm::{Solver, SwarmConfig};
/// use u_numflow::random::create_rng;
///
/// let matrix = CostMatrix::from_fn(6, |i, j| (i as f64 - j as f64).abs()).unwrap();
/// let config = SwarmConfig::default()
///     .with_iterations(20)
///     .with_max_epochs(5);
///
/// let mut solver = Solver::new(matrix, config, create_rng(42)).unwrap();
/// solver.run().unwrap();
/// assert_eq!(solver.global_best_tour().len(), 5);
/// assert!(solver.global_best_cost() >= 10.0);
/// ```
pub struct Solver<R: Rng> {
    oracle: CostOracle,
    config: SwarmConfig,
    rng: R,
    particles: Vec<Particle>,
    global_best: GlobalBest,
    elite: Option<Tour>,
    epoch: usize,
    convergence_samples: Vec<f64>,
    iteration_samples: Vec<IterationSample>,
    converged: bool,
    cancelled: bool,
}

impl<R: Rng> Solver<R> {
    /// Builds the solver and its initial swarm.
    ///
    /// The initial swarm is the most diverse of `candidate_populations`
    /// random populations; the global best starts as the particle with the
    /// lowest personal-best cost.
    ///
    /// # Errors
    ///
    /// - [`SwarmError::InvalidConfig`] if `config` fails validation
    /// - [`SwarmError::InvalidMatrix`] if the matrix has no non-depot city
    /// - [`SwarmError::EmptyPopulation`] if no tour could be generated
    pub fn new(matrix: CostMatrix, config: SwarmConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        if matrix.size() < 2 {
            return Err(SwarmError::InvalidMatrix(format!(
                "need a depot and at least one city, got {} locations",
                matrix.size()
            )));
        }

        let oracle = CostOracle::new(matrix);
        let tours = most_diverse_population(
            &oracle,
            config.population_size,
            config.candidate_populations,
            &mut rng,
        )?;
        let particles = make_particles(&oracle, tours, config.history_capacity);

        let (index, best) = particles
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.personal_best_cost.total_cmp(&b.1.personal_best_cost))
            .ok_or(SwarmError::EmptyPopulation {
                requested: config.population_size,
            })?;
        let global_best = GlobalBest::capture(best, index);

        debug!(
            particles = particles.len(),
            best_cost = global_best.personal_best_cost,
            "initial swarm built"
        );

        Ok(Self {
            oracle,
            config,
            rng,
            particles,
            global_best,
            elite: None,
            epoch: 0,
            convergence_samples: Vec::new(),
            iteration_samples: Vec::new(),
            converged: false,
            cancelled: false,
        })
    }

    /// Runs the search until `max_epochs` or convergence.
    pub fn run(&mut self) -> Result<()> {
        self.run_with_cancel(None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// The flag is checked before every epoch and every iteration, never in
    /// the middle of a particle update. An epoch interrupted by cancellation
    /// is not counted and records no convergence sample.
    pub fn run_with_cancel(&mut self, cancel: Option<Arc<AtomicBool>>) -> Result<()> {
        let is_cancelled = || {
            cancel
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
        };

        while self.epoch < self.config.max_epochs && !self.converged {
            if is_cancelled() {
                self.cancelled = true;
                break;
            }

            self.reseed()?;

            let iterations = if self.epoch == 0 {
                self.config.warmup_iterations().ok_or_else(|| {
                    SwarmError::InvalidConfig("iterations * warmup_factor overflows".into())
                })?
            } else {
                self.config.iterations
            };

            for iteration in 0..iterations {
                if is_cancelled() {
                    self.cancelled = true;
                    break;
                }
                let interval = self.config.sample_interval;
                if interval > 0 && iteration.is_multiple_of(interval) {
                    self.record_sample(iteration);
                }
                for index in 0..self.particles.len() {
                    self.update_particle(index)?;
                }
            }
            if self.cancelled {
                break;
            }

            self.elite = Some(self.global_best.personal_best.clone());
            self.epoch += 1;
            self.convergence_samples
                .push(self.global_best.personal_best_cost);

            info!(
                epoch = self.epoch,
                particles = self.particles.len(),
                best_cost = self.global_best.personal_best_cost,
                "epoch complete"
            );

            if self.window_converged() {
                self.converged = true;
                info!(epoch = self.epoch, "best cost stable over window, stopping");
            }
        }

        if self.cancelled {
            warn!(epoch = self.epoch, "swarm run cancelled");
        }
        Ok(())
    }

    /// Replaces the swarm with the cheapest of several random populations,
    /// then installs the mutated elite (or savings) tour as particle 0.
    fn reseed(&mut self) -> Result<()> {
        let size = self.particles.len();
        let tours = cheapest_population(
            &self.oracle,
            size,
            self.config.candidate_populations,
            &mut self.rng,
        )?;
        self.particles = make_particles(&self.oracle, tours, self.config.history_capacity);
        self.global_best.holder = None;

        let seed_tour = if self.epoch > 0 {
            self.elite.clone()
        } else if self.config.savings_seed {
            Some(savings_tour(&self.oracle)?)
        } else {
            None
        };

        if let Some(tour) = seed_tour {
            let tour = mutate(&tour, &mut self.rng);
            self.oracle.check_tour(&tour)?;
            let cost = self.oracle.evaluate_cost(&tour);
            debug!(epoch = self.epoch, cost, "seeded particle 0");
            self.particles[0] = Particle::new(tour, cost, self.config.history_capacity);
        }
        Ok(())
    }

    /// One particle update, steps 1 to 8 of the [`crate::swarm`] docs.
    fn update_particle(&mut self, index: usize) -> Result<()> {
        let Self {
            oracle,
            config,
            rng,
            particles,
            global_best,
            epoch,
            ..
        } = self;

        let previous_cost = particles[index].current_cost;

        // Anti-stagnation: a non-holder sitting on the global best is kicked off it.
        if global_best.holder != Some(index) && particles[index].current == global_best.personal_best
        {
            let kicked = mutate(&particles[index].current, rng);
            particles[index].current_cost = oracle.evaluate_cost(&kicked);
            particles[index].current = kicked;
        }

        particles[index].history.make_room();

        let current = particles[index].current.clone();
        let current_cost = particles[index].current_cost;

        let mut best_neighbor = mutate(&current, rng);
        let mut best_neighbor_cost = oracle.evaluate_cost(&best_neighbor);

        // Independent draws: alfa is only tried once the beta draw fails.
        let mate: Option<&[usize]> = if rng.random_range(0.0..1.0) < config.beta {
            Some(global_best.personal_best.as_slice())
        } else if rng.random_range(0.0..1.0) < config.alfa {
            let far = most_dissimilar(particles, &global_best.personal_best);
            Some(particles[far].personal_best.as_slice())
        } else {
            None
        };
        let (new_solution, new_cost) = match mate {
            Some(mate) => cheaper_child(oracle, &current, mate, rng),
            None => (current, current_cost),
        };

        if new_cost < best_neighbor_cost {
            best_neighbor = new_solution;
            best_neighbor_cost = new_cost;
        }

        let particle = &mut particles[index];

        if best_neighbor_cost < previous_cost && !particle.history.contains(&best_neighbor) {
            oracle.check_tour(&best_neighbor)?;
            particle.current = best_neighbor.clone();
            particle.current_cost = best_neighbor_cost;
            particle.history.push(best_neighbor.clone());
        }

        let acceptance = if best_neighbor_cost < particle.personal_best_cost {
            1.0
        } else {
            mutation_probability(config.acceptance_probability, *epoch, config.max_epochs)
        };
        if rng.random_range(0.0..1.0) < acceptance {
            particle.personal_best = best_neighbor;
            particle.personal_best_cost = best_neighbor_cost;
        }

        if particle.current_cost < global_best.personal_best_cost {
            *global_best = GlobalBest::capture(particle, index);
        }
        Ok(())
    }

    fn record_sample(&mut self, iteration: usize) {
        let costs: Vec<f64> = self
            .particles
            .iter()
            .map(|p| p.personal_best_cost)
            .collect();
        self.iteration_samples.push(IterationSample {
            epoch: self.epoch,
            iteration,
            global_best_cost: self.global_best.personal_best_cost,
            mean_personal_best_cost: mean(&costs).unwrap_or(f64::INFINITY),
            std_personal_best_cost: population_std_dev(&costs).unwrap_or(0.0),
        });
    }

    /// True once the last `epoch_stop` samples have zero deviation.
    ///
    /// Welford's update leaves the second moment at exactly 0.0 for
    /// bit-identical samples, so a flat window always compares equal.
    fn window_converged(&self) -> bool {
        let window = self.config.epoch_stop;
        let samples = &self.convergence_samples;
        window > 0
            && samples.len() >= window
            && population_std_dev(&samples[samples.len() - window..]).unwrap_or(0.0) == 0.0
    }

    /// Best tour found so far.
    pub fn global_best_tour(&self) -> &[usize] {
        &self.global_best.personal_best
    }

    /// Circuit cost of [`Self::global_best_tour`].
    pub fn global_best_cost(&self) -> f64 {
        self.global_best.personal_best_cost
    }

    /// The full global-best snapshot, holder included.
    pub fn global_best(&self) -> &GlobalBest {
        &self.global_best
    }

    /// Number of completed epochs.
    pub fn epochs_run(&self) -> usize {
        self.epoch
    }

    /// Global best cost at the end of each completed epoch.
    pub fn convergence_samples(&self) -> &[f64] {
        &self.convergence_samples
    }

    /// Samples recorded every `sample_interval` iterations.
    pub fn iteration_samples(&self) -> &[IterationSample] {
        &self.iteration_samples
    }

    /// The live swarm.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Cost oracle over the instance matrix.
    pub fn oracle(&self) -> &CostOracle {
        &self.oracle
    }

    /// The validated configuration.
    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    /// Whether the run stopped on a flat convergence window.
    pub fn is_converged(&self) -> bool {
        self.converged
    }

    /// Whether the run was stopped by the cancellation flag.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Consumes the solver and returns its result.
    pub fn into_result(self) -> SwarmResult {
        SwarmResult {
            best_tour: self.global_best.personal_best,
            best_cost: self.global_best.personal_best_cost,
            epochs: self.epoch,
            converged: self.converged,
            cancelled: self.cancelled,
            convergence_samples: self.convergence_samples,
            iteration_samples: self.iteration_samples,
        }
    }
}

/// Builds, runs and unwraps a [`Solver`] in one call.
///
/// The generator is seeded from `config.seed`, or randomly when unset.
///
/// ```ignore
/// let result = SwarmRunner::run(matrix, &SwarmConfig::for_instance(16).with_seed(42))?;
/// println!("best cost: {}", result.best_cost);
/// ```
pub struct SwarmRunner;

impl SwarmRunner {
    /// Runs the swarm solver on `matrix`.
    pub fn run(matrix: CostMatrix, config: &SwarmConfig) -> Result<SwarmResult> {
        Self::run_with_cancel(matrix, config, None)
    }

    /// Runs the swarm solver with an optional cancellation token.
    pub fn run_with_cancel(
        matrix: CostMatrix,
        config: &SwarmConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SwarmResult> {
        let rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        let mut solver = Solver::new(matrix, config.clone(), rng)?;
        solver.run_with_cancel(cancel)?;
        Ok(solver.into_result())
    }
}

fn make_particles(oracle: &CostOracle, tours: Vec<Tour>, history_capacity: usize) -> Vec<Particle> {
    tours
        .into_iter()
        .map(|tour| {
            let cost = oracle.evaluate_cost(&tour);
            Particle::new(tour, cost, history_capacity)
        })
        .collect()
}

/// Index of the particle whose personal best is farthest (Hamming) from
/// `reference`. The first one wins ties; index 0 if all distances are zero.
fn most_dissimilar(particles: &[Particle], reference: &[usize]) -> usize {
    let mut far = 0;
    let mut largest = 0;
    for (i, particle) in particles.iter().enumerate() {
        let distance = hamming(reference, &particle.personal_best);
        if distance > largest {
            largest = distance;
            far = i;
        }
    }
    far
}

/// Crosses `dad` with `mom` and keeps the cheaper child (daughter on ties).
fn cheaper_child<R: Rng>(oracle: &CostOracle, dad: &[usize], mom: &[usize], rng: &mut R) -> (Tour, f64) {
    let (son, daughter) = crossover(dad, mom, rng);
    let son_cost = oracle.evaluate_cost(&son);
    let daughter_cost = oracle.evaluate_cost(&daughter);
    if son_cost < daughter_cost {
        (son, son_cost)
    } else {
        (daughter, daughter_cost)
    }
}

// ============================================================================
// Tests
// ============================================================================
