//! Swarm solver configuration.

use crate::error::{Result, SwarmError};

/// Configuration for the swarm solver.
///
/// # Defaults
///
/// ```
/// use u_swarm_tsp::swarm::SwarmConfig;
///
/// let config = SwarmConfig::default();
/// assert_eq!(config.population_size, 7);
/// assert_eq!(config.max_epochs, 300);
/// assert!(config.validate().is_ok());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_swarm_tsp::swarm::SwarmConfig;
///
/// let config = SwarmConfig::default()
///     .with_population_size(20)
///     .with_iterations(500)
///     .with_probabilities(0.12, 0.29)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwarmConfig {
    /// Target number of particles.
    ///
    /// Duplicate random tours are dropped, so the live swarm may be smaller.
    /// The size carried into each epoch is the size of the previous swarm.
    pub population_size: usize,

    /// Iterations per epoch.
    pub iterations: usize,

    /// Maximum number of epochs.
    pub max_epochs: usize,

    /// Convergence window: stop once the last `epoch_stop` per-epoch best
    /// costs have zero standard deviation. 0 disables the check.
    pub epoch_stop: usize,

    /// Probability of crossing with the particle most dissimilar to the
    /// global best. Drawn only when the `beta` draw fails.
    pub alfa: f64,

    /// Probability of crossing with the global best.
    pub beta: f64,

    /// Iteration multiplier for the first epoch.
    pub warmup_factor: usize,

    /// Capacity of each particle's tour history.
    pub history_capacity: usize,

    /// Random populations generated each time the swarm is seeded.
    pub candidate_populations: usize,

    /// Initial probability of accepting a worsening personal best.
    /// Must lie in (0, 0.9).
    pub acceptance_probability: f64,

    /// Record an iteration sample every this many iterations. 0 disables.
    pub sample_interval: usize,

    /// Seed particle 0 of the first epoch with a mutated savings tour.
    pub savings_seed: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            population_size: 7,
            iterations: 1000,
            max_epochs: 300,
            epoch_stop: 3,
            alfa: 0.12,
            beta: 0.29,
            warmup_factor: 3,
            history_capacity: 100,
            candidate_populations: 6,
            acceptance_probability: 0.05,
            sample_interval: 100,
            savings_seed: false,
            seed: None,
        }
    }
}

impl SwarmConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_max_epochs(mut self, n: usize) -> Self {
        self.max_epochs = n;
        self
    }

    /// Sets the convergence window (0 to disable).
    pub fn with_epoch_stop(mut self, n: usize) -> Self {
        self.epoch_stop = n;
        self
    }

    /// Sets `alfa` (dissimilar crossover) and `beta` (global-best crossover).
    pub fn with_probabilities(mut self, alfa: f64, beta: f64) -> Self {
        self.alfa = alfa;
        self.beta = beta;
        self
    }

    pub fn with_warmup_factor(mut self, factor: usize) -> Self {
        self.warmup_factor = factor;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_candidate_populations(mut self, n: usize) -> Self {
        self.candidate_populations = n;
        self
    }

    pub fn with_acceptance_probability(mut self, p0: f64) -> Self {
        self.acceptance_probability = p0;
        self
    }

    pub fn with_sample_interval(mut self, n: usize) -> Self {
        self.sample_interval = n;
        self
    }

    pub fn with_savings_seed(mut self, enabled: bool) -> Self {
        self.savings_seed = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset scaled to an instance with `num_cities` locations.
    ///
    /// - iterations: `round(600 * num_cities / 7)`
    /// - epoch_stop: `round(0.2 * num_cities)`
    /// - everything else: defaults
    pub fn for_instance(num_cities: usize) -> Self {
        Self {
            iterations: ((num_cities as f64 * 600.0) / 7.0).round().max(1.0) as usize,
            epoch_stop: (0.2 * num_cities as f64).round() as usize,
            ..Self::default()
        }
    }

    /// Iterations run in the first epoch: `iterations * warmup_factor`.
    ///
    /// `None` if the product overflows.
    pub fn warmup_iterations(&self) -> Option<usize> {
        self.iterations.checked_mul(self.warmup_factor)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(SwarmError::InvalidConfig(msg));

        if self.population_size == 0 {
            return fail("population_size must be at least 1".into());
        }
        if self.iterations == 0 {
            return fail("iterations must be at least 1".into());
        }
        if self.max_epochs == 0 {
            return fail("max_epochs must be at least 1".into());
        }
        if self.warmup_factor == 0 {
            return fail("warmup_factor must be at least 1".into());
        }
        if self.warmup_iterations().is_none() {
            return fail(format!(
                "iterations * warmup_factor overflows ({} * {})",
                self.iterations, self.warmup_factor
            ));
        }
        if self.history_capacity == 0 {
            return fail("history_capacity must be at least 1".into());
        }
        if self.candidate_populations == 0 {
            return fail("candidate_populations must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.alfa) {
            return fail(format!("alfa must be in [0, 1], got {}", self.alfa));
        }
        if !(0.0..=1.0).contains(&self.beta) {
            return fail(format!("beta must be in [0, 1], got {}", self.beta));
        }
        let p0 = self.acceptance_probability;
        if !(p0 > 0.0 && p0 < 0.9) {
            return fail(format!("acceptance_probability must be in (0, 0.9), got {p0}"));
        }
        Ok(())
    }
}
