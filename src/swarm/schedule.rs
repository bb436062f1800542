//! Acceptance schedule for worsening personal bests.

/// Probability of accepting a worsening personal best at `epoch`.
///
/// `p0 * exp(-epoch / alpha)` with `alpha = max_epochs / ln(0.9 / p0)`.
/// Starts at `p0` and decays to `p0² / 0.9` at `max_epochs`, so the swarm
/// tolerates fewer worsening moves as the search matures.
///
/// Requires `0 < p0 < 0.9` and `max_epochs > 0`.
///
/// # Examples
///
/// ```
/// use u_swarm_tsp::swarm::mutation_probability;
///
/// let start = mutation_probability(0.05, 0, 100);
/// let end = mutation_probability(0.05, 100, 100);
/// assert!((start - 0.05).abs() < 1e-12);
/// assert!((end - 0.05 * 0.05 / 0.9).abs() < 1e-12);
/// ```
pub fn mutation_probability(p0: f64, epoch: usize, max_epochs: usize) -> f64 {
    let alpha = max_epochs as f64 / (0.9 / p0).ln();
    p0 * (-(epoch as f64) / alpha).exp()
}
