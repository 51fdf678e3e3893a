//! Metropolis acceptance rule.

/// Probability of keeping a move that changes cost by `delta`.
///
/// Improving or neutral moves are always kept. A non-positive temperature
/// rejects every worsening move.
pub fn acceptance_probability(delta: i64, temperature: f64) -> f64 {
    if delta <= 0 {
        return 1.0;
    }
    if temperature <= 0.0 || temperature.is_nan() {
        return 0.0;
    }
    (-(delta as f64) / temperature).exp()
}

/// Decides a move given a uniform draw `u` in `[0, 1)`.
pub fn accept(delta: i64, temperature: f64, u: f64) -> bool {
    delta <= 0 || u < acceptance_probability(delta, temperature)
}
