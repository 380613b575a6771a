// Temperature softmax and weighted sampling over candidate moves

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;

use crate::error::EngineError;

/// Turns scores into probabilities. Low temperature approaches arg-max,
/// high temperature approaches uniform. `temperature` must be > 0.
pub fn softmax_with_temperature(scores: &[f64], temperature: f64) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }

    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = scores
        .iter()
        .map(|s| ((s - max) / temperature).exp())
        .collect();
    let sum: f64 = exp.iter().sum();
    exp.iter().map(|v| v / sum).collect()
}

/// Draws an index with probability proportional to its weight
pub fn sample_from_weights<R: Rng + ?Sized>(
    weights: &[f64],
    rng: &mut R,
) -> Result<usize, EngineError> {
    let dist = WeightedIndex::new(weights)
        .map_err(|e| EngineError::InvalidDistribution(e.to_string()))?;
    Ok(dist.sample(rng))
}
