use super::{BeliefError, EnemyTracker};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeliefMetrics {
    pub territories: usize,
    pub mean_probability: f64,
    pub certain_enemy: usize,
    /// Sum of per-territory Bernoulli entropies, in nats.
    pub entropy: f64,
    pub estimated_income: f64,
}

impl BeliefMetrics {
    pub fn from_tracker(tracker: &EnemyTracker) -> Result<Self, BeliefError> {
        let probs = tracker.probabilities().ok_or(BeliefError::NotInitialized)?;
        let territories = probs.len();
        let mut total = 0.0;
        let mut certain_enemy = 0;
        let mut entropy = 0.0;
        for prob in probs.values().copied() {
            total += prob;
            if prob >= 1.0 {
                certain_enemy += 1;
            }
            entropy += bernoulli_entropy(prob);
        }

        let mean_probability = if territories == 0 {
            0.0
        } else {
            total / territories as f64
        };

        Ok(Self {
            territories,
            mean_probability,
            certain_enemy,
            entropy,
            estimated_income: tracker.compute_enemy_income()?,
        })
    }
}

fn bernoulli_entropy(p: f64) -> f64 {
    let mut h = 0.0;
    if p > 0.0 {
        h -= p * p.ln();
    }
    if p < 1.0 {
        h -= (1.0 - p) * (1.0 - p).ln();
    }
    h
}
