use rand::rngs::StdRng;
use rand::{ Rng, SeedableRng };
use tracing::warn;

use crate::constants::{
    FALLBACK_PAYOUT,
    PROBABILITY_SUM_TOLERANCE,
    PROBABILITY_TOTAL,
    REWARD_LADDER,
};
use crate::errors::ConfigError;

/// PayoutSource represents one slot machine. Every play rolls a number in
/// [0, 100) and pays the ladder value whose cumulative probability band the
/// roll falls into. The distribution is fixed at construction and hidden
/// from the agent, which has to learn it from the payouts alone.
#[derive(Debug, Clone)]
pub struct PayoutSource {
    label: String,
    reward_ladder: Vec<i64>,
    /// Percentage points, index-aligned with `reward_ladder`.
    probabilities: Vec<f64>,
    rng: StdRng,
}

impl PayoutSource {
    /// Creates a machine paying out on the default ladder [0, 1, 5, 100].
    pub fn new(label: impl Into<String>, probabilities: &[f64]) -> Result<Self, ConfigError> {
        Self::with_ladder(label, &REWARD_LADDER, probabilities)
    }

    /// Creates a machine with a custom reward ladder. Probabilities are given
    /// in percentage points and have to add up to 100.
    pub fn with_ladder(
        label: impl Into<String>,
        reward_ladder: &[i64],
        probabilities: &[f64]
    ) -> Result<Self, ConfigError> {
        validate_distribution(reward_ladder, probabilities)?;
        Ok(PayoutSource {
            label: label.into(),
            reward_ladder: reward_ladder.to_vec(),
            probabilities: probabilities.to_vec(),
            rng: StdRng::from_entropy(),
        })
    }

    /// Replaces the entropy seeded stream with a reproducible one.
    pub fn seeded(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Plays the machine once and returns the payout.
    pub fn sample(&mut self) -> i64 {
        let roll: f64 = self.rng.gen_range(0.0..PROBABILITY_TOTAL);
        self.payout_for_roll(roll)
    }

    /// Maps a roll in percentage points onto the ladder. A roll past the last
    /// cumulative band pays FALLBACK_PAYOUT instead of failing.
    pub fn payout_for_roll(&self, roll: f64) -> i64 {
        let mut cumulative = 0.0;
        for (&probability, &payout) in self.probabilities.iter().zip(self.reward_ladder.iter()) {
            cumulative += probability;
            if roll <= cumulative {
                return payout;
            }
        }
        warn!(
            source = %self.label,
            roll,
            cumulative,
            "roll fell outside every band, paying fallback"
        );
        FALLBACK_PAYOUT
    }

    /// Mean payout of one play according to the configured distribution.
    /// Only meant for statistics, the agent never looks at it.
    pub fn expected_payout(&self) -> f64 {
        self.probabilities
            .iter()
            .zip(self.reward_ladder.iter())
            .map(|(&probability, &payout)| (probability * (payout as f64)) / PROBABILITY_TOTAL)
            .sum()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn reward_ladder(&self) -> &[i64] {
        &self.reward_ladder
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }
}

fn validate_distribution(reward_ladder: &[i64], probabilities: &[f64]) -> Result<(), ConfigError> {
    if reward_ladder.is_empty() {
        return Err(ConfigError::EmptyDistribution);
    }
    if reward_ladder.len() != probabilities.len() {
        return Err(ConfigError::LengthMismatch {
            ladder: reward_ladder.len(),
            probabilities: probabilities.len(),
        });
    }
    for (index, &value) in probabilities.iter().enumerate() {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidProbability { index, value });
        }
    }
    let sum: f64 = probabilities.iter().sum();
    if (sum - PROBABILITY_TOTAL).abs() > PROBABILITY_SUM_TOLERANCE {
        return Err(ConfigError::ProbabilitySum { sum });
    }
    Ok(())
}
