use polars::prelude::PolarsError;
use thiserror::Error;

/// Raised when a payout source, a policy or a whole game is built from
/// values that cannot describe a valid game.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("distribution is empty, at least one reward is required")]
    EmptyDistribution,
    #[error("reward ladder has {ladder} values but {probabilities} probabilities were given")]
    LengthMismatch { ladder: usize, probabilities: usize },
    #[error("probability at index {index} is invalid: {value}")]
    InvalidProbability { index: usize, value: f64 },
    #[error("probabilities must add up to 100, got {sum}")]
    ProbabilitySum { sum: f64 },
    #[error("starting funds cannot be negative: {0}")]
    NegativeFunds(i64),
    #[error("the game needs at least one round")]
    NoRounds,
    #[error("seconds per round must be positive")]
    InvalidRoundLength,
}

/// Raised while building the statistics frame for a finished game.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to build statistics frame: {0}")]
    Polars(#[from] PolarsError),
}
