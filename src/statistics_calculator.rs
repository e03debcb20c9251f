use chrono::prelude::*;
use polars::prelude::*;

use crate::bandit_policy::{ GameSummary, PolicyState };
use crate::constants::{ ENTRY_COST, POLARS_MAX_COLS };
use crate::errors::ReportError;
use crate::strategies::Arm;

/// One row per machine.
const NUM_OF_SOURCES: usize = 2;

/// Set environment variables so that the whole dataframe is printed
pub fn set_polars_environment_variables() {
    std::env::set_var("POLARS_FMT_MAX_COLS", POLARS_MAX_COLS);
    std::env::set_var("POLARS_FMT_MAX_ROWS", NUM_OF_SOURCES.to_string());
}

/// Per machine statistics of one game, kept in a dataframe so they can be
/// compared with what the machines were actually configured to pay.
///
/// Columns: source, plays, total_winnings, expected_payout, mean_payout,
/// net_return. `mean_payout` is what the agent observed, `expected_payout` is
/// the hidden truth, and `net_return` is winnings minus the entry costs paid
/// on that machine.
#[derive(Debug, Clone)]
pub struct GameStatistics {
    summary: GameSummary,
    df: DataFrame,
    generated_at: DateTime<Local>,
}

impl GameStatistics {
    pub fn new(summary: &GameSummary, expected_payouts: [f64; 2]) -> Result<Self, ReportError> {
        let labels: Vec<&str> = summary.sources
            .iter()
            .map(|source| source.label.as_str())
            .collect();
        let plays: Vec<i64> = summary.sources
            .iter()
            .map(|source| source.plays as i64)
            .collect();
        let winnings: Vec<i64> = summary.sources
            .iter()
            .map(|source| source.total_winnings)
            .collect();

        let df = DataFrame::new(
            vec![
                Series::new("source", &labels),
                Series::new("plays", &plays),
                Series::new("total_winnings", &winnings),
                Series::new("expected_payout", &expected_payouts)
            ]
        )?;

        // Never played machines average 0 instead of NaN.
        let df = df
            .lazy()
            .with_column(
                when(col("plays").eq(lit(0i64)))
                    .then(lit(0.0))
                    .otherwise(
                        col("total_winnings").cast(DataType::Float64) /
                            col("plays").cast(DataType::Float64)
                    )
                    .alias("mean_payout")
            )
            .with_column(
                (col("total_winnings") - col("plays") * lit(ENTRY_COST)).alias("net_return")
            )
            .collect()?;

        Ok(GameStatistics {
            summary: summary.clone(),
            df,
            generated_at: Local::now(),
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn generated_at(&self) -> DateTime<Local> {
        self.generated_at
    }

    pub fn mean_payout(&self, arm: Arm) -> Option<f64> {
        self.df.column("mean_payout").ok()?.f64().ok()?.get(arm.index())
    }

    pub fn net_return(&self, arm: Arm) -> Option<i64> {
        self.df.column("net_return").ok()?.i64().ok()?.get(arm.index())
    }

    /// Human readable report. Nothing is written anywhere, the caller decides
    /// where the lines go.
    pub fn report_lines(&self) -> Vec<String> {
        let stop_reason = match self.summary.state {
            PolicyState::Depleted => "out of money",
            PolicyState::Finished => "round budget used up",
            PolicyState::Exploring | PolicyState::Exploiting => "still running",
        };

        vec![
            "### Statistics for the game ###".to_string(),
            format!("Generated at: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S")),
            format!("Strategy: {}", self.summary.strategy),
            format!(
                "Rounds played: {} of {}",
                self.summary.rounds_played,
                self.summary.total_rounds
            ),
            format!("Stopped because: {}", stop_reason),
            format!("Final money: Php {}", self.summary.final_funds),
            format!("{}", self.df)
        ]
    }
}
