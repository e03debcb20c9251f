use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use two_armed_bandit::constants::{
    REWARD_LADDER,
    SECONDS_PER_ROUND,
    SLOT_A_PROBABILITIES,
    SLOT_B_PROBABILITIES,
    STARTING_FUNDS,
    TOTAL_PLAY_TIME,
};
use two_armed_bandit::statistics_calculator::set_polars_environment_variables;
use two_armed_bandit::{ GameConfig, PolicyState, SimulationRunner, StrategyKind };

/// Lets an agent gamble on two slot machines with hidden odds.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Money the agent starts with.
    #[arg(long, default_value_t = STARTING_FUNDS, allow_negative_numbers = true)]
    money: i64,
    /// Total play time in seconds.
    #[arg(long, default_value_t = TOTAL_PLAY_TIME)]
    play_time: u32,
    #[arg(long, default_value_t = SECONDS_PER_ROUND)]
    seconds_per_round: u32,
    /// Percent chance of paying 0, 1, 5 and 100 on slot A.
    #[arg(long, value_delimiter = ',', default_values_t = SLOT_A_PROBABILITIES)]
    slot_a: Vec<f64>,
    /// Percent chance of paying 0, 1, 5 and 100 on slot B.
    #[arg(long, value_delimiter = ',', default_values_t = SLOT_B_PROBABILITIES)]
    slot_b: Vec<f64>,
    /// Seed both machines for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = StrategyKind::Proportional)]
    strategy: StrategyKind,
    /// Only print the final results.
    #[arg(long)]
    quiet: bool,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            starting_funds: self.money,
            total_play_time: self.play_time,
            seconds_per_round: self.seconds_per_round,
            reward_ladder: REWARD_LADDER.to_vec(),
            slot_a_probabilities: self.slot_a.clone(),
            slot_b_probabilities: self.slot_b.clone(),
            seed: self.seed,
            strategy: self.strategy,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut runner = SimulationRunner::new(&args.game_config()).context(
        "invalid game configuration"
    )?;

    println!("\n It's Time to Gamble!!! ");
    let summary = runner.run_with(|event| {
        if !args.quiet {
            println!(
                "Round {}: Played {} -> Won Php {} (Total Money: Php {})",
                event.round,
                event.label,
                event.payout,
                event.funds_after
            );
        }
    });

    if summary.state == PolicyState::Depleted {
        println!("\n Out of money! Can't Gamble anymore :(");
    }
    println!("\n Final Results | Money: Php {}", summary.final_funds);
    println!(" Summary:");
    for source in &summary.sources {
        println!(
            "{}: Played {} times, Total Winnings: Php {}",
            source.label,
            source.plays,
            source.total_winnings
        );
    }

    set_polars_environment_variables();
    let statistics = runner.statistics().context("failed to build game statistics")?;
    println!();
    for line in statistics.report_lines() {
        println!("{}", line);
    }
    Ok(())
}
