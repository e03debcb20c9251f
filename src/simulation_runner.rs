use tracing::info;

use crate::bandit_policy::{ BanditPolicy, GameSummary, RoundEvent };
use crate::constants::{
    REWARD_LADDER,
    SECONDS_PER_ROUND,
    SEED_SPREAD,
    SLOT_A_LABEL,
    SLOT_A_PROBABILITIES,
    SLOT_B_LABEL,
    SLOT_B_PROBABILITIES,
    STARTING_FUNDS,
    TOTAL_PLAY_TIME,
};
use crate::environments::PayoutSource;
use crate::errors::{ ConfigError, ReportError };
use crate::statistics_calculator::GameStatistics;
use crate::strategies::StrategyKind;

/// Everything needed to set up one game.
#[derive(PartialEq, Debug, Clone)]
pub struct GameConfig {
    pub starting_funds: i64,
    /// Total time the agent may play, in seconds.
    pub total_play_time: u32,
    pub seconds_per_round: u32,
    pub reward_ladder: Vec<i64>,
    pub slot_a_probabilities: Vec<f64>,
    pub slot_b_probabilities: Vec<f64>,
    /// Master seed for both machines. None draws from OS entropy.
    pub seed: Option<u64>,
    pub strategy: StrategyKind,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            starting_funds: STARTING_FUNDS,
            total_play_time: TOTAL_PLAY_TIME,
            seconds_per_round: SECONDS_PER_ROUND,
            reward_ladder: REWARD_LADDER.to_vec(),
            slot_a_probabilities: SLOT_A_PROBABILITIES.to_vec(),
            slot_b_probabilities: SLOT_B_PROBABILITIES.to_vec(),
            seed: None,
            strategy: StrategyKind::default(),
        }
    }
}

impl GameConfig {
    pub fn total_rounds(&self) -> Result<u32, ConfigError> {
        if self.seconds_per_round == 0 {
            return Err(ConfigError::InvalidRoundLength);
        }
        Ok(self.total_play_time / self.seconds_per_round)
    }
}

/// Derives an independent, reproducible seed for the machine at `index`.
fn derive_seed(master_seed: u64, index: u64) -> u64 {
    master_seed ^ index.wrapping_mul(SEED_SPREAD)
}

/// Sets up the two machines and the agent from a GameConfig and runs the
/// game. The agent never sees the machines' probabilities.
#[derive(Debug)]
pub struct SimulationRunner {
    policy: BanditPolicy,
    expected_payouts: [f64; 2],
}

impl SimulationRunner {
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        let total_rounds = config.total_rounds()?;

        let mut slot_a = PayoutSource::with_ladder(
            SLOT_A_LABEL,
            &config.reward_ladder,
            &config.slot_a_probabilities
        )?;
        let mut slot_b = PayoutSource::with_ladder(
            SLOT_B_LABEL,
            &config.reward_ladder,
            &config.slot_b_probabilities
        )?;
        if let Some(seed) = config.seed {
            slot_a = slot_a.seeded(derive_seed(seed, 0));
            slot_b = slot_b.seeded(derive_seed(seed, 1));
        }
        let expected_payouts = [slot_a.expected_payout(), slot_b.expected_payout()];

        let policy = BanditPolicy::new(
            config.starting_funds,
            total_rounds,
            slot_a,
            slot_b
        )?.with_strategy(config.strategy.build());

        info!(
            starting_funds = config.starting_funds,
            total_rounds,
            strategy = ?config.strategy,
            seed = ?config.seed,
            "game set up"
        );

        Ok(SimulationRunner { policy, expected_payouts })
    }

    pub fn run(&mut self) -> GameSummary {
        self.policy.run()
    }

    pub fn run_with<F>(&mut self, on_round: F) -> GameSummary where F: FnMut(&RoundEvent) {
        self.policy.run_with(on_round)
    }

    /// Statistics frame for the game as it stands.
    pub fn statistics(&self) -> Result<GameStatistics, ReportError> {
        GameStatistics::new(&self.policy.summary(), self.expected_payouts)
    }

    pub fn policy(&self) -> &BanditPolicy {
        &self.policy
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bandit_policy::PolicyState;
    use crate::strategies::Arm;

    fn seeded_config(seed: u64) -> GameConfig {
        GameConfig { seed: Some(seed), ..GameConfig::default() }
    }

    #[test]
    fn test_default_config_matches_sample_game() {
        let config = GameConfig::default();

        assert_eq!(config.starting_funds, 20);
        assert_eq!(config.total_rounds().unwrap(), 10);
        assert_eq!(config.reward_ladder, vec![0, 1, 5, 100]);
        assert_eq!(config.strategy, StrategyKind::Proportional);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_round_budget_is_play_time_over_round_length() {
        let config = GameConfig { total_play_time: 95, ..GameConfig::default() };

        assert_eq!(config.total_rounds().unwrap(), 9);
    }

    #[test]
    fn test_zero_round_length_is_rejected() {
        let config = GameConfig { seconds_per_round: 0, ..GameConfig::default() };

        assert_eq!(SimulationRunner::new(&config).unwrap_err(), ConfigError::InvalidRoundLength);
    }

    #[test]
    fn test_play_time_shorter_than_a_round_is_rejected() {
        let config = GameConfig { total_play_time: 9, ..GameConfig::default() };

        assert_eq!(SimulationRunner::new(&config).unwrap_err(), ConfigError::NoRounds);
    }

    #[test]
    fn test_malformed_distribution_is_rejected() {
        let config = GameConfig {
            slot_b_probabilities: vec![40.0, 35.0, 20.0],
            ..GameConfig::default()
        };

        assert_eq!(SimulationRunner::new(&config).unwrap_err(), ConfigError::LengthMismatch {
            ladder: 4,
            probabilities: 3,
        });
    }

    #[test]
    fn test_runner_names_the_machines() {
        let runner = SimulationRunner::new(&GameConfig::default()).unwrap();

        assert_eq!(runner.policy().source(Arm::A).label(), SLOT_A_LABEL);
        assert_eq!(runner.policy().source(Arm::B).label(), SLOT_B_LABEL);
        assert_eq!(runner.policy().total_rounds(), 10);
    }

    #[test]
    fn test_run_sample_game() {
        let mut runner = SimulationRunner::new(&seeded_config(12)).unwrap();
        let mut rounds = 0;

        let summary = runner.run_with(|_| {
            rounds += 1;
        });

        assert_eq!(rounds, 10);
        assert_eq!(summary.rounds_played, 10);
        assert_eq!(summary.state, PolicyState::Finished);
        assert_eq!(summary.sources[0].label, SLOT_A_LABEL);
        assert!(summary.sources[0].plays >= 3);
        assert!(summary.sources[1].plays >= 3);
    }

    #[test]
    fn test_same_seed_replays_same_game() {
        let first = SimulationRunner::new(&seeded_config(31)).unwrap().run();
        let second = SimulationRunner::new(&seeded_config(31)).unwrap().run();

        assert_eq!(first, second);
    }

    #[test]
    fn test_derived_seeds_differ_per_machine() {
        assert_eq!(derive_seed(5, 0), 5);
        assert_ne!(derive_seed(5, 0), derive_seed(5, 1));
    }

    #[test]
    fn test_strategy_from_config_is_used() {
        let config = GameConfig { strategy: StrategyKind::Ucb, ..seeded_config(3) };
        let mut runner = SimulationRunner::new(&config).unwrap();

        let summary = runner.run();

        assert_eq!(summary.strategy, "ucb");
    }

    #[test]
    fn test_statistics_after_run() {
        let mut runner = SimulationRunner::new(&seeded_config(8)).unwrap();
        runner.run();

        let statistics = runner.statistics().unwrap();

        assert_eq!(statistics.frame().height(), 2);
    }
}
