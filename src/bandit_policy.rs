use tracing::{ debug, info };

use crate::constants::ENTRY_COST;
use crate::environments::PayoutSource;
use crate::errors::ConfigError;
use crate::strategies::{ Arm, Phase, PlayCounters, ProportionalExploration, SelectionStrategy };

/// Where the agent currently is in its game.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum PolicyState {
    Exploring,
    Exploiting,
    /// Funds dropped below the entry cost of one round.
    Depleted,
    /// The whole round budget has been played.
    Finished,
}

impl PolicyState {
    pub fn is_stopped(self) -> bool {
        matches!(self, PolicyState::Depleted | PolicyState::Finished)
    }
}

impl From<Phase> for PolicyState {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Exploring => PolicyState::Exploring,
            Phase::Exploiting => PolicyState::Exploiting,
        }
    }
}

/// What happened in a single round, handed to the caller for display.
#[derive(PartialEq, Debug, Clone)]
pub struct RoundEvent {
    /// Starts at 1.
    pub round: u32,
    pub arm: Arm,
    pub label: String,
    pub phase: Phase,
    pub payout: i64,
    pub funds_after: i64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct SourceSummary {
    pub label: String,
    pub plays: u64,
    pub total_winnings: i64,
}

impl SourceSummary {
    pub fn average_payout(&self) -> f64 {
        match self.plays {
            0 => 0.0,
            plays => (self.total_winnings as f64) / (plays as f64),
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct GameSummary {
    pub final_funds: i64,
    pub rounds_played: u32,
    pub total_rounds: u32,
    pub state: PolicyState,
    pub strategy: &'static str,
    /// Index 0 is machine A, index 1 is machine B.
    pub sources: [SourceSummary; 2],
}

/// The decision agent. It holds the money, the round budget and what it has
/// learned about both machines, and plays one round at a time until it runs
/// out of money or rounds. Which machine to play is delegated to a
/// SelectionStrategy so the loop itself never changes.
#[derive(Debug)]
pub struct BanditPolicy {
    funds: i64,
    total_rounds: u32,
    rounds_played: u32,
    sources: [PayoutSource; 2],
    counters: PlayCounters,
    strategy: Box<dyn SelectionStrategy>,
    state: PolicyState,
}

impl BanditPolicy {
    /// Creates an agent using ProportionalExploration.
    pub fn new(
        starting_funds: i64,
        total_rounds: u32,
        source_a: PayoutSource,
        source_b: PayoutSource
    ) -> Result<Self, ConfigError> {
        if starting_funds < 0 {
            return Err(ConfigError::NegativeFunds(starting_funds));
        }
        if total_rounds == 0 {
            return Err(ConfigError::NoRounds);
        }
        Ok(BanditPolicy {
            funds: starting_funds,
            total_rounds,
            rounds_played: 0,
            sources: [source_a, source_b],
            counters: PlayCounters::default(),
            strategy: Box::new(ProportionalExploration),
            state: PolicyState::Exploring,
        })
    }

    pub fn with_strategy(mut self, strategy: Box<dyn SelectionStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Decision for the next round, read from the counters only.
    pub fn select_source(&self) -> (Arm, Phase) {
        let decision = self.strategy.select(&self.counters, self.total_rounds);
        (decision.arm, decision.phase)
    }

    /// Plays one round. Returns None once the agent is out of money or has
    /// used up the round budget; those checks run before anything is spent.
    pub fn play_round(&mut self) -> Option<RoundEvent> {
        if self.state.is_stopped() {
            return None;
        }
        if self.funds < ENTRY_COST {
            self.stop(PolicyState::Depleted);
            return None;
        }
        let round = self.rounds_played + 1;
        if round > self.total_rounds {
            self.stop(PolicyState::Finished);
            return None;
        }

        let (arm, phase) = self.select_source();
        self.state = phase.into();
        let source = &mut self.sources[arm.index()];
        let payout = source.sample();
        self.funds += payout - ENTRY_COST;
        self.counters.record(arm, payout);
        self.rounds_played = round;

        debug!(round, source = %source.label(), ?phase, payout, funds = self.funds, "round played");

        Some(RoundEvent {
            round,
            arm,
            label: source.label().to_string(),
            phase,
            payout,
            funds_after: self.funds,
        })
    }

    /// Lazy sequence of rounds. Each `next()` plays one round.
    pub fn rounds(&mut self) -> Rounds<'_> {
        Rounds { policy: self }
    }

    /// Plays until a terminal state and returns the final summary.
    pub fn run(&mut self) -> GameSummary {
        self.run_with(|_| {})
    }

    /// Same as `run`, handing every round to `on_round` as it is played.
    pub fn run_with<F>(&mut self, mut on_round: F) -> GameSummary where F: FnMut(&RoundEvent) {
        while let Some(event) = self.play_round() {
            on_round(&event);
        }
        self.summary()
    }

    pub fn summary(&self) -> GameSummary {
        let source_summary = |arm: Arm| SourceSummary {
            label: self.sources[arm.index()].label().to_string(),
            plays: self.counters.plays(arm),
            total_winnings: self.counters.winnings(arm),
        };
        GameSummary {
            final_funds: self.funds,
            rounds_played: self.rounds_played,
            total_rounds: self.total_rounds,
            state: self.state,
            strategy: self.strategy.name(),
            sources: [source_summary(Arm::A), source_summary(Arm::B)],
        }
    }

    fn stop(&mut self, state: PolicyState) {
        self.state = state;
        info!(
            ?state,
            rounds_played = self.rounds_played,
            total_rounds = self.total_rounds,
            funds = self.funds,
            "game over"
        );
    }

    pub fn funds(&self) -> i64 {
        self.funds
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn counters(&self) -> &PlayCounters {
        &self.counters
    }

    pub fn state(&self) -> PolicyState {
        self.state
    }

    pub fn source(&self, arm: Arm) -> &PayoutSource {
        &self.sources[arm.index()]
    }

    /// Hands the machines back so they can be reused in another game.
    pub fn into_sources(self) -> (PayoutSource, PayoutSource) {
        let [source_a, source_b] = self.sources;
        (source_a, source_b)
    }
}

pub struct Rounds<'a> {
    policy: &'a mut BanditPolicy,
}

impl Iterator for Rounds<'_> {
    type Item = RoundEvent;

    fn next(&mut self) -> Option<RoundEvent> {
        self.policy.play_round()
    }
}
