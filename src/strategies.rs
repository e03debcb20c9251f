use std::fmt;

use crate::constants::{
    EXPLORATION_DENOMINATOR,
    EXPLORATION_NUMERATOR,
    FIXED_SPLIT_PLAYS_PER_SIDE,
    UCB_EXPLORATION_WEIGHT,
};

/// One of the two machines the agent can play.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum Arm {
    A,
    B,
}

impl Arm {
    pub fn index(self) -> usize {
        match self {
            Arm::A => 0,
            Arm::B => 1,
        }
    }
}

impl fmt::Display for Arm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arm::A => write!(f, "A"),
            Arm::B => write!(f, "B"),
        }
    }
}

/// Whether a decision was made to learn about the machines or to cash in on
/// what has been learned.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Phase {
    Exploring,
    Exploiting,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Decision {
    pub arm: Arm,
    pub phase: Phase,
}

impl Decision {
    fn exploring(arm: Arm) -> Self {
        Decision { arm, phase: Phase::Exploring }
    }

    fn exploiting(arm: Arm) -> Self {
        Decision { arm, phase: Phase::Exploiting }
    }
}

/// Everything the agent has learned so far: how many times each machine was
/// played and how much it paid in total, before the entry cost.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub struct PlayCounters {
    pub plays_a: u64,
    pub plays_b: u64,
    pub winnings_a: i64,
    pub winnings_b: i64,
}

impl PlayCounters {
    pub fn total_plays(&self) -> u64 {
        self.plays_a + self.plays_b
    }

    pub fn total_winnings(&self) -> i64 {
        self.winnings_a + self.winnings_b
    }

    pub fn plays(&self, arm: Arm) -> u64 {
        match arm {
            Arm::A => self.plays_a,
            Arm::B => self.plays_b,
        }
    }

    pub fn winnings(&self, arm: Arm) -> i64 {
        match arm {
            Arm::A => self.winnings_a,
            Arm::B => self.winnings_b,
        }
    }

    /// Average payout per play, 0 for a machine that was never played.
    pub fn average(&self, arm: Arm) -> f64 {
        match self.plays(arm) {
            0 => 0.0,
            plays => (self.winnings(arm) as f64) / (plays as f64),
        }
    }

    pub fn record(&mut self, arm: Arm, payout: i64) {
        match arm {
            Arm::A => {
                self.plays_a += 1;
                self.winnings_a += payout;
            }
            Arm::B => {
                self.plays_b += 1;
                self.winnings_b += payout;
            }
        }
    }
}

/// Picks the machine to play next. Implementations must be pure: the same
/// counters and budget always give the same decision.
pub trait SelectionStrategy: fmt::Debug + Send {
    fn name(&self) -> &'static str;

    fn select(&self, counters: &PlayCounters, total_rounds: u32) -> Decision;
}

/// Greedy choice by observed average. B has to be strictly better to win, so
/// ties (including two unplayed machines) go to A.
fn choose_higher_average(counters: &PlayCounters) -> Arm {
    if counters.average(Arm::B) > counters.average(Arm::A) { Arm::B } else { Arm::A }
}

/// Spends the first 3/5 of the round budget alternating between the machines,
/// then always plays the one with the higher average payout.
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct ProportionalExploration;

impl ProportionalExploration {
    /// Recomputed from the constant budget on every call rather than cached.
    pub fn exploration_rounds(total_rounds: u32) -> u64 {
        ((total_rounds as u64) * (EXPLORATION_NUMERATOR as u64)) / (EXPLORATION_DENOMINATOR as u64)
    }
}

impl SelectionStrategy for ProportionalExploration {
    fn name(&self) -> &'static str {
        "proportional"
    }

    fn select(&self, counters: &PlayCounters, total_rounds: u32) -> Decision {
        if counters.total_plays() < Self::exploration_rounds(total_rounds) {
            // The less played machine goes next, A on ties.
            let arm = if counters.plays_a <= counters.plays_b { Arm::A } else { Arm::B };
            return Decision::exploring(arm);
        }
        Decision::exploiting(choose_higher_average(counters))
    }
}

/// Plays A a fixed number of times, then B the same number of times, then
/// exploits. Ignores the round budget.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct FixedSplitExploration {
    pub plays_per_side: u64,
}

impl Default for FixedSplitExploration {
    fn default() -> Self {
        FixedSplitExploration { plays_per_side: FIXED_SPLIT_PLAYS_PER_SIDE }
    }
}

impl SelectionStrategy for FixedSplitExploration {
    fn name(&self) -> &'static str {
        "fixed-split"
    }

    fn select(&self, counters: &PlayCounters, _total_rounds: u32) -> Decision {
        if counters.total_plays() < 2 * self.plays_per_side {
            let arm = if counters.plays_a < self.plays_per_side { Arm::A } else { Arm::B };
            return Decision::exploring(arm);
        }
        Decision::exploiting(choose_higher_average(counters))
    }
}

/// UCB1. Each machine is tried once, then the machine with the highest
/// average plus confidence bonus is played.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct UpperConfidenceBound {
    pub exploration_weight: f64,
}

impl Default for UpperConfidenceBound {
    fn default() -> Self {
        UpperConfidenceBound { exploration_weight: UCB_EXPLORATION_WEIGHT }
    }
}

impl UpperConfidenceBound {
    fn score(&self, counters: &PlayCounters, arm: Arm) -> f64 {
        let total = counters.total_plays() as f64;
        let plays = counters.plays(arm) as f64;
        counters.average(arm) + self.exploration_weight * (total.ln() / plays).sqrt()
    }
}

impl SelectionStrategy for UpperConfidenceBound {
    fn name(&self) -> &'static str {
        "ucb"
    }

    fn select(&self, counters: &PlayCounters, _total_rounds: u32) -> Decision {
        if counters.plays_a == 0 {
            return Decision::exploring(Arm::A);
        }
        if counters.plays_b == 0 {
            return Decision::exploring(Arm::B);
        }
        let arm = if self.score(counters, Arm::B) > self.score(counters, Arm::A) {
            Arm::B
        } else {
            Arm::A
        };
        Decision::exploiting(arm)
    }
}

/// Strategies selectable from the command line.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum StrategyKind {
    #[default]
    Proportional,
    FixedSplit,
    Ucb,
}

impl StrategyKind {
    pub fn build(self) -> Box<dyn SelectionStrategy> {
        match self {
            StrategyKind::Proportional => Box::new(ProportionalExploration),
            StrategyKind::FixedSplit => Box::new(FixedSplitExploration::default()),
            StrategyKind::Ucb => Box::new(UpperConfidenceBound::default()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn counters(plays_a: u64, winnings_a: i64, plays_b: u64, winnings_b: i64) -> PlayCounters {
        PlayCounters { plays_a, plays_b, winnings_a, winnings_b }
    }

    #[test]
    fn test_exploration_rounds_is_three_fifths_rounded_down() {
        assert_eq!(ProportionalExploration::exploration_rounds(10), 6);
        assert_eq!(ProportionalExploration::exploration_rounds(7), 4);
        assert_eq!(ProportionalExploration::exploration_rounds(1), 0);
        assert_eq!(ProportionalExploration::exploration_rounds(100), 60);
    }

    #[test]
    fn test_proportional_exploration_alternates_starting_with_a() {
        let strategy = ProportionalExploration;
        let mut state = PlayCounters::default();
        let mut arms = vec![];

        for _ in 0..6 {
            let decision = strategy.select(&state, 10);
            assert_eq!(decision.phase, Phase::Exploring);
            arms.push(decision.arm);
            state.record(decision.arm, 0);
        }

        assert_eq!(arms, vec![Arm::A, Arm::B, Arm::A, Arm::B, Arm::A, Arm::B]);
    }

    #[test]
    fn test_proportional_exploration_plays_less_played_machine() {
        let decision = ProportionalExploration.select(&counters(1, 0, 3, 0), 100);

        assert_eq!(decision, Decision::exploring(Arm::A));

        let decision = ProportionalExploration.select(&counters(4, 0, 2, 0), 100);

        assert_eq!(decision, Decision::exploring(Arm::B));
    }

    #[test]
    fn test_proportional_exploitation_picks_higher_average() {
        let decision = ProportionalExploration.select(&counters(3, 3, 3, 105), 10);

        assert_eq!(decision, Decision::exploiting(Arm::B));

        let decision = ProportionalExploration.select(&counters(3, 110, 3, 5), 10);

        assert_eq!(decision, Decision::exploiting(Arm::A));
    }

    #[test]
    fn test_proportional_exploitation_tie_goes_to_a() {
        let decision = ProportionalExploration.select(&counters(3, 6, 3, 6), 10);

        assert_eq!(decision, Decision::exploiting(Arm::A));
    }

    #[test]
    fn test_exploitation_with_no_plays_goes_to_a() {
        // A budget of one round has no exploration phase at all.
        let decision = ProportionalExploration.select(&PlayCounters::default(), 1);

        assert_eq!(decision, Decision::exploiting(Arm::A));
    }

    #[test]
    fn test_unplayed_machine_counts_as_zero_average() {
        let decision = ProportionalExploration.select(&counters(0, 0, 2, 1), 1);

        assert_eq!(decision.arm, Arm::B);

        let decision = ProportionalExploration.select(&counters(0, 0, 2, 0), 1);

        assert_eq!(decision.arm, Arm::A, "Zero average against zero average is a tie");
    }

    #[test]
    fn test_select_is_pure() {
        let state = counters(5, 17, 4, 9);

        for strategy in [StrategyKind::Proportional, StrategyKind::FixedSplit, StrategyKind::Ucb] {
            let strategy = strategy.build();
            let first = strategy.select(&state, 12);
            let second = strategy.select(&state, 12);
            assert_eq!(first, second, "{} is not a pure function of the counters", strategy.name());
        }
    }

    #[test]
    fn test_fixed_split_plays_a_then_b() {
        let strategy = FixedSplitExploration::default();
        let mut state = PlayCounters::default();
        let mut arms = vec![];

        for _ in 0..6 {
            let decision = strategy.select(&state, 10);
            assert_eq!(decision.phase, Phase::Exploring);
            arms.push(decision.arm);
            state.record(decision.arm, 1);
        }

        assert_eq!(arms, vec![Arm::A, Arm::A, Arm::A, Arm::B, Arm::B, Arm::B]);
        assert_eq!(strategy.select(&state, 10), Decision::exploiting(Arm::A));
    }

    #[test]
    fn test_fixed_split_exploits_higher_average() {
        let strategy = FixedSplitExploration::default();

        let decision = strategy.select(&counters(3, 0, 3, 5), 10);

        assert_eq!(decision, Decision::exploiting(Arm::B));
    }

    #[test]
    fn test_ucb_tries_each_machine_once_first() {
        let strategy = UpperConfidenceBound::default();

        assert_eq!(strategy.select(&counters(0, 0, 0, 0), 10), Decision::exploring(Arm::A));
        assert_eq!(strategy.select(&counters(1, 100, 0, 0), 10), Decision::exploring(Arm::B));
    }

    #[test]
    fn test_ucb_prefers_less_played_machine_when_averages_match() {
        let strategy = UpperConfidenceBound::default();

        let decision = strategy.select(&counters(10, 10, 2, 2), 100);

        assert_eq!(decision, Decision::exploiting(Arm::B));
    }

    #[test]
    fn test_ucb_tie_goes_to_a() {
        let strategy = UpperConfidenceBound::default();

        let decision = strategy.select(&counters(4, 8, 4, 8), 100);

        assert_eq!(decision, Decision::exploiting(Arm::A));
    }

    #[test]
    fn test_counters_record_and_average() {
        let mut state = PlayCounters::default();

        assert_eq!(state.average(Arm::A), 0.0);

        state.record(Arm::A, 5);
        state.record(Arm::A, 0);
        state.record(Arm::B, 100);

        assert_eq!(state.plays_a, 2);
        assert_eq!(state.plays_b, 1);
        assert_eq!(state.total_plays(), 3);
        assert_eq!(state.total_winnings(), 105);
        assert_eq!(state.average(Arm::A), 2.5);
        assert_eq!(state.average(Arm::B), 100.0);
    }

    #[test]
    fn test_strategy_kind_builds_named_strategy() {
        assert_eq!(StrategyKind::default().build().name(), "proportional");
        assert_eq!(StrategyKind::FixedSplit.build().name(), "fixed-split");
        assert_eq!(StrategyKind::Ucb.build().name(), "ucb");
    }
}
