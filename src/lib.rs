//! Two armed bandit simulation: an agent with a budget repeatedly picks one of
//! two slot machines with hidden payout distributions, paying an entry cost
//! each round, and tries to end up with as much money as possible.

pub mod bandit_policy;
pub mod constants;
pub mod environments;
pub mod errors;
pub mod simulation_runner;
pub mod statistics_calculator;
pub mod strategies;

pub use bandit_policy::{ BanditPolicy, GameSummary, PolicyState, RoundEvent, SourceSummary };
pub use environments::PayoutSource;
pub use errors::{ ConfigError, ReportError };
pub use simulation_runner::{ GameConfig, SimulationRunner };
pub use statistics_calculator::GameStatistics;
pub use strategies::{
    Arm,
    Decision,
    FixedSplitExploration,
    Phase,
    PlayCounters,
    ProportionalExploration,
    SelectionStrategy,
    StrategyKind,
    UpperConfidenceBound,
};
