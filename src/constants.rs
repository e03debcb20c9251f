/// Money the agent walks in with.
pub const STARTING_FUNDS: i64 = 20;
/// Total time the agent is allowed to play, in seconds.
pub const TOTAL_PLAY_TIME: u32 = 100;
/// Each round takes this many seconds, so the round budget is
/// TOTAL_PLAY_TIME / SECONDS_PER_ROUND.
pub const SECONDS_PER_ROUND: u32 = 10;
/// Cost charged for every round played, whether it pays out or not.
pub const ENTRY_COST: i64 = 1;
/// Payout amounts a slot machine can produce.
pub const REWARD_LADDER: [i64; 4] = [0, 1, 5, 100];
/// Chance in percent of each REWARD_LADDER value for the first machine.
pub const SLOT_A_PROBABILITIES: [f64; 4] = [50.0, 30.0, 15.0, 5.0];
/// Chance in percent of each REWARD_LADDER value for the second machine.
pub const SLOT_B_PROBABILITIES: [f64; 4] = [40.0, 35.0, 20.0, 5.0];
pub const SLOT_A_LABEL: &str = "Slot A";
pub const SLOT_B_LABEL: &str = "Slot B";
/// Probabilities are expressed in percentage points and must add up to this.
pub const PROBABILITY_TOTAL: f64 = 100.0;
/// Allowed floating point error when checking that probabilities add up.
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;
/// Returned when a roll does not land on any rung of the ladder.
pub const FALLBACK_PAYOUT: i64 = 0;
/// The exploration phase is EXPLORATION_NUMERATOR / EXPLORATION_DENOMINATOR
/// of the whole round budget. The rest is spent exploiting.
pub const EXPLORATION_NUMERATOR: u32 = 3;
pub const EXPLORATION_DENOMINATOR: u32 = 5;
/// Plays given to each machine by the fixed split strategy before exploiting.
pub const FIXED_SPLIT_PLAYS_PER_SIDE: u64 = 3;
/// Exploration weight of the upper confidence bound strategy.
pub const UCB_EXPLORATION_WEIGHT: f64 = std::f64::consts::SQRT_2;
/// Mixed into a master seed to derive one independent stream per machine.
pub const SEED_SPREAD: u64 = 0x9e37_79b9_7f4a_7c15;
pub const POLARS_MAX_COLS: &str = "12";
