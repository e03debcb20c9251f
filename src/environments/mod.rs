pub mod payout_source;

pub use payout_source::PayoutSource;
