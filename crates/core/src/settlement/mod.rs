//! Settlement planning.
//!
//! Turns net balances into a short list of member-to-member transfers by
//! repeatedly matching the largest creditor with the largest debtor.

pub mod planner;
pub mod types;

#[cfg(test)]
mod props;

pub use planner::SettlementPlanner;
pub use types::Settlement;
