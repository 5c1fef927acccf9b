//! Per-member balances.
//!
//! Every member's fair share is the group's total spend divided equally
//! across all members; net = paid - share.

pub mod engine;
pub mod types;

#[cfg(test)]
mod props;

pub use engine::BalanceEngine;
pub use types::Balance;
