//! Expense statistics.
//!
//! Four independent passes over the normalized expenses:
//! - By person (payer)
//! - By category
//! - By calendar month
//! - Grand total

pub mod directory;
pub mod service;
pub mod types;


pub use directory::{MemberDirectory, UNKNOWN_MEMBER_LABEL};
pub use service::StatisticsAggregator;
pub use types::*;
