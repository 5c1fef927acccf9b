//! Core business logic for Potluck.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, balance rules, and calculations live here.
//!
//! # Modules
//!
//! - `expense` - Expense records before and after currency normalization
//! - `currency` - Exchange rates, caching, fallback table and normalization
//! - `balance` - Per-member paid / fair share / net balances
//! - `settlement` - Greedy transfer planning that zeroes out balances
//! - `statistics` - Person, category, month and total breakdowns

pub mod balance;
pub mod currency;
pub mod expense;
pub mod settlement;
pub mod statistics;
