//! Shared types, errors, and configuration for Potluck.
//!
//! This crate provides common types used across all other crates:
//! - Currency codes and money rounding rules
//! - Typed IDs for groups, members, and expenses
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
