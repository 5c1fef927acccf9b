//! JSON-file store for groups and their expenses.
//!
//! This crate provides:
//! - Group and member records as persisted on disk
//! - A repository reading and atomically replacing `groups.json`

pub mod error;
pub mod models;
pub mod repository;

pub use error::StoreError;
pub use models::{GroupRecord, MemberRecord};
pub use repository::JsonStore;
