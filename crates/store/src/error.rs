//! Store error types.

use potluck_core::expense::ExpenseValidationError;
use potluck_shared::AppError;
use potluck_shared::types::{ExpenseId, GroupId};
use thiserror::Error;

/// Errors that can occur while reading or writing the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Group not found.
    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),

    /// An expense breaks a business rule.
    #[error("Invalid expense {expense_id}: {source}")]
    InvalidExpense {
        /// Offending expense.
        expense_id: ExpenseId,
        /// The violated rule.
        source: ExpenseValidationError,
    },

    /// Filesystem error.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be (de)serialized.
    #[error("Storage format error: {0}")]
    Format(#[from] serde_json::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::GroupNotFound(id) => Self::NotFound(format!("group {id}")),
            StoreError::InvalidExpense { .. } => Self::Validation(message),
            StoreError::Io(_) | StoreError::Format(_) => Self::Storage(message),
        }
    }
}
