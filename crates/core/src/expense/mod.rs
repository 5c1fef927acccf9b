//! Expense records.
//!
//! A `NewExpense` is what callers store: amount and currency as entered.
//! An `Expense` is the same record after the currency normalizer has
//! expressed it in the group's base currency.

pub mod types;
pub mod validation;

pub use types::{Expense, NewExpense};
pub use validation::{ExpenseValidationError, MAX_EXPENSE_AMOUNT, validate_expense};
