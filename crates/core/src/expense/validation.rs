//! Business rule validation for expenses.

use std::collections::HashSet;

use potluck_shared::types::MemberId;
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::NewExpense;

/// Largest accepted expense amount (one quadrillion units of any currency).
pub const MAX_EXPENSE_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Validation errors for expenses.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpenseValidationError {
    /// Expense amount is zero or negative.
    #[error("Expense amount must be positive")]
    InvalidAmount,

    /// Expense amount exceeds `MAX_EXPENSE_AMOUNT`.
    #[error("Expense amount must not exceed {MAX_EXPENSE_AMOUNT}")]
    AmountTooLarge,

    /// Expense has no participants.
    #[error("Expense must have at least one participant")]
    NoParticipants,

    /// Payer is not a group member.
    #[error("Payer {0} is not a member of the group")]
    PayerNotMember(MemberId),

    /// A participant is not a group member.
    #[error("Participant {0} is not a member of the group")]
    ParticipantNotMember(MemberId),
}

/// Validates an expense against the members of its group.
///
/// The balance engine assumes every stored expense passed this check.
///
/// # Errors
///
/// Returns the first rule the expense violates.
pub fn validate_expense(
    expense: &NewExpense,
    members: &[MemberId],
) -> Result<(), ExpenseValidationError> {
    if expense.amount <= Decimal::ZERO {
        return Err(ExpenseValidationError::InvalidAmount);
    }

    if expense.amount > MAX_EXPENSE_AMOUNT {
        return Err(ExpenseValidationError::AmountTooLarge);
    }

    if expense.participant_ids.is_empty() {
        return Err(ExpenseValidationError::NoParticipants);
    }

    let members: HashSet<&MemberId> = members.iter().collect();

    if !members.contains(&expense.payer_id) {
        return Err(ExpenseValidationError::PayerNotMember(
            expense.payer_id.clone(),
        ));
    }

    if let Some(outsider) = expense
        .participant_ids
        .iter()
        .find(|participant| !members.contains(participant))
    {
        return Err(ExpenseValidationError::ParticipantNotMember(
            outsider.clone(),
        ));
    }

    Ok(())
}
