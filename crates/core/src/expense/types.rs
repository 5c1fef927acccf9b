//! Expense data types.

use std::collections::BTreeSet;

use potluck_shared::types::{CurrencyCode, ExpenseId, MemberId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An expense as entered by a member, before currency normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    /// Expense ID.
    pub id: ExpenseId,
    /// Member who paid.
    pub payer_id: MemberId,
    /// Amount paid, in `currency`. Always positive.
    pub amount: Decimal,
    /// Currency the expense was paid in.
    pub currency: CurrencyCode,
    /// Members the expense was for.
    pub participant_ids: BTreeSet<MemberId>,
    /// Free-form category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// When the expense happened (Unix millis).
    #[serde(default)]
    pub timestamp_millis: Option<i64>,
    /// When the record was created (Unix millis).
    pub created_at_millis: i64,
}

/// An expense with its amount expressed in the group's base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Expense ID.
    pub id: ExpenseId,
    /// Member who paid.
    pub payer_id: MemberId,
    /// Amount paid, in `currency`.
    pub amount: Decimal,
    /// Currency the expense was paid in.
    pub currency: CurrencyCode,
    /// The owning group's base currency.
    pub group_base_currency: CurrencyCode,
    /// `amount` converted into `group_base_currency`. Unrounded.
    pub normalized_amount: Decimal,
    /// Members the expense was for.
    pub participant_ids: BTreeSet<MemberId>,
    /// Free-form category label.
    pub category: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// When the expense happened (Unix millis).
    pub timestamp_millis: Option<i64>,
    /// When the record was created (Unix millis).
    pub created_at_millis: i64,
    /// Whether `normalized_amount` came from a fallback or 1:1 rate.
    pub degraded: bool,
}

impl Expense {
    /// Builds a normalized expense from its raw form.
    #[must_use]
    pub fn from_new(
        expense: NewExpense,
        group_base_currency: CurrencyCode,
        normalized_amount: Decimal,
        degraded: bool,
    ) -> Self {
        Self {
            id: expense.id,
            payer_id: expense.payer_id,
            amount: expense.amount,
            currency: expense.currency,
            group_base_currency,
            normalized_amount,
            participant_ids: expense.participant_ids,
            category: expense.category,
            description: expense.description,
            timestamp_millis: expense.timestamp_millis,
            created_at_millis: expense.created_at_millis,
            degraded,
        }
    }

    /// The time the expense is reported under: its own timestamp, or the
    /// record creation time when absent.
    #[must_use]
    pub fn effective_timestamp_millis(&self) -> i64 {
        self.timestamp_millis.unwrap_or(self.created_at_millis)
    }
}
