//! Balance computation.

use std::collections::{HashMap, HashSet};

use potluck_shared::types::MemberId;
use rust_decimal::Decimal;
use tracing::debug;

use super::types::Balance;
use crate::expense::Expense;

/// Computes member balances from normalized expenses.
pub struct BalanceEngine;

impl BalanceEngine {
    /// Computes each member's paid total, fair share, and net balance.
    ///
    /// The fair share is total group spend divided by the member count,
    /// regardless of each expense's participant list. Output follows the
    /// order of `members`; duplicate ids are counted once.
    ///
    /// An expense whose payer is not in `members` still counts toward total
    /// spend but credits nobody. Sums saturate at `Decimal::MAX`.
    #[must_use]
    pub fn compute_balances(members: &[MemberId], expenses: &[Expense]) -> Vec<Balance> {
        let mut seen = HashSet::with_capacity(members.len());
        let members: Vec<&MemberId> = members.iter().filter(|m| seen.insert(*m)).collect();

        if members.is_empty() {
            return Vec::new();
        }

        let mut paid: HashMap<&MemberId, Decimal> =
            members.iter().map(|m| (*m, Decimal::ZERO)).collect();
        let mut total_spend = Decimal::ZERO;

        for expense in expenses {
            total_spend = total_spend.saturating_add(expense.normalized_amount);
            match paid.get_mut(&expense.payer_id) {
                Some(total) => *total = total.saturating_add(expense.normalized_amount),
                None => debug!(
                    expense_id = %expense.id,
                    payer_id = %expense.payer_id,
                    "Expense payer is not a group member"
                ),
            }
        }

        let share = total_spend / Decimal::from(members.len());

        members
            .into_iter()
            .map(|member| {
                let total_paid = paid.get(member).copied().unwrap_or_default();
                Balance::from_totals(member.clone(), total_paid, share)
            })
            .collect()
    }
}
