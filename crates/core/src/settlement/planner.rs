//! Greedy largest-creditor / largest-debtor matching.
//!
//! Two max-heaps keyed by remaining amount. Each step pops the top of both,
//! moves `min(creditor, debtor)` and pushes back whichever side still has at
//! least the negligible amount left. Every step retires at least one party,
//! so a group of n members never needs more than n - 1 transfers.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use potluck_shared::types::{MemberId, NEGLIGIBLE_AMOUNT, round_money};
use rust_decimal::Decimal;

use super::types::Settlement;
use crate::balance::Balance;

/// A creditor or debtor with the amount still to settle.
///
/// Ordered by amount, then by input position so equal amounts pop in the
/// order they were given, as a stable descending sort would.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Party<'a> {
    remaining: Decimal,
    position: Reverse<usize>,
    member_id: &'a MemberId,
}

/// Plans transfers that zero out balances.
pub struct SettlementPlanner;

impl SettlementPlanner {
    /// Produces transfers that bring every balance within the negligible
    /// amount of zero.
    ///
    /// Members with `|net| <= 0.01` take no part. Amounts are rounded to
    /// 2 decimal places when each settlement is emitted; the running
    /// remainders stay unrounded.
    #[must_use]
    pub fn plan_settlements(balances: &[Balance]) -> Vec<Settlement> {
        let mut creditors = BinaryHeap::new();
        let mut debtors = BinaryHeap::new();

        for (position, balance) in balances.iter().enumerate() {
            if balance.net > NEGLIGIBLE_AMOUNT {
                creditors.push(Party {
                    remaining: balance.net,
                    position: Reverse(position),
                    member_id: &balance.member_id,
                });
            } else if balance.net < -NEGLIGIBLE_AMOUNT {
                debtors.push(Party {
                    remaining: -balance.net,
                    position: Reverse(position),
                    member_id: &balance.member_id,
                });
            }
        }

        let mut settlements = Vec::new();

        while let (Some(mut creditor), Some(mut debtor)) = (creditors.pop(), debtors.pop()) {
            let transfer = creditor.remaining.min(debtor.remaining);

            if transfer > NEGLIGIBLE_AMOUNT {
                settlements.push(Settlement {
                    from_member_id: debtor.member_id.clone(),
                    to_member_id: creditor.member_id.clone(),
                    amount: round_money(transfer),
                });
            }

            creditor.remaining -= transfer;
            debtor.remaining -= transfer;

            if creditor.remaining >= NEGLIGIBLE_AMOUNT {
                creditors.push(creditor);
            }
            if debtor.remaining >= NEGLIGIBLE_AMOUNT {
                debtors.push(debtor);
            }
        }

        settlements
    }

    /// Applies settlements to balances, returning the resulting nets in
    /// balance order. A settlement reduces what the payer owes and what the
    /// receiver is owed.
    #[must_use]
    pub fn apply(balances: &[Balance], settlements: &[Settlement]) -> Vec<(MemberId, Decimal)> {
        let mut nets: Vec<(MemberId, Decimal)> = balances
            .iter()
            .map(|b| (b.member_id.clone(), b.net))
            .collect();

        for settlement in settlements {
            for (member_id, net) in &mut nets {
                if *member_id == settlement.from_member_id {
                    *net += settlement.amount;
                } else if *member_id == settlement.to_member_id {
                    *net -= settlement.amount;
                }
            }
        }

        nets
    }
}
