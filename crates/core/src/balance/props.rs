//! Property-based tests for balance computation.
//!
//! - Conservation: member nets sum to zero within rounding tolerance
//! - Idempotence: identical inputs give identical output
//! - Paid totals add up to group spend

use potluck_shared::types::{CurrencyCode, ExpenseId, MemberId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::engine::BalanceEngine;
use crate::expense::Expense;

/// Strategy to generate a member count and expenses paid by those members.
fn group() -> impl Strategy<Value = (Vec<MemberId>, Vec<Expense>)> {
    (1usize..12).prop_flat_map(|member_count| {
        let expenses = prop::collection::vec((0..member_count, 1i64..10_000_000i64), 0..40);
        (Just(member_count), expenses).prop_map(|(member_count, raw)| {
            let members: Vec<MemberId> = (0..member_count)
                .map(|i| MemberId::from_string(format!("m{i}")))
                .collect();
            let expenses = raw
                .into_iter()
                .enumerate()
                .map(|(i, (payer, cents))| {
                    let amount = Decimal::new(cents, 2);
                    Expense {
                        id: ExpenseId::from_string(format!("e{i}")),
                        payer_id: members[payer].clone(),
                        amount,
                        currency: CurrencyCode::USD,
                        group_base_currency: CurrencyCode::USD,
                        normalized_amount: amount,
                        participant_ids: members.iter().cloned().collect(),
                        category: None,
                        description: None,
                        timestamp_millis: None,
                        created_at_millis: 0,
                        degraded: false,
                    }
                })
                .collect();
            (members, expenses)
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* group, the sum of nets SHALL be within 0.01 x member count of zero.
    #[test]
    fn prop_balance_conservation((members, expenses) in group()) {
        let balances = BalanceEngine::compute_balances(&members, &expenses);
        let sum: Decimal = balances.iter().map(|b| b.net).sum();
        let tolerance = Decimal::new(1, 2) * Decimal::from(members.len());
        prop_assert!(sum.abs() <= tolerance, "net sum {} exceeds {}", sum, tolerance);
    }

    /// *For any* group, computing twice SHALL give identical balances.
    #[test]
    fn prop_compute_is_idempotent((members, expenses) in group()) {
        let first = BalanceEngine::compute_balances(&members, &expenses);
        let second = BalanceEngine::compute_balances(&members, &expenses);
        prop_assert_eq!(first, second);
    }

    /// *For any* group, paid totals SHALL add up to total spend.
    #[test]
    fn prop_paid_totals_match_spend((members, expenses) in group()) {
        let balances = BalanceEngine::compute_balances(&members, &expenses);
        let paid: Decimal = balances.iter().map(|b| b.total_paid).sum();
        let spend: Decimal = expenses.iter().map(|e| e.normalized_amount).sum();
        prop_assert_eq!(paid, spend);
        prop_assert_eq!(balances.len(), members.len());
    }
}
