//! Property-based tests for settlement planning.
//!
//! - Correctness: applying the settlements drives every net to zero
//! - Count bound: at most members - 1 settlements
//! - Every settlement is positive and above the negligible threshold

use potluck_shared::types::{CurrencyCode, ExpenseId, MemberId, NEGLIGIBLE_AMOUNT};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::planner::SettlementPlanner;
use crate::balance::{Balance, BalanceEngine};
use crate::expense::Expense;

/// Strategy to generate balances that sum to exactly zero.
///
/// Nets are whole multiples of 2 cents so no member sits inside the
/// negligible band except at exactly zero.
fn zero_sum_balances() -> impl Strategy<Value = Vec<Balance>> {
    prop::collection::vec(-50_000i64..50_000i64, 1..15).prop_map(|halves| {
        let mut nets: Vec<Decimal> = halves.iter().map(|h| Decimal::new(h * 2, 2)).collect();
        let sum: Decimal = nets.iter().copied().sum();
        nets.push(-sum);
        nets.into_iter()
            .enumerate()
            .map(|(i, net)| Balance {
                member_id: MemberId::from_string(format!("m{i}")),
                total_paid: Decimal::ZERO,
                total_share: Decimal::ZERO,
                net,
            })
            .collect()
    })
}

/// Strategy to generate members with expenses paid by them.
fn group() -> impl Strategy<Value = (Vec<MemberId>, Vec<Expense>)> {
    (1usize..10).prop_flat_map(|member_count| {
        let expenses = prop::collection::vec((0..member_count, 1i64..1_000_000i64), 0..30);
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
                        participant_ids: std::iter::once(members[payer].clone()).collect(),
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

    /// *For any* zero-sum balances, applying the settlements SHALL leave
    /// every member within 0.01 of zero.
    #[test]
    fn prop_settlements_zero_out_balances(balances in zero_sum_balances()) {
        let settlements = SettlementPlanner::plan_settlements(&balances);
        let after = SettlementPlanner::apply(&balances, &settlements);
        for (member_id, net) in after {
            prop_assert!(
                net.abs() <= NEGLIGIBLE_AMOUNT,
                "{} left with {}", member_id, net
            );
        }
    }

    /// *For any* balances, there SHALL be at most members - 1 settlements.
    #[test]
    fn prop_settlement_count_bound(balances in zero_sum_balances()) {
        let settlements = SettlementPlanner::plan_settlements(&balances);
        prop_assert!(settlements.len() < balances.len().max(1));
    }

    /// *For any* balances, every settlement SHALL exceed the negligible
    /// amount and never pay oneself.
    #[test]
    fn prop_settlements_are_meaningful(balances in zero_sum_balances()) {
        for settlement in SettlementPlanner::plan_settlements(&balances) {
            prop_assert!(settlement.amount > NEGLIGIBLE_AMOUNT);
            prop_assert_ne!(settlement.from_member_id, settlement.to_member_id);
        }
    }

    /// *For any* group, settling computed balances SHALL stay within the
    /// rounding tolerance and the count bound.
    #[test]
    fn prop_settles_computed_balances((members, expenses) in group()) {
        let balances = BalanceEngine::compute_balances(&members, &expenses);
        let settlements = SettlementPlanner::plan_settlements(&balances);
        prop_assert!(settlements.len() < members.len().max(1));

        let tolerance = NEGLIGIBLE_AMOUNT * Decimal::from(members.len());
        for (member_id, net) in SettlementPlanner::apply(&balances, &settlements) {
            prop_assert!(net.abs() <= tolerance, "{} left with {}", member_id, net);
        }
    }

    /// *For any* balances, planning twice SHALL give identical settlements.
    #[test]
    fn prop_planning_is_deterministic(balances in zero_sum_balances()) {
        prop_assert_eq!(
            SettlementPlanner::plan_settlements(&balances),
            SettlementPlanner::plan_settlements(&balances)
        );
    }
}
