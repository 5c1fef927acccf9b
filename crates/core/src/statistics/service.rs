//! Statistics aggregation service.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike};
use potluck_shared::types::{CurrencyCode, MemberId, round_money, round_percentage};
use rust_decimal::Decimal;

use super::directory::MemberDirectory;
use super::types::{
    CategoryStatistic, MonthStatistic, PersonStatistic, StatisticsSummary, TotalStatistic,
};
use crate::expense::Expense;

/// Label for expenses without a category.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Label for expenses whose timestamp is out of the calendar's range.
const UNKNOWN_MONTH: &str = "unknown";

/// Unrounded running sum and count. The sum saturates at `Decimal::MAX`.
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    total: Decimal,
    count: usize,
}

impl Tally {
    fn add(&mut self, amount: Decimal) {
        self.total = self.total.saturating_add(amount);
        self.count += 1;
    }
}

/// Service for aggregating expense statistics.
///
/// All passes read `normalized_amount`; running sums stay unrounded and are
/// rounded only when a result record is built.
pub struct StatisticsAggregator;

impl StatisticsAggregator {
    /// Spending per payer, largest total first.
    ///
    /// Payers with equal totals keep member-id order.
    #[must_use]
    pub fn by_person(
        expenses: &[Expense],
        directory: &dyn MemberDirectory,
    ) -> Vec<PersonStatistic> {
        let mut tallies: BTreeMap<&MemberId, Tally> = BTreeMap::new();
        for expense in expenses {
            tallies
                .entry(&expense.payer_id)
                .or_default()
                .add(expense.normalized_amount);
        }

        let mut stats: Vec<(Decimal, PersonStatistic)> = tallies
            .into_iter()
            .map(|(member_id, tally)| {
                (
                    tally.total,
                    PersonStatistic {
                        member_id: member_id.clone(),
                        name: directory.display_name_or_placeholder(member_id),
                        total: round_money(tally.total),
                        count: tally.count,
                    },
                )
            })
            .collect();

        stats.sort_by(|a, b| b.0.cmp(&a.0));
        stats.into_iter().map(|(_, stat)| stat).collect()
    }

    /// Spending per category, largest total first, with each category's
    /// share of the grand total.
    ///
    /// Missing or blank categories are reported as `"Uncategorized"`.
    #[must_use]
    pub fn by_category(expenses: &[Expense]) -> Vec<CategoryStatistic> {
        let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();
        let mut grand_total = Decimal::ZERO;

        for expense in expenses {
            let category = expense
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_CATEGORY);
            tallies
                .entry(category)
                .or_default()
                .add(expense.normalized_amount);
            grand_total = grand_total.saturating_add(expense.normalized_amount);
        }

        let mut stats: Vec<(Decimal, CategoryStatistic)> = tallies
            .into_iter()
            .map(|(category, tally)| {
                let percentage = if grand_total.is_zero() {
                    Decimal::ZERO
                } else {
                    round_percentage(tally.total / grand_total * Decimal::ONE_HUNDRED)
                };
                (
                    tally.total,
                    CategoryStatistic {
                        category: category.to_string(),
                        total: round_money(tally.total),
                        count: tally.count,
                        percentage,
                    },
                )
            })
            .collect();

        stats.sort_by(|a, b| b.0.cmp(&a.0));
        stats.into_iter().map(|(_, stat)| stat).collect()
    }

    /// Spending per UTC calendar month, oldest first.
    ///
    /// Uses the expense timestamp, or the record creation time when absent.
    #[must_use]
    pub fn by_month(expenses: &[Expense]) -> Vec<MonthStatistic> {
        let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();
        for expense in expenses {
            tallies
                .entry(month_key(expense.effective_timestamp_millis()))
                .or_default()
                .add(expense.normalized_amount);
        }

        tallies
            .into_iter()
            .map(|(month, tally)| MonthStatistic {
                month,
                total: round_money(tally.total),
                count: tally.count,
            })
            .collect()
    }

    /// Grand total, count and average in the group's base currency.
    #[must_use]
    pub fn total(expenses: &[Expense], currency: CurrencyCode) -> TotalStatistic {
        let mut tally = Tally::default();
        for expense in expenses {
            tally.add(expense.normalized_amount);
        }

        let average = if tally.count == 0 {
            Decimal::ZERO
        } else {
            tally.total / Decimal::from(tally.count)
        };

        TotalStatistic {
            total: round_money(tally.total),
            count: tally.count,
            average: round_money(average),
            currency,
        }
    }

    /// All four statistics.
    #[must_use]
    pub fn summary(
        expenses: &[Expense],
        directory: &dyn MemberDirectory,
        currency: CurrencyCode,
    ) -> StatisticsSummary {
        StatisticsSummary {
            by_person: Self::by_person(expenses, directory),
            by_category: Self::by_category(expenses),
            by_month: Self::by_month(expenses),
            total: Self::total(expenses, currency),
        }
    }
}

/// `YYYY-MM` of a Unix-millis timestamp, in UTC.
///
/// Years outside 0000..=9999 have no four-digit key that sorts
/// chronologically and map to `"unknown"`.
fn month_key(timestamp_millis: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_millis)
        .filter(|at| (0..=9999).contains(&at.year()))
        .map_or_else(
            || UNKNOWN_MONTH.to_string(),
            |at| format!("{:04}-{:02}", at.year(), at.month()),
        )
}
