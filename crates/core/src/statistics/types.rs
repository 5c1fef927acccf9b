//! Statistics data types.

use potluck_shared::types::{CurrencyCode, MemberId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Spending by one payer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonStatistic {
    /// Payer.
    pub member_id: MemberId,
    /// Payer display name.
    pub name: String,
    /// Total paid, rounded to 2 decimals.
    pub total: Decimal,
    /// Number of expenses paid.
    pub count: usize,
}

/// Spending in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStatistic {
    /// Category label.
    pub category: String,
    /// Total spent, rounded to 2 decimals.
    pub total: Decimal,
    /// Number of expenses.
    pub count: usize,
    /// Share of the grand total, in percent with 1 decimal.
    pub percentage: Decimal,
}

/// Spending in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthStatistic {
    /// `YYYY-MM`.
    pub month: String,
    /// Total spent, rounded to 2 decimals.
    pub total: Decimal,
    /// Number of expenses.
    pub count: usize,
}

/// Grand totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalStatistic {
    /// Grand total, rounded to 2 decimals.
    pub total: Decimal,
    /// Number of expenses.
    pub count: usize,
    /// `total / count`, or 0 without expenses. Rounded to 2 decimals.
    pub average: Decimal,
    /// Base currency all figures are expressed in.
    pub currency: CurrencyCode,
}

/// Every statistic at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSummary {
    /// By payer, largest first.
    pub by_person: Vec<PersonStatistic>,
    /// By category, largest first.
    pub by_category: Vec<CategoryStatistic>,
    /// By month, oldest first.
    pub by_month: Vec<MonthStatistic>,
    /// Grand totals.
    pub total: TotalStatistic,
}
