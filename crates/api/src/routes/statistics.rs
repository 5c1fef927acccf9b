//! Statistics routes.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use potluck_core::statistics::{
    CategoryStatistic, MonthStatistic, PersonStatistic, StatisticsAggregator, StatisticsSummary,
    TotalStatistic,
};
use potluck_shared::AppError;
use potluck_shared::types::{CurrencyCode, GroupId, MemberId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::group::load_normalized;
use crate::{AppState, error::error_response};

/// Creates the statistics routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/groups/{group_id}/statistics", get(get_group_statistics))
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for group statistics.
#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    /// `person`, `category`, `month`, `total` or `summary` (default).
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Which breakdown to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatisticsKind {
    /// By payer.
    Person,
    /// By category.
    Category,
    /// By calendar month.
    Month,
    /// Grand totals.
    Total,
    /// Everything.
    Summary,
}

impl FromStr for StatisticsKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "person" => Ok(Self::Person),
            "category" => Ok(Self::Category),
            "month" => Ok(Self::Month),
            "total" => Ok(Self::Total),
            "summary" => Ok(Self::Summary),
            other => Err(AppError::Validation(format!(
                "unknown statistics type '{other}', expected person, category, month, total or summary"
            ))),
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Per-payer statistic in response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonStatisticResponse {
    /// Payer.
    pub member_id: MemberId,
    /// Payer display name.
    pub name: String,
    /// Total paid.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Number of expenses.
    pub count: usize,
}

/// Per-category statistic in response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStatisticResponse {
    /// Category label.
    pub category: String,
    /// Total spent.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Number of expenses.
    pub count: usize,
    /// Share of the grand total, in percent.
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
}

/// Per-month statistic in response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthStatisticResponse {
    /// `YYYY-MM`.
    pub month: String,
    /// Total spent.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Number of expenses.
    pub count: usize,
}

/// Grand totals in response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalStatisticResponse {
    /// Grand total.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Number of expenses.
    pub count: usize,
    /// Average expense.
    #[serde(with = "rust_decimal::serde::float")]
    pub average: Decimal,
    /// Base currency.
    pub currency: CurrencyCode,
}

/// Every statistic in response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSummaryResponse {
    /// By payer.
    pub by_person: Vec<PersonStatisticResponse>,
    /// By category.
    pub by_category: Vec<CategoryStatisticResponse>,
    /// By month.
    pub by_month: Vec<MonthStatisticResponse>,
    /// Grand totals.
    pub total: TotalStatisticResponse,
}

impl From<PersonStatistic> for PersonStatisticResponse {
    fn from(s: PersonStatistic) -> Self {
        Self {
            member_id: s.member_id,
            name: s.name,
            total: s.total,
            count: s.count,
        }
    }
}

impl From<CategoryStatistic> for CategoryStatisticResponse {
    fn from(s: CategoryStatistic) -> Self {
        Self {
            category: s.category,
            total: s.total,
            count: s.count,
            percentage: s.percentage,
        }
    }
}

impl From<MonthStatistic> for MonthStatisticResponse {
    fn from(s: MonthStatistic) -> Self {
        Self {
            month: s.month,
            total: s.total,
            count: s.count,
        }
    }
}

impl From<TotalStatistic> for TotalStatisticResponse {
    fn from(s: TotalStatistic) -> Self {
        Self {
            total: s.total,
            count: s.count,
            average: s.average,
            currency: s.currency,
        }
    }
}

impl From<StatisticsSummary> for StatisticsSummaryResponse {
    fn from(s: StatisticsSummary) -> Self {
        Self {
            by_person: convert_all(s.by_person),
            by_category: convert_all(s.by_category),
            by_month: convert_all(s.by_month),
            total: s.total.into(),
        }
    }
}

fn convert_all<T, R: From<T>>(items: Vec<T>) -> Vec<R> {
    items.into_iter().map(R::from).collect()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /groups/{group_id}/statistics
async fn get_group_statistics(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
    Query(query): Query<StatisticsQuery>,
) -> Response {
    let kind = match query.kind.as_deref().map(StatisticsKind::from_str) {
        None => StatisticsKind::Summary,
        Some(Ok(kind)) => kind,
        Some(Err(e)) => return error_response(&e),
    };

    let (group, normalized) = match load_normalized(&state, &group_id).await {
        Ok(loaded) => loaded,
        Err(e) => return error_response(&e),
    };
    let expenses = &normalized.expenses;

    match kind {
        StatisticsKind::Person => Json(convert_all::<_, PersonStatisticResponse>(
            StatisticsAggregator::by_person(expenses, &group),
        ))
        .into_response(),
        StatisticsKind::Category => Json(convert_all::<_, CategoryStatisticResponse>(
            StatisticsAggregator::by_category(expenses),
        ))
        .into_response(),
        StatisticsKind::Month => Json(convert_all::<_, MonthStatisticResponse>(
            StatisticsAggregator::by_month(expenses),
        ))
        .into_response(),
        StatisticsKind::Total => Json(TotalStatisticResponse::from(StatisticsAggregator::total(
            expenses,
            group.base_currency,
        )))
        .into_response(),
        StatisticsKind::Summary => Json(StatisticsSummaryResponse::from(
            StatisticsAggregator::summary(expenses, &group, group.base_currency),
        ))
        .into_response(),
    }
}
