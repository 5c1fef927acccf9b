//! Balance and settlement routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
};
use potluck_core::balance::{Balance, BalanceEngine};
use potluck_core::settlement::{Settlement, SettlementPlanner};
use potluck_shared::types::{CurrencyCode, GroupId, MemberId};
use rust_decimal::Decimal;
use serde::Serialize;

use super::group::load_normalized;
use crate::{AppState, error::error_response};

/// Creates the balance routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/groups/{group_id}/balance", get(get_group_balance))
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for a group's balances.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBalanceResponse {
    /// One entry per member, in member order.
    pub balances: Vec<BalanceResponse>,
    /// Suggested transfers.
    pub settlements: Vec<SettlementResponse>,
    /// Base currency of every amount.
    pub currency: CurrencyCode,
    /// Whether any expense was converted with a fallback or 1:1 rate.
    pub degraded: bool,
}

/// Member balance in response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    /// Member ID.
    pub member_id: MemberId,
    /// Total paid.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_paid: Decimal,
    /// Fair share.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_share: Decimal,
    /// Net balance.
    #[serde(with = "rust_decimal::serde::float")]
    pub net: Decimal,
}

impl From<Balance> for BalanceResponse {
    fn from(b: Balance) -> Self {
        Self {
            member_id: b.member_id,
            total_paid: b.total_paid,
            total_share: b.total_share,
            net: b.net,
        }
    }
}

/// Settlement in response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResponse {
    /// Paying member.
    pub from_member_id: MemberId,
    /// Receiving member.
    pub to_member_id: MemberId,
    /// Amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl From<Settlement> for SettlementResponse {
    fn from(s: Settlement) -> Self {
        Self {
            from_member_id: s.from_member_id,
            to_member_id: s.to_member_id,
            amount: s.amount,
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /groups/{group_id}/balance
async fn get_group_balance(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
) -> Response {
    let (group, normalized) = match load_normalized(&state, &group_id).await {
        Ok(loaded) => loaded,
        Err(e) => return error_response(&e),
    };

    let balances = BalanceEngine::compute_balances(&group.member_ids(), &normalized.expenses);
    let settlements = SettlementPlanner::plan_settlements(&balances);

    Json(GroupBalanceResponse {
        balances: balances.into_iter().map(Into::into).collect(),
        settlements: settlements.into_iter().map(Into::into).collect(),
        currency: group.base_currency,
        degraded: normalized.degraded,
    })
    .into_response()
}
