//! Group loading shared by the balance and statistics handlers.

use potluck_core::currency::NormalizedExpenses;
use potluck_shared::AppResult;
use potluck_shared::types::GroupId;
use potluck_store::GroupRecord;
use tracing::debug;

use crate::AppState;

/// Loads a group and normalizes its expenses into the group's base currency.
pub(crate) async fn load_normalized(
    state: &AppState,
    group_id: &GroupId,
) -> AppResult<(GroupRecord, NormalizedExpenses)> {
    let group = state.store.find_group(group_id).await?;
    let normalized = state
        .normalizer
        .normalize_all(group.base_currency, group.expenses.clone())
        .await;

    debug!(
        group_id = %group_id,
        expenses = normalized.expenses.len(),
        degraded = normalized.degraded,
        "Normalized group expenses"
    );

    Ok((group, normalized))
}
