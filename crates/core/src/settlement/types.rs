//! Settlement types.

use potluck_shared::types::MemberId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A suggested transfer from a debtor to a creditor, in the base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    /// Member who pays.
    pub from_member_id: MemberId,
    /// Member who receives.
    pub to_member_id: MemberId,
    /// Amount, rounded to 2 decimal places. Always above the negligible threshold.
    pub amount: Decimal,
}
