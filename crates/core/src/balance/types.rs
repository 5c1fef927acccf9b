//! Balance types.

use potluck_shared::types::{MemberId, round_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A member's position in the group, in the base currency.
///
/// Positive `net` means the member is owed money; negative means they owe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// The member.
    pub member_id: MemberId,
    /// Sum of everything the member paid.
    pub total_paid: Decimal,
    /// The member's fair share of group spend.
    pub total_share: Decimal,
    /// `total_paid - total_share`.
    pub net: Decimal,
}

impl Balance {
    /// Finalizes a balance from unrounded totals.
    ///
    /// `net` is taken from the unrounded totals before every field is
    /// rounded to 2 decimal places.
    #[must_use]
    pub fn from_totals(member_id: MemberId, total_paid: Decimal, total_share: Decimal) -> Self {
        Self {
            member_id,
            total_paid: round_money(total_paid),
            total_share: round_money(total_share),
            net: round_money(total_paid - total_share),
        }
    }
}
