//! Records persisted in `groups.json`.

use potluck_core::expense::NewExpense;
use potluck_core::statistics::MemberDirectory;
use potluck_shared::types::{CurrencyCode, GroupId, MemberId};
use serde::{Deserialize, Serialize};

/// A group member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    /// Member ID.
    pub id: MemberId,
    /// Display name.
    pub name: String,
}

/// A group with its members and raw expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    /// Group ID.
    pub id: GroupId,
    /// Group name.
    pub name: String,
    /// Currency balances are reported in.
    pub base_currency: CurrencyCode,
    /// Members, in display order.
    #[serde(default)]
    pub members: Vec<MemberRecord>,
    /// Expenses as entered.
    #[serde(default)]
    pub expenses: Vec<NewExpense>,
}

impl GroupRecord {
    /// Member ids in display order.
    #[must_use]
    pub fn member_ids(&self) -> Vec<MemberId> {
        self.members.iter().map(|m| m.id.clone()).collect()
    }
}

impl MemberDirectory for GroupRecord {
    fn display_name(&self, member_id: &MemberId) -> Option<String> {
        self.members
            .iter()
            .find(|m| &m.id == member_id)
            .map(|m| m.name.clone())
    }
}

/// The whole store document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StoreDocument {
    #[serde(default)]
    pub(crate) groups: Vec<GroupRecord>,
}
