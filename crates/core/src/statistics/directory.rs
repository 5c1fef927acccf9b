//! Member display-name lookup.

use std::collections::{BTreeMap, HashMap};

use potluck_shared::types::MemberId;

/// Label used when a member id cannot be resolved.
pub const UNKNOWN_MEMBER_LABEL: &str = "Unknown member";

/// Resolves member ids to display names.
pub trait MemberDirectory {
    /// Returns the display name for `member_id`, if known.
    fn display_name(&self, member_id: &MemberId) -> Option<String>;

    /// Returns the display name, or a placeholder when unknown.
    fn display_name_or_placeholder(&self, member_id: &MemberId) -> String {
        self.display_name(member_id)
            .unwrap_or_else(|| UNKNOWN_MEMBER_LABEL.to_string())
    }
}

impl MemberDirectory for HashMap<MemberId, String> {
    fn display_name(&self, member_id: &MemberId) -> Option<String> {
        self.get(member_id).cloned()
    }
}

impl MemberDirectory for BTreeMap<MemberId, String> {
    fn display_name(&self, member_id: &MemberId) -> Option<String> {
        self.get(member_id).cloned()
    }
}
