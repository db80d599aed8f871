//! Membership configuration (`members` and `group_members`).

use chrono::NaiveDate;
use gitlab_client::AccessLevel;
use indexmap::IndexMap;
use serde::Deserialize;

#[cfg(test)]
#[path = "member_tests.rs"]
mod tests;

/// Direct user memberships and group shares of a project or group.
///
/// ```yaml
/// members:
///   enforce: true
///   keep_bots: true
///   users:
///     jane.doe: { access_level: maintainer, expires_at: 2030-12-31 }
///   groups:
///     platform/security: { group_access: reporter }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MembersConfig {
    #[serde(default)]
    pub users: IndexMap<String, UserMemberConfig>,
    #[serde(default)]
    pub groups: IndexMap<String, GroupShareConfig>,
    /// Remove members and shares that are not configured
    #[serde(default)]
    pub enforce: bool,
    /// With `enforce`, leave bot users (access token users) in place
    #[serde(default)]
    pub keep_bots: bool,
}

impl MembersConfig {
    /// A section that neither lists anyone nor enforces anything has no effect and is
    /// almost certainly a mistake.
    pub fn is_noop(&self) -> bool {
        self.users.is_empty() && self.groups.is_empty() && !self.enforce
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserMemberConfig {
    pub access_level: AccessLevel,
    #[serde(default)]
    pub expires_at: Option<NaiveDate>,
    #[serde(default)]
    pub member_role: Option<MemberRoleSpec>,
}

/// A custom member role, given either by id or by name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MemberRoleSpec {
    Id(u64),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupShareConfig {
    #[serde(alias = "access_level")]
    pub group_access: AccessLevel,
    #[serde(default)]
    pub expires_at: Option<NaiveDate>,
}
