//! Membership domain types.
//!
//! This module contains the access level type shared by members, group shares and SAML
//! links, the member representation returned by GitLab, and the payloads used to add,
//! change and share memberships.

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[cfg(test)]
#[path = "member_tests.rs"]
mod tests;

/// A GitLab access level.
///
/// GitLab transports access levels as integers. Configuration files may also use the
/// role names (`developer`, `maintainer`, ...), which are accepted case-insensitively
/// when deserializing. Serialization always produces the integer.
///
/// # Examples
///
/// ```rust
/// use gitlab_client::AccessLevel;
///
/// assert_eq!(AccessLevel::from_name("Maintainer"), Some(AccessLevel::MAINTAINER));
/// assert_eq!(AccessLevel::MAINTAINER.value(), 40);
/// assert_eq!(AccessLevel::try_from(30), Ok(AccessLevel::DEVELOPER));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccessLevel(u32);

const KNOWN_LEVELS: [(u32, &str); 8] = [
    (0, "no_access"),
    (5, "minimal"),
    (10, "guest"),
    (15, "planner"),
    (20, "reporter"),
    (30, "developer"),
    (40, "maintainer"),
    (50, "owner"),
];

impl AccessLevel {
    pub const NO_ACCESS: AccessLevel = AccessLevel(0);
    pub const MINIMAL: AccessLevel = AccessLevel(5);
    pub const GUEST: AccessLevel = AccessLevel(10);
    pub const PLANNER: AccessLevel = AccessLevel(15);
    pub const REPORTER: AccessLevel = AccessLevel(20);
    pub const DEVELOPER: AccessLevel = AccessLevel(30);
    pub const MAINTAINER: AccessLevel = AccessLevel(40);
    pub const OWNER: AccessLevel = AccessLevel(50);

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Looks up an access level by its role name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        KNOWN_LEVELS
            .iter()
            .find(|(_, known)| *known == name)
            .map(|(value, _)| AccessLevel(*value))
    }

    pub fn name(&self) -> &'static str {
        KNOWN_LEVELS
            .iter()
            .find(|(value, _)| *value == self.0)
            .map(|(_, name)| *name)
            .unwrap_or("unknown")
    }
}

impl TryFrom<u32> for AccessLevel {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if KNOWN_LEVELS.iter().any(|(known, _)| *known == value) {
            Ok(AccessLevel(value))
        } else {
            Err(format!("{} is not a valid GitLab access level", value))
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.0)
    }
}

impl Serialize for AccessLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for AccessLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AccessLevelVisitor;

        impl de::Visitor<'_> for AccessLevelVisitor {
            type Value = AccessLevel;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an access level number or role name")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<AccessLevel, E> {
                let value = u32::try_from(value).map_err(E::custom)?;
                AccessLevel::try_from(value).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<AccessLevel, E> {
                let value = u32::try_from(value).map_err(E::custom)?;
                AccessLevel::try_from(value).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<AccessLevel, E> {
                if let Ok(number) = value.trim().parse::<u32>() {
                    return AccessLevel::try_from(number).map_err(E::custom);
                }
                AccessLevel::from_name(value).ok_or_else(|| {
                    E::custom(format!("'{}' is not a valid GitLab access level", value))
                })
            }
        }

        deserializer.deserialize_any(AccessLevelVisitor)
    }
}

/// Reference to a custom member role as embedded in member listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRoleRef {
    pub id: u64,
}

/// A direct member of a project or group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// The user id of the member
    pub id: u64,
    pub username: String,
    pub access_level: AccessLevel,
    #[serde(default)]
    pub expires_at: Option<NaiveDate>,
    #[serde(default)]
    pub member_role: Option<MemberRoleRef>,
}

impl Member {
    pub fn member_role_id(&self) -> Option<u64> {
        self.member_role.as_ref().map(|role| role.id)
    }
}

/// Payload for adding a user as a direct member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddMemberPayload {
    pub user_id: u64,
    pub access_level: AccessLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_role_id: Option<u64>,
}

/// Payload for changing an existing membership.
///
/// `expires_at` and `member_role_id` are always sent, so a removed expiry date or custom
/// role is cleared remotely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateMemberPayload {
    pub access_level: AccessLevel,
    pub expires_at: Option<NaiveDate>,
    pub member_role_id: Option<u64>,
}

/// Payload for sharing a project or group with another group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareWithGroupPayload {
    pub group_id: u64,
    pub group_access: AccessLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<NaiveDate>,
}
