//! # Models
//!
//! This module contains the entity models returned by the GitLab API that the
//! reconciliation works with: projects, groups, their namespaces and group shares,
//! users and custom member roles.
//!
//! Only the fields that GitLabForm reads are modelled; anything else in the API
//! responses is ignored during deserialization.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::AccessLevel;

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// The namespace (user or group) a project lives in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub id: u64,
    pub full_path: String,
    /// `group` or `user`
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub parent_id: Option<u64>,
}

/// A group this project or group has been shared with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedGroup {
    pub group_id: u64,
    pub group_name: String,
    pub group_full_path: String,
    pub group_access_level: AccessLevel,
    #[serde(default)]
    pub expires_at: Option<NaiveDate>,
}

/// Represents a GitLab project.
///
/// # Examples
///
/// ```rust
/// use gitlab_client::Project;
///
/// let project: Project = serde_json::from_str(r#"{
///     "id": 42,
///     "path_with_namespace": "platform/api",
///     "archived": false,
///     "namespace": { "id": 7, "full_path": "platform", "kind": "group" }
/// }"#).unwrap();
///
/// assert_eq!(project.id, 42);
/// assert!(project.shared_with_groups.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub path_with_namespace: String,
    #[serde(default)]
    pub archived: bool,
    pub namespace: Namespace,
    #[serde(default)]
    pub shared_with_groups: Vec<SharedGroup>,
}

/// Represents a GitLab group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    pub full_path: String,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub shared_with_groups: Vec<SharedGroup>,
}

/// Represents a GitLab user account.
///
/// # Examples
///
/// ```rust
/// use gitlab_client::User;
///
/// let user = User {
///     id: 12345,
///     username: "octocat".to_string(),
///     bot: false,
/// };
///
/// println!("User: {} (ID: {})", user.username, user.id);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct User {
    /// The unique numeric ID of the user
    pub id: u64,
    /// The login name of the user
    pub username: String,
    /// Whether the account is a bot (project/group access token users and similar)
    #[serde(default)]
    pub bot: bool,
}

/// A custom member role, defined either instance-wide or on a top-level group.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct MemberRole {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub group_id: Option<u64>,
}
