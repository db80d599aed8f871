//! Memoised lookups of users, groups and member roles.
//!
//! The same users and groups are usually referenced by many projects in one run, so
//! their lookups are cached for the lifetime of a [`LookupCache`]. Negative answers
//! (no such user) are cached as well.

use gitlab_client::{GitLabApi, GitLabResult, Group, MemberRole, User};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[cfg(test)]
#[path = "lookup_cache_tests.rs"]
mod tests;

#[derive(Debug, Default)]
struct CacheState {
    users: HashMap<String, Option<User>>,
    groups: HashMap<String, Option<Group>>,
    member_roles: HashMap<Option<u64>, Vec<MemberRole>>,
}

/// Cache of lookups made during a run. Keys are compared case-insensitively.
#[derive(Debug, Default)]
pub struct LookupCache {
    state: Mutex<CacheState>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Finds a user by username; `Ok(None)` when there is no such user.
    pub async fn user(&self, api: &dyn GitLabApi, username: &str) -> GitLabResult<Option<User>> {
        let key = username.to_lowercase();
        if let Some(cached) = self.state().users.get(&key) {
            return Ok(cached.clone());
        }

        debug!(username = username, "Looking up user");
        let user = api.find_user_by_username(username).await?;
        self.state().users.insert(key, user.clone());
        Ok(user)
    }

    /// Finds a group by full path; `Ok(None)` when there is no such group.
    pub async fn group(&self, api: &dyn GitLabApi, path: &str) -> GitLabResult<Option<Group>> {
        let key = path.to_lowercase();
        if let Some(cached) = self.state().groups.get(&key) {
            return Ok(cached.clone());
        }

        debug!(group = path, "Looking up group");
        let group = match api.get_group(path).await {
            Ok(group) => Some(group),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };
        self.state().groups.insert(key, group.clone());
        Ok(group)
    }

    /// Lists the custom member roles of a top-level group, or of the instance.
    pub async fn member_roles(
        &self,
        api: &dyn GitLabApi,
        group_id: Option<u64>,
    ) -> GitLabResult<Vec<MemberRole>> {
        if let Some(cached) = self.state().member_roles.get(&group_id) {
            return Ok(cached.clone());
        }

        let roles = api.list_member_roles(group_id).await?;
        self.state().member_roles.insert(group_id, roles.clone());
        Ok(roles)
    }
}
