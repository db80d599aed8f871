//! Direct memberships and group shares (`members`, `group_members`).

use async_trait::async_trait;
use config_manager::settings::{parse_section, MemberRoleSpec, MembersConfig};
use gitlab_client::{
    AddMemberPayload, EntityKind, GitLabResult, Member, Scope, ShareWithGroupPayload,
    SharedGroup, UpdateMemberPayload,
};
use serde_yaml::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::{
    ApplyResult, GitLabFormError, GitLabFormResult, Processor, ProcessorContext, Target,
};

#[cfg(test)]
#[path = "members_tests.rs"]
mod tests;

/// Reconciles users and shared groups of a project or group.
///
/// Users are matched by username and groups by full path, both ignoring case. With
/// `enforce`, members and shares missing from the configuration are removed; bots are
/// kept when `keep_bots` is set.
pub struct MembersProcessor {
    kind: EntityKind,
}

impl MembersProcessor {
    pub fn new(kind: EntityKind) -> Self {
        Self { kind }
    }

    fn parse(&self, target: &Target, section: &Value) -> GitLabFormResult<MembersConfig> {
        let config: MembersConfig = parse_section(self.section(), section)?;
        if config.is_noop() {
            return Err(GitLabFormError::InvalidInput {
                reason: format!(
                    "'{}' for {} lists no users and no groups and does not enforce",
                    self.section(),
                    target
                ),
            });
        }
        Ok(config)
    }

    async fn process_groups(
        &self,
        ctx: &ProcessorContext,
        target: &Target,
        config: &MembersConfig,
        result: &mut ApplyResult,
    ) {
        let api = ctx.api.as_ref();
        let scope = target.scope();
        let current: HashMap<String, &SharedGroup> = target
            .shared_with_groups()
            .iter()
            .map(|share| (share.group_full_path.to_lowercase(), share))
            .collect();

        for (group_path, desired) in &config.groups {
            let existing = current.get(&group_path.to_lowercase()).copied();
            if let Some(existing) = existing {
                if existing.group_access_level == desired.group_access
                    && existing.expires_at == desired.expires_at
                {
                    debug!(entity = %target, group = group_path.as_str(), "Share unchanged");
                    result.skipped += 1;
                    continue;
                }
            }

            let group = match ctx.cache.group(api, group_path).await {
                Ok(Some(group)) => group,
                Ok(None) => {
                    warn!(
                        entity = %target,
                        group = group_path.as_str(),
                        "Group not found, skipping share"
                    );
                    result.skipped += 1;
                    continue;
                }
                Err(e) => {
                    warn!(group = group_path.as_str(), error = %e, "Failed to look up group");
                    result.record_failure(group_path.as_str());
                    continue;
                }
            };

            let payload = ShareWithGroupPayload {
                group_id: group.id,
                group_access: desired.group_access,
                expires_at: desired.expires_at,
            };
            let outcome = self
                .reshare(ctx, &scope, existing.map(|share| share.group_id), &payload)
                .await;
            match outcome {
                Ok(()) if existing.is_some() => {
                    info!(
                        entity = %target,
                        group = group_path.as_str(),
                        access_level = %desired.group_access,
                        "Updated group share"
                    );
                    result.updated += 1;
                }
                Ok(()) => {
                    info!(
                        entity = %target,
                        group = group_path.as_str(),
                        access_level = %desired.group_access,
                        "Shared with group"
                    );
                    result.created += 1;
                }
                Err(e) => {
                    warn!(group = group_path.as_str(), error = %e, "Failed to share with group");
                    result.record_failure(group_path.as_str());
                }
            }
        }

        if !config.enforce {
            return;
        }

        let configured: HashSet<String> =
            config.groups.keys().map(|path| path.to_lowercase()).collect();
        for share in target.shared_with_groups() {
            if configured.contains(&share.group_full_path.to_lowercase()) {
                continue;
            }
            let outcome = ctx
                .mutate(
                    "unshare group",
                    api.unshare_with_group(&scope, share.group_id),
                )
                .await;
            match outcome {
                Ok(()) => {
                    info!(
                        entity = %target,
                        group = share.group_full_path.as_str(),
                        "Removed group share not in configuration"
                    );
                    result.deleted += 1;
                }
                Err(e) => {
                    warn!(group = share.group_full_path.as_str(), error = %e, "Failed to unshare group");
                    result.record_failure(share.group_full_path.as_str());
                }
            }
        }
    }

    /// GitLab cannot edit a share, so a changed one is removed and created again.
    async fn reshare(
        &self,
        ctx: &ProcessorContext,
        scope: &Scope,
        existing_group_id: Option<u64>,
        payload: &ShareWithGroupPayload,
    ) -> GitLabResult<()> {
        let api = ctx.api.as_ref();
        if let Some(group_id) = existing_group_id {
            ctx.mutate("unshare group", api.unshare_with_group(scope, group_id))
                .await?;
        }
        ctx.mutate("share with group", api.share_with_group(scope, payload))
            .await
    }

    async fn process_users(
        &self,
        ctx: &ProcessorContext,
        target: &Target,
        config: &MembersConfig,
        result: &mut ApplyResult,
    ) -> GitLabFormResult<()> {
        let api = ctx.api.as_ref();
        let scope = target.scope();
        let members = api.list_members(&scope).await?;
        let current: HashMap<String, &Member> = members
            .iter()
            .map(|member| (member.username.to_lowercase(), member))
            .collect();

        for (username, desired) in &config.users {
            let member_role_id = match &desired.member_role {
                None => None,
                Some(spec) => match self.resolve_member_role(ctx, target, spec).await {
                    Ok(Some(id)) => Some(id),
                    Ok(None) => {
                        warn!(
                            username = username.as_str(),
                            member_role = ?spec,
                            "Member role not found"
                        );
                        result.record_failure(username.as_str());
                        continue;
                    }
                    Err(e) => {
                        warn!(username = username.as_str(), error = %e, "Failed to resolve member role");
                        result.record_failure(username.as_str());
                        continue;
                    }
                },
            };

            if let Some(existing) = current.get(&username.to_lowercase()) {
                if existing.access_level == desired.access_level
                    && existing.expires_at == desired.expires_at
                    && existing.member_role_id() == member_role_id
                {
                    debug!(entity = %target, username = username.as_str(), "Member unchanged");
                    result.skipped += 1;
                    continue;
                }

                let payload = UpdateMemberPayload {
                    access_level: desired.access_level,
                    expires_at: desired.expires_at,
                    member_role_id,
                };
                match ctx
                    .mutate("update member", api.update_member(&scope, existing.id, &payload))
                    .await
                {
                    Ok(()) => {
                        info!(
                            entity = %target,
                            username = username.as_str(),
                            access_level = %desired.access_level,
                            "Updated member"
                        );
                        result.updated += 1;
                    }
                    Err(e) => {
                        warn!(username = username.as_str(), error = %e, "Failed to update member");
                        result.record_failure(username.as_str());
                    }
                }
                continue;
            }

            let user = match ctx.cache.user(api, username).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    warn!(
                        entity = %target,
                        username = username.as_str(),
                        "User not found, skipping"
                    );
                    result.skipped += 1;
                    continue;
                }
                Err(e) => {
                    warn!(username = username.as_str(), error = %e, "Failed to look up user");
                    result.record_failure(username.as_str());
                    continue;
                }
            };

            let payload = AddMemberPayload {
                user_id: user.id,
                access_level: desired.access_level,
                expires_at: desired.expires_at,
                member_role_id,
            };
            match ctx
                .mutate("add member", api.add_member(&scope, &payload))
                .await
            {
                Ok(()) => {
                    info!(
                        entity = %target,
                        username = username.as_str(),
                        access_level = %desired.access_level,
                        "Added member"
                    );
                    result.created += 1;
                }
                Err(e) => {
                    warn!(username = username.as_str(), error = %e, "Failed to add member");
                    result.record_failure(username.as_str());
                }
            }
        }

        if config.enforce {
            let configured: HashSet<String> =
                config.users.keys().map(|name| name.to_lowercase()).collect();
            for member in &members {
                if configured.contains(&member.username.to_lowercase()) {
                    continue;
                }
                if config.keep_bots && self.is_bot(ctx, member).await {
                    debug!(username = member.username.as_str(), "Keeping bot member");
                    result.skipped += 1;
                    continue;
                }

                match ctx
                    .mutate("remove member", api.remove_member(&scope, member.id))
                    .await
                {
                    Ok(()) => {
                        info!(
                            entity = %target,
                            username = member.username.as_str(),
                            "Removed member not in configuration"
                        );
                        result.deleted += 1;
                    }
                    Err(e) => {
                        warn!(username = member.username.as_str(), error = %e, "Failed to remove member");
                        result.record_failure(member.username.as_str());
                    }
                }
            }
        }

        Ok(())
    }

    /// Resolves a member role reference to its id. Names are looked up among the
    /// instance's roles, or the top-level group's roles on gitlab.com.
    async fn resolve_member_role(
        &self,
        ctx: &ProcessorContext,
        target: &Target,
        spec: &MemberRoleSpec,
    ) -> GitLabResult<Option<u64>> {
        let name = match spec {
            MemberRoleSpec::Id(id) => return Ok(Some(*id)),
            MemberRoleSpec::Name(name) => name,
        };

        let api = ctx.api.as_ref();
        let group_id = if api.is_saas() {
            match ctx.cache.group(api, target.root_namespace()).await? {
                Some(group) => Some(group.id),
                None => return Ok(None),
            }
        } else {
            None
        };

        let roles = ctx.cache.member_roles(api, group_id).await?;
        Ok(roles
            .iter()
            .find(|role| role.name.eq_ignore_ascii_case(name))
            .map(|role| role.id))
    }

    /// Unknown or failing lookups count as bots, so that `keep_bots` errs on the side
    /// of keeping the member.
    async fn is_bot(&self, ctx: &ProcessorContext, member: &Member) -> bool {
        match ctx.cache.user(ctx.api.as_ref(), &member.username).await {
            Ok(Some(user)) => user.bot,
            Ok(None) => true,
            Err(e) => {
                warn!(username = member.username.as_str(), error = %e, "Failed to look up member");
                true
            }
        }
    }
}

#[async_trait]
impl Processor for MembersProcessor {
    fn section(&self) -> &'static str {
        match self.kind {
            EntityKind::Project => "members",
            EntityKind::Group => "group_members",
        }
    }

    fn target_kind(&self) -> EntityKind {
        self.kind
    }

    fn validate(&self, target: &Target, section: &Value) -> GitLabFormResult<()> {
        self.parse(target, section).map(|_| ())
    }

    async fn process(
        &self,
        ctx: &ProcessorContext,
        target: &Target,
        section: &Value,
    ) -> GitLabFormResult<ApplyResult> {
        let config = self.parse(target, section)?;
        let mut result = ApplyResult::new();
        self.process_groups(ctx, target, &config, &mut result).await;
        self.process_users(ctx, target, &config, &mut result).await?;
        Ok(result)
    }
}
