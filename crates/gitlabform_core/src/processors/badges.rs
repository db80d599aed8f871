//! Badges (`badges` and `group_badges`).

use async_trait::async_trait;
use config_manager::settings::{BadgeConfig, EnforcedMap};
use config_manager::ConfigurationError;
use gitlab_client::{BadgePayload, EntityKind};
use serde_yaml::Value;
use std::collections::HashSet;
use tracing::debug;

use super::{tally, Change};
use crate::{ApplyResult, GitLabFormResult, Processor, ProcessorContext, Target};

#[cfg(test)]
#[path = "badges_tests.rs"]
mod tests;

/// Reconciles the badges a project or group owns, identified by name.
///
/// Badges a project inherits from its groups are not listed, so they are never
/// touched by the project's `enforce`.
pub struct BadgesProcessor {
    kind: EntityKind,
}

impl BadgesProcessor {
    pub fn new(kind: EntityKind) -> Self {
        Self { kind }
    }

    /// Badge names with their payload, or `None` for badges to delete.
    fn plan<'a>(
        &self,
        config: &'a EnforcedMap<BadgeConfig>,
    ) -> Result<Vec<(&'a str, Option<BadgePayload>)>, ConfigurationError> {
        config
            .entries
            .iter()
            .map(|(entry, badge)| {
                let desired = if badge.delete {
                    None
                } else {
                    Some(badge.desired(self.section(), entry)?)
                };
                Ok((badge.badge_name(entry), desired))
            })
            .collect()
    }
}

#[async_trait]
impl Processor for BadgesProcessor {
    fn section(&self) -> &'static str {
        match self.kind {
            EntityKind::Project => "badges",
            EntityKind::Group => "group_badges",
        }
    }

    fn target_kind(&self) -> EntityKind {
        self.kind
    }

    fn validate(&self, _target: &Target, section: &Value) -> GitLabFormResult<()> {
        let config: EnforcedMap<BadgeConfig> = EnforcedMap::from_value(self.section(), section)?;
        self.plan(&config)?;
        Ok(())
    }

    async fn process(
        &self,
        ctx: &ProcessorContext,
        target: &Target,
        section: &Value,
    ) -> GitLabFormResult<ApplyResult> {
        let name = self.section();
        let config: EnforcedMap<BadgeConfig> = EnforcedMap::from_value(name, section)?;
        let plans = self.plan(&config)?;

        let api = ctx.api.as_ref();
        let scope = target.scope();
        let current = api.list_badges(&scope).await?;
        let mut result = ApplyResult::new();

        for (badge_name, desired) in &plans {
            let existing = current
                .iter()
                .find(|b| b.name.as_deref() == Some(*badge_name));

            match (desired, existing) {
                (None, Some(existing)) => {
                    let outcome = ctx
                        .mutate("delete badge", api.delete_badge(&scope, existing.id))
                        .await;
                    tally(&mut result, name, badge_name, Change::Deleted, outcome);
                }
                (None, None) => {
                    debug!(entity = %target, badge = *badge_name, "Badge to delete does not exist");
                    result.skipped += 1;
                }
                (Some(desired), Some(existing))
                    if existing.link_url == desired.link_url
                        && existing.image_url == desired.image_url =>
                {
                    debug!(entity = %target, badge = *badge_name, "Badge unchanged");
                    result.skipped += 1;
                }
                (Some(desired), Some(existing)) => {
                    let outcome = ctx
                        .mutate("update badge", api.update_badge(&scope, existing.id, desired))
                        .await;
                    tally(&mut result, name, badge_name, Change::Updated, outcome);
                }
                (Some(desired), None) => {
                    let outcome = ctx
                        .mutate("create badge", api.create_badge(&scope, desired))
                        .await;
                    tally(&mut result, name, badge_name, Change::Created, outcome);
                }
            }
        }

        if config.enforce {
            let configured: HashSet<&str> = plans.iter().map(|(badge, _)| *badge).collect();
            for badge in current.iter().filter(|b| {
                b.name
                    .as_deref()
                    .map_or(true, |badge_name| !configured.contains(badge_name))
            }) {
                let label = badge.name.clone().unwrap_or_else(|| badge.id.to_string());
                let outcome = ctx
                    .mutate("delete badge", api.delete_badge(&scope, badge.id))
                    .await;
                tally(&mut result, name, &label, Change::Deleted, outcome);
            }
        }

        Ok(result)
    }
}
