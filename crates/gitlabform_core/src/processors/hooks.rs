//! Project webhooks (`hooks`).

use async_trait::async_trait;
use config_manager::settings::{EnforcedMap, HookConfig};
use config_manager::ConfigurationError;
use gitlab_client::{EntityKind, Hook};
use serde_json::{Map, Value as JsonValue};
use serde_yaml::Value;
use tracing::debug;

use super::{tally, Change};
use crate::{ApplyResult, GitLabFormResult, Processor, ProcessorContext, Target};

#[cfg(test)]
#[path = "hooks_tests.rs"]
mod tests;

const SECTION: &str = "hooks";

/// Reconciles the webhooks of a project, identified by URL.
pub struct HooksProcessor;

/// Only configured attributes are compared. The token is never returned by GitLab.
/// URL, delete flag and payload of every configured hook.
fn payloads(
    config: &EnforcedMap<HookConfig>,
) -> Result<Vec<(&str, bool, Map<String, JsonValue>)>, ConfigurationError> {
    config
        .entries
        .iter()
        .map(|(url, hook)| hook.payload(url).map(|payload| (url.as_str(), hook.delete, payload)))
        .collect()
}

fn hook_matches(existing: &Hook, payload: &Map<String, JsonValue>) -> bool {
    payload
        .iter()
        .filter(|(name, _)| name.as_str() != "url" && name.as_str() != "token")
        .all(|(name, value)| existing.attribute(name) == Some(value))
}

#[async_trait]
impl Processor for HooksProcessor {
    fn section(&self) -> &'static str {
        SECTION
    }

    fn target_kind(&self) -> EntityKind {
        EntityKind::Project
    }

    fn validate(&self, _target: &Target, section: &Value) -> GitLabFormResult<()> {
        let config: EnforcedMap<HookConfig> = EnforcedMap::from_value(SECTION, section)?;
        payloads(&config)?;
        Ok(())
    }

    async fn process(
        &self,
        ctx: &ProcessorContext,
        target: &Target,
        section: &Value,
    ) -> GitLabFormResult<ApplyResult> {
        let config: EnforcedMap<HookConfig> = EnforcedMap::from_value(SECTION, section)?;
        let payloads = payloads(&config)?;

        let api = ctx.api.as_ref();
        let project = target.path();
        let current = api.list_hooks(project).await?;
        let mut result = ApplyResult::new();

        for (url, delete, payload) in &payloads {
            let existing = current.iter().find(|hook| hook.url == *url);
            match existing {
                Some(existing) if *delete => {
                    let outcome = ctx
                        .mutate("delete hook", api.delete_hook(project, existing.id))
                        .await;
                    tally(&mut result, SECTION, url, Change::Deleted, outcome);
                }
                None if *delete => {
                    debug!(entity = %target, url = *url, "Hook to delete does not exist");
                    result.skipped += 1;
                }
                Some(existing) if hook_matches(existing, payload) => {
                    debug!(entity = %target, url = *url, "Hook unchanged");
                    result.skipped += 1;
                }
                Some(existing) => {
                    let outcome = ctx
                        .mutate("update hook", api.update_hook(project, existing.id, payload))
                        .await;
                    tally(&mut result, SECTION, url, Change::Updated, outcome);
                }
                None => {
                    let outcome = ctx
                        .mutate("create hook", api.create_hook(project, payload))
                        .await;
                    tally(&mut result, SECTION, url, Change::Created, outcome);
                }
            }
        }

        if config.enforce {
            for hook in current
                .iter()
                .filter(|hook| !config.entries.contains_key(&hook.url))
            {
                let outcome = ctx
                    .mutate("delete hook", api.delete_hook(project, hook.id))
                    .await;
                tally(&mut result, SECTION, &hook.url, Change::Deleted, outcome);
            }
        }

        Ok(result)
    }
}
