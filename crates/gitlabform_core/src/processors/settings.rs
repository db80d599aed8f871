//! Entity attributes (`project_settings` and `group_settings`).

use async_trait::async_trait;
use config_manager::settings::to_json;
use gitlab_client::EntityKind;
use serde_json::{Map, Value as JsonValue};
use serde_yaml::Value;
use tracing::debug;

use super::{tally, Change};
use crate::{ApplyResult, GitLabFormError, GitLabFormResult, Processor, ProcessorContext, Target};

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;

/// Applies a free-form mapping of attributes to a project or group.
///
/// Only attributes whose current value differs are sent, in a single update.
pub struct SettingsProcessor {
    kind: EntityKind,
}

impl SettingsProcessor {
    pub fn new(kind: EntityKind) -> Self {
        Self { kind }
    }

    fn desired(&self, section: &Value) -> GitLabFormResult<Map<String, JsonValue>> {
        let name = self.section();
        match to_json(name, section)? {
            JsonValue::Object(map) => Ok(map),
            JsonValue::Null => Ok(Map::new()),
            _ => Err(GitLabFormError::InvalidInput {
                reason: format!("'{}' must be a mapping of attributes", name),
            }),
        }
    }
}

fn changed_settings(current: &JsonValue, desired: &Map<String, JsonValue>) -> Map<String, JsonValue> {
    desired
        .iter()
        .filter(|(name, value)| current.get(name.as_str()) != Some(*value))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

#[async_trait]
impl Processor for SettingsProcessor {
    fn section(&self) -> &'static str {
        match self.kind {
            EntityKind::Project => "project_settings",
            EntityKind::Group => "group_settings",
        }
    }

    fn target_kind(&self) -> EntityKind {
        self.kind
    }

    fn validate(&self, _target: &Target, section: &Value) -> GitLabFormResult<()> {
        self.desired(section).map(|_| ())
    }

    async fn process(
        &self,
        ctx: &ProcessorContext,
        target: &Target,
        section: &Value,
    ) -> GitLabFormResult<ApplyResult> {
        let name = self.section();
        let desired = self.desired(section)?;

        let api = ctx.api.as_ref();
        let scope = target.scope();
        let current = api.get_settings(&scope).await?;
        let changed = changed_settings(&current, &desired);
        let mut result = ApplyResult::new();

        if changed.is_empty() {
            debug!(entity = %target, "Settings unchanged");
            result.skipped += 1;
            return Ok(result);
        }

        let keys: Vec<&str> = changed.keys().map(String::as_str).collect();
        debug!(entity = %target, changed = ?keys, "Updating settings");
        let outcome = ctx
            .mutate("update settings", api.update_settings(&scope, &changed))
            .await;
        tally(&mut result, name, target.path(), Change::Updated, outcome);
        Ok(result)
    }
}
