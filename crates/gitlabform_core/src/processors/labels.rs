//! Labels (`labels` and `group_labels`).

use async_trait::async_trait;
use config_manager::settings::{EnforcedMap, LabelConfig};
use gitlab_client::{EntityKind, Label, LabelPayload};
use serde_yaml::Value;
use tracing::debug;

use super::{tally, Change};
use crate::{ApplyResult, GitLabFormResult, Processor, ProcessorContext, Target};

#[cfg(test)]
#[path = "labels_tests.rs"]
mod tests;

/// Reconciles the labels of a project or group, identified by name.
pub struct LabelsProcessor {
    kind: EntityKind,
}

impl LabelsProcessor {
    pub fn new(kind: EntityKind) -> Self {
        Self { kind }
    }

    fn parse(&self, section: &Value) -> GitLabFormResult<EnforcedMap<LabelConfig>> {
        let name = self.section();
        let config: EnforcedMap<LabelConfig> = EnforcedMap::from_value(name, section)?;
        for (label, desired) in config.entries.iter().filter(|(_, l)| !l.delete) {
            desired.required_color(&format!("{}.{}", name, label))?;
        }
        Ok(config)
    }
}

/// Compares only what the configuration sets; GitLab reports colors in either case.
fn label_matches(existing: &Label, color: &str, desired: &LabelConfig) -> bool {
    existing.color.eq_ignore_ascii_case(color)
        && (desired.description.is_none() || existing.description == desired.description)
        && (desired.priority.is_none() || existing.priority == desired.priority)
}

#[async_trait]
impl Processor for LabelsProcessor {
    fn section(&self) -> &'static str {
        match self.kind {
            EntityKind::Project => "labels",
            EntityKind::Group => "group_labels",
        }
    }

    fn target_kind(&self) -> EntityKind {
        self.kind
    }

    fn validate(&self, _target: &Target, section: &Value) -> GitLabFormResult<()> {
        self.parse(section).map(|_| ())
    }

    async fn process(
        &self,
        ctx: &ProcessorContext,
        target: &Target,
        section: &Value,
    ) -> GitLabFormResult<ApplyResult> {
        let name = self.section();
        let config = self.parse(section)?;
        let entry = |label: &str| format!("{}.{}", name, label);

        let api = ctx.api.as_ref();
        let scope = target.scope();
        let current = api.list_labels(&scope).await?;
        let mut result = ApplyResult::new();

        for (label, desired) in &config.entries {
            let existing = current.iter().find(|l| l.name == *label);

            if desired.delete {
                match existing {
                    Some(existing) => {
                        let outcome = ctx
                            .mutate("delete label", api.delete_label(&scope, existing.id))
                            .await;
                        tally(&mut result, name, label, Change::Deleted, outcome);
                    }
                    None => {
                        debug!(entity = %target, label = label.as_str(), "Label to delete does not exist");
                        result.skipped += 1;
                    }
                }
                continue;
            }

            let color = desired.required_color(&entry(label))?;
            let payload = LabelPayload {
                name: None,
                color: color.to_string(),
                description: desired.description.clone(),
                priority: desired.priority,
            };
            match existing {
                Some(existing) if label_matches(existing, color, desired) => {
                    debug!(entity = %target, label = label.as_str(), "Label unchanged");
                    result.skipped += 1;
                }
                Some(existing) => {
                    let outcome = ctx
                        .mutate("update label", api.update_label(&scope, existing.id, &payload))
                        .await;
                    tally(&mut result, name, label, Change::Updated, outcome);
                }
                None => {
                    let payload = LabelPayload {
                        name: Some(label.clone()),
                        ..payload
                    };
                    let outcome = ctx
                        .mutate("create label", api.create_label(&scope, &payload))
                        .await;
                    tally(&mut result, name, label, Change::Created, outcome);
                }
            }
        }

        if config.enforce {
            for existing in current
                .iter()
                .filter(|l| !config.entries.contains_key(&l.name))
            {
                let outcome = ctx
                    .mutate("delete label", api.delete_label(&scope, existing.id))
                    .await;
                tally(&mut result, name, &existing.name, Change::Deleted, outcome);
            }
        }

        Ok(result)
    }
}
