//! CI/CD variables (`variables` and `group_variables`).

use async_trait::async_trait;
use config_manager::settings::{EnforcedMap, VariableConfig};
use config_manager::ConfigurationResult;
use gitlab_client::{EntityKind, Variable};
use serde_yaml::Value;
use std::collections::HashSet;
use tracing::debug;

use super::{tally, Change};
use crate::{ApplyResult, GitLabFormResult, Processor, ProcessorContext, Target};

#[cfg(test)]
#[path = "variables_tests.rs"]
mod tests;

/// Reconciles CI/CD variables, identified by key and environment scope.
pub struct VariablesProcessor {
    kind: EntityKind,
}

impl VariablesProcessor {
    pub fn new(kind: EntityKind) -> Self {
        Self { kind }
    }
}

fn same_identity(variable: &Variable, key: &str, environment_scope: &str) -> bool {
    variable.key == key && variable.environment_scope == environment_scope
}

/// A description that is not configured is left as it is.
fn variable_matches(existing: &Variable, desired: &Variable) -> bool {
    existing.value == desired.value
        && existing.variable_type == desired.variable_type
        && existing.protected == desired.protected
        && existing.masked == desired.masked
        && existing.raw == desired.raw
        && (desired.description.is_none() || existing.description == desired.description)
}

enum Plan<'a> {
    Delete { key: &'a str, environment_scope: &'a str },
    Apply(Variable),
}

impl VariablesProcessor {
    fn plans<'a>(
        &self,
        config: &'a EnforcedMap<VariableConfig>,
    ) -> ConfigurationResult<Vec<(&'a str, Plan<'a>)>> {
        config
            .entries
            .iter()
            .map(|(entry, variable)| {
                if variable.delete {
                    Ok((
                        entry.as_str(),
                        Plan::Delete {
                            key: variable.key(entry),
                            environment_scope: variable.environment_scope(),
                        },
                    ))
                } else {
                    variable
                        .desired(self.section(), entry)
                        .map(|desired| (entry.as_str(), Plan::Apply(desired)))
                }
            })
            .collect()
    }
}

#[async_trait]
impl Processor for VariablesProcessor {
    fn section(&self) -> &'static str {
        match self.kind {
            EntityKind::Project => "variables",
            EntityKind::Group => "group_variables",
        }
    }

    fn target_kind(&self) -> EntityKind {
        self.kind
    }

    fn validate(&self, _target: &Target, section: &Value) -> GitLabFormResult<()> {
        let config: EnforcedMap<VariableConfig> = EnforcedMap::from_value(self.section(), section)?;
        self.plans(&config)?;
        Ok(())
    }

    async fn process(
        &self,
        ctx: &ProcessorContext,
        target: &Target,
        section: &Value,
    ) -> GitLabFormResult<ApplyResult> {
        let name = self.section();
        let config: EnforcedMap<VariableConfig> = EnforcedMap::from_value(name, section)?;
        let plans = self.plans(&config)?;

        let api = ctx.api.as_ref();
        let scope = target.scope();
        let current = api.list_variables(&scope).await?;
        let mut result = ApplyResult::new();

        for (entry, plan) in &plans {
            match plan {
                Plan::Delete {
                    key,
                    environment_scope,
                } => {
                    if !current.iter().any(|v| same_identity(v, key, environment_scope)) {
                        debug!(entity = %target, key = *key, "Variable to delete does not exist");
                        result.skipped += 1;
                        continue;
                    }
                    let outcome = ctx
                        .mutate(
                            "delete variable",
                            api.delete_variable(&scope, key, environment_scope),
                        )
                        .await;
                    tally(&mut result, name, entry, Change::Deleted, outcome);
                }
                Plan::Apply(desired) => {
                    let existing = current
                        .iter()
                        .find(|v| same_identity(v, &desired.key, &desired.environment_scope));
                    match existing {
                        Some(existing) if variable_matches(existing, desired) => {
                            debug!(entity = %target, key = desired.key.as_str(), "Variable unchanged");
                            result.skipped += 1;
                        }
                        Some(_) => {
                            let outcome = ctx
                                .mutate("update variable", api.update_variable(&scope, desired))
                                .await;
                            tally(&mut result, name, entry, Change::Updated, outcome);
                        }
                        None => {
                            let outcome = ctx
                                .mutate("create variable", api.create_variable(&scope, desired))
                                .await;
                            tally(&mut result, name, entry, Change::Created, outcome);
                        }
                    }
                }
            }
        }

        if config.enforce {
            let configured: HashSet<(&str, &str)> = plans
                .iter()
                .map(|(_, plan)| match plan {
                    Plan::Delete {
                        key,
                        environment_scope,
                    } => (*key, *environment_scope),
                    Plan::Apply(desired) => {
                        (desired.key.as_str(), desired.environment_scope.as_str())
                    }
                })
                .collect();
            for variable in current.iter().filter(|v| {
                !configured.contains(&(v.key.as_str(), v.environment_scope.as_str()))
            }) {
                let outcome = ctx
                    .mutate(
                        "delete variable",
                        api.delete_variable(&scope, &variable.key, &variable.environment_scope),
                    )
                    .await;
                tally(&mut result, name, &variable.key, Change::Deleted, outcome);
            }
        }

        Ok(result)
    }
}
