//! Pipeline schedule configuration (`schedules`).

use gitlab_client::{PipelineScheduleVariable, DEFAULT_VARIABLE_TYPE};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::{ConfigurationError, ConfigurationResult};

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;

/// Timezone applied when a schedule does not name one.
pub const DEFAULT_CRON_TIMEZONE: &str = "UTC";

/// A pipeline schedule, keyed by its description in the section.
///
/// ```yaml
/// schedules:
///   "Nightly build":
///     ref: main
///     cron: "0 1 * * *"
///     variables:
///       DEPLOY: { value: "false" }
///   "Old schedule":
///     delete: true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
    #[serde(default)]
    pub cron: Option<String>,
    #[serde(default)]
    pub cron_timezone: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    /// Omitted means the schedule has no variables
    #[serde(default)]
    pub variables: Option<IndexMap<String, ScheduleVariableConfig>>,
    #[serde(default)]
    pub delete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleVariableConfig {
    #[serde(deserialize_with = "super::scalar_string")]
    pub value: String,
    #[serde(default)]
    pub variable_type: Option<String>,
}

/// A schedule with every default filled in, ready to compare with GitLab's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredSchedule {
    pub description: String,
    pub git_ref: String,
    pub cron: String,
    pub cron_timezone: String,
    pub active: bool,
    pub variables: Vec<PipelineScheduleVariable>,
}

impl ScheduleConfig {
    /// Resolves the schedule described by `description`.
    ///
    /// `ref` and `cron` are required; `cron_timezone` defaults to UTC, `active` to
    /// true and the variable type to `env_var`.
    pub fn desired(&self, section: &str, description: &str) -> ConfigurationResult<DesiredSchedule> {
        let required = |value: &Option<String>, key: &str| {
            value.clone().ok_or_else(|| {
                ConfigurationError::invalid(
                    format!("{}.{}.{}", section, description, key),
                    "is required unless the schedule is deleted",
                )
            })
        };

        let variables = self
            .variables
            .iter()
            .flatten()
            .map(|(key, variable)| PipelineScheduleVariable {
                key: key.clone(),
                value: variable.value.clone(),
                variable_type: variable
                    .variable_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_VARIABLE_TYPE.to_string()),
            })
            .collect();

        Ok(DesiredSchedule {
            description: description.to_string(),
            git_ref: required(&self.git_ref, "ref")?,
            cron: required(&self.cron, "cron")?,
            cron_timezone: self
                .cron_timezone
                .clone()
                .unwrap_or_else(|| DEFAULT_CRON_TIMEZONE.to_string()),
            active: self.active.unwrap_or(true),
            variables,
        })
    }
}
