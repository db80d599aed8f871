//! Pipeline schedule types.
//!
//! Schedules are listed without their variables; the variables are only part of the
//! response when a single schedule is fetched.

use serde::{Deserialize, Serialize};

use crate::User;

#[cfg(test)]
#[path = "pipeline_schedule_tests.rs"]
mod tests;

/// The variable type GitLab assigns when none is given.
pub const DEFAULT_VARIABLE_TYPE: &str = "env_var";

fn default_variable_type() -> String {
    DEFAULT_VARIABLE_TYPE.to_string()
}

/// A pipeline schedule of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSchedule {
    pub id: u64,
    pub description: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub cron: String,
    pub cron_timezone: String,
    pub active: bool,
    #[serde(default)]
    pub owner: Option<User>,
    /// Only populated by `get_pipeline_schedule`
    #[serde(default)]
    pub variables: Vec<PipelineScheduleVariable>,
}

/// A variable passed to pipelines started by a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineScheduleVariable {
    pub key: String,
    pub value: String,
    #[serde(default = "default_variable_type")]
    pub variable_type: String,
}

/// Payload for creating or editing a pipeline schedule.
///
/// Fields left as `None` are not sent, so an edit only touches what is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineSchedulePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cron: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cron_timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}
