//! CI/CD variable types for projects and groups.

use serde::{Deserialize, Serialize};

/// The environment scope GitLab uses when none is given.
pub const DEFAULT_ENVIRONMENT_SCOPE: &str = "*";

fn default_environment_scope() -> String {
    DEFAULT_ENVIRONMENT_SCOPE.to_string()
}

fn default_variable_type() -> String {
    crate::DEFAULT_VARIABLE_TYPE.to_string()
}

/// A CI/CD variable as returned by GitLab, and as sent when creating or updating one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub key: String,
    pub value: String,
    #[serde(default = "default_variable_type")]
    pub variable_type: String,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub masked: bool,
    #[serde(default)]
    pub raw: bool,
    #[serde(default = "default_environment_scope")]
    pub environment_scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
