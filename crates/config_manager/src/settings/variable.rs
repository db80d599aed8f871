//! CI/CD variable configuration (`variables` and `group_variables`).

use gitlab_client::{Variable, DEFAULT_ENVIRONMENT_SCOPE, DEFAULT_VARIABLE_TYPE};
use serde::Deserialize;

use crate::{ConfigurationError, ConfigurationResult};

#[cfg(test)]
#[path = "variable_tests.rs"]
mod tests;

/// A CI/CD variable. `key` defaults to the entry name, which allows the same key to be
/// configured for several environment scopes under different entry names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VariableConfig {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "super::optional_scalar_string")]
    pub value: Option<String>,
    #[serde(default)]
    pub variable_type: Option<String>,
    #[serde(default)]
    pub protected: Option<bool>,
    #[serde(default)]
    pub masked: Option<bool>,
    #[serde(default)]
    pub raw: Option<bool>,
    #[serde(default)]
    pub environment_scope: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub delete: bool,
}

impl VariableConfig {
    pub fn key<'a>(&'a self, entry: &'a str) -> &'a str {
        self.key.as_deref().unwrap_or(entry)
    }

    pub fn environment_scope(&self) -> &str {
        self.environment_scope
            .as_deref()
            .unwrap_or(DEFAULT_ENVIRONMENT_SCOPE)
    }

    /// The variable as it should exist in GitLab. Flags not configured take GitLab's
    /// defaults.
    pub fn desired(&self, section: &str, entry: &str) -> ConfigurationResult<Variable> {
        let value = self.value.clone().ok_or_else(|| {
            ConfigurationError::invalid(
                format!("{}.{}.value", section, entry),
                "is required unless the variable is deleted",
            )
        })?;

        Ok(Variable {
            key: self.key(entry).to_string(),
            value,
            variable_type: self
                .variable_type
                .clone()
                .unwrap_or_else(|| DEFAULT_VARIABLE_TYPE.to_string()),
            protected: self.protected.unwrap_or(false),
            masked: self.masked.unwrap_or(false),
            raw: self.raw.unwrap_or(false),
            environment_scope: self.environment_scope().to_string(),
            description: self.description.clone(),
        })
    }
}
