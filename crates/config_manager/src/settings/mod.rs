//! Typed content of the configuration sections.
//!
//! Sections are kept as raw YAML in [`EntityConfig`](crate::EntityConfig) and only parsed
//! into these types when the matching processor runs, so that an error in one section
//! names the section and entry it was found in.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_yaml::Value;

use crate::{ConfigurationError, ConfigurationResult};

pub mod badge;
pub mod enforced;
pub mod hook;
pub mod label;
pub mod member;
pub mod saml_link;
pub mod schedule;
pub mod variable;

pub use badge::BadgeConfig;
pub use enforced::EnforcedMap;
pub use hook::HookConfig;
pub use label::LabelConfig;
pub use member::{GroupShareConfig, MemberRoleSpec, MembersConfig, UserMemberConfig};
pub use saml_link::SamlLinkConfig;
pub use schedule::{DesiredSchedule, ScheduleConfig, ScheduleVariableConfig, DEFAULT_CRON_TIMEZONE};
pub use variable::VariableConfig;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

/// Parses a section value, reporting errors against the section name.
pub fn parse_section<T: DeserializeOwned>(section: &str, value: &Value) -> ConfigurationResult<T> {
    serde_yaml::from_value(value.clone()).map_err(|e| ConfigurationError::invalid(section, e))
}

/// Converts YAML into the JSON representation used for API payloads.
pub fn to_json(field: &str, value: &Value) -> ConfigurationResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| ConfigurationError::invalid(field, e))
}

/// Deserializes any scalar into its string form.
///
/// Variable values are strings on the GitLab side, but are commonly written unquoted
/// in YAML (`value: 42`, `value: true`).
pub(crate) fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string, number or boolean, found {:?}",
            other
        ))),
    }
}

pub(crate) fn optional_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_string(value).map(Some).map_err(serde::de::Error::custom),
    }
}
