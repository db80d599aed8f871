//! Named-entry sections with an optional `enforce` flag.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_yaml::Value;

use crate::{ConfigurationError, ConfigurationResult};

#[cfg(test)]
#[path = "enforced_tests.rs"]
mod tests;

const ENFORCE_KEY: &str = "enforce";

/// A section made of named entries, such as `labels` or `schedules`.
///
/// ```yaml
/// labels:
///   enforce: true
///   bug: { color: "#d73a4a" }
///   docs: { color: "#0075ca" }
/// ```
///
/// The `enforce` key is taken out before the remaining keys are parsed as entries.
#[derive(Debug, Clone, PartialEq)]
pub struct EnforcedMap<T> {
    pub enforce: bool,
    pub entries: IndexMap<String, T>,
}

impl<T> Default for EnforcedMap<T> {
    fn default() -> Self {
        Self {
            enforce: false,
            entries: IndexMap::new(),
        }
    }
}

impl<T: DeserializeOwned> EnforcedMap<T> {
    /// Parses a section; errors name the offending entry as `section.entry`.
    pub fn from_value(section: &str, value: &Value) -> ConfigurationResult<Self> {
        let map = match value {
            Value::Mapping(map) => map,
            Value::Null => return Ok(Self::default()),
            _ => {
                return Err(ConfigurationError::invalid(
                    section,
                    "must be a mapping of named entries",
                ))
            }
        };

        let mut parsed = Self::default();
        for (key, entry) in map {
            let name = entry_name(section, key)?;
            if name == ENFORCE_KEY {
                parsed.enforce = entry.as_bool().ok_or_else(|| {
                    ConfigurationError::invalid(
                        format!("{}.{}", section, ENFORCE_KEY),
                        "must be true or false",
                    )
                })?;
                continue;
            }

            let field = format!("{}.{}", section, name);
            let entry = serde_yaml::from_value(entry.clone())
                .map_err(|e| ConfigurationError::invalid(field, e))?;
            parsed.entries.insert(name, entry);
        }

        Ok(parsed)
    }
}

impl<T> EnforcedMap<T> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn entry_name(section: &str, key: &Value) -> ConfigurationResult<String> {
    match key {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        _ => Err(ConfigurationError::invalid(
            section,
            "entry names must be scalars",
        )),
    }
}
