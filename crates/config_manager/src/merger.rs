//! Configuration merging engine.
//!
//! The effective configuration of a project or group is built from several layers of
//! `projects_and_groups`, from the most general (`*`) to the most specific (the entity's
//! own path). Layers are deep-merged in that order:
//!
//! 1. mapping + mapping merges recursively, the later layer winning on conflicts
//! 2. any other combination is replaced by the later layer
//! 3. a mapping containing `inherit: false` discards whatever earlier layers set for
//!    that key
//!
//! The `inherit` marker never reaches the merged result.
//!
//! # Examples
//!
//! ```rust
//! use config_manager::ConfigurationMerger;
//!
//! let common: serde_yaml::Mapping = serde_yaml::from_str(
//!     "members: { users: { alice: { access_level: 40 } } }",
//! ).unwrap();
//! let project: serde_yaml::Mapping = serde_yaml::from_str(
//!     "members: { users: { bob: { access_level: 30 } } }",
//! ).unwrap();
//!
//! let merged = ConfigurationMerger::new().merge_layers([&common, &project]);
//! let users = &merged["members"]["users"];
//! assert!(users.get("alice").is_some());
//! assert!(users.get("bob").is_some());
//! ```

use serde_yaml::{Mapping, Value};

#[cfg(test)]
#[path = "merger_tests.rs"]
mod tests;

const INHERIT_KEY: &str = "inherit";

/// Configuration merging engine.
///
/// This is a stateless component: it takes configuration layers and produces the
/// merged mapping without keeping anything between calls.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationMerger {}

impl ConfigurationMerger {
    pub fn new() -> Self {
        Self {}
    }

    /// Merges layers ordered from lowest to highest precedence.
    pub fn merge_layers<'a, I>(&self, layers: I) -> Mapping
    where
        I: IntoIterator<Item = &'a Mapping>,
    {
        let mut merged = Mapping::new();
        for layer in layers {
            merge_into(&mut merged, layer);
        }
        merged
    }
}

/// Deep-merges `overlay` into `base`.
fn merge_into(base: &mut Mapping, overlay: &Mapping) {
    for (key, value) in overlay {
        if is_inherit_marker(key, value) {
            continue;
        }

        let inherits = !matches!(value, Value::Mapping(map) if disables_inheritance(map));
        match (base.get_mut(key), value) {
            (Some(Value::Mapping(existing)), Value::Mapping(incoming)) if inherits => {
                merge_into(existing, incoming);
            }
            _ => {
                base.insert(key.clone(), strip_inherit_markers(value));
            }
        }
    }
}

fn disables_inheritance(map: &Mapping) -> bool {
    matches!(map.get(INHERIT_KEY), Some(Value::Bool(false)))
}

fn is_inherit_marker(key: &Value, value: &Value) -> bool {
    key.as_str() == Some(INHERIT_KEY) && value.is_bool()
}

/// Copies a value, dropping `inherit` markers at every depth.
fn strip_inherit_markers(value: &Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.iter()
                .filter(|(key, value)| !is_inherit_marker(key, value))
                .map(|(key, value)| (key.clone(), strip_inherit_markers(value)))
                .collect(),
        ),
        other => other.clone(),
    }
}
