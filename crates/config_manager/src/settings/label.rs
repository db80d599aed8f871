//! Label configuration (`labels` and `group_labels`).

use serde::Deserialize;

use crate::{ConfigurationError, ConfigurationResult};

#[cfg(test)]
#[path = "label_tests.rs"]
mod tests;

/// A label, keyed by its name in the section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LabelConfig {
    /// Color as `#rrggbb` or a CSS color name
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(default)]
    pub delete: bool,
}

impl LabelConfig {
    /// Returns the color a label to be created or updated must have.
    ///
    /// `entry` is the `section.name` path used in the error.
    pub fn required_color(&self, entry: &str) -> ConfigurationResult<&str> {
        self.color.as_deref().ok_or_else(|| {
            ConfigurationError::invalid(format!("{}.color", entry), "is required")
        })
    }
}
