//! Badge configuration (`badges` and `group_badges`).

use gitlab_client::BadgePayload;
use serde::Deserialize;

use crate::{ConfigurationError, ConfigurationResult};

#[cfg(test)]
#[path = "badge_tests.rs"]
mod tests;

/// A badge, keyed by its name in the section unless `name` is given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BadgeConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub delete: bool,
}

impl BadgeConfig {
    pub fn badge_name<'a>(&'a self, entry: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(entry)
    }

    /// The badge as it should exist in GitLab; both URLs are required.
    pub fn desired(&self, section: &str, entry: &str) -> ConfigurationResult<BadgePayload> {
        let required = |value: &Option<String>, key: &str| {
            value.clone().ok_or_else(|| {
                ConfigurationError::invalid(
                    format!("{}.{}.{}", section, entry, key),
                    "is required unless the badge is deleted",
                )
            })
        };

        Ok(BadgePayload {
            name: self.badge_name(entry).to_string(),
            link_url: required(&self.link_url, "link_url")?,
            image_url: required(&self.image_url, "image_url")?,
        })
    }
}
