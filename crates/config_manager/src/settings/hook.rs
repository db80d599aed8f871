//! Webhook configuration (`hooks`).

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{ConfigurationError, ConfigurationResult};

#[cfg(test)]
#[path = "hook_tests.rs"]
mod tests;

/// A project hook keyed by its URL in the section.
///
/// Everything except `delete` and `token` is passed to GitLab as a hook attribute
/// (`push_events`, `merge_requests_events`, `enable_ssl_verification`, ...).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HookConfig {
    #[serde(default)]
    pub delete: bool,
    /// Secret token; GitLab never returns it, so it is sent but not compared
    #[serde(default)]
    pub token: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl HookConfig {
    /// The request body to create or update the hook at `url`.
    pub fn payload(&self, url: &str) -> ConfigurationResult<Map<String, Value>> {
        if url.trim().is_empty() {
            return Err(ConfigurationError::invalid("hooks", "hook URLs must not be empty"));
        }

        let mut payload = self.attributes.clone();
        if payload.remove("url").is_some() {
            debug!(url = url, "Ignoring 'url' attribute, the entry name is the hook URL");
        }
        payload.insert("url".to_string(), Value::String(url.to_string()));
        if let Some(token) = &self.token {
            payload.insert("token".to_string(), Value::String(token.clone()));
        }
        Ok(payload)
    }
}
