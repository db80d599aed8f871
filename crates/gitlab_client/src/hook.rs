//! Project webhook types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[cfg(test)]
#[path = "hook_tests.rs"]
mod tests;

/// A project webhook.
///
/// GitLab keeps growing the set of event flags a hook carries (`push_events`,
/// `merge_requests_events`, `releases_events`, ...), so everything except the id and
/// the URL is kept as a raw attribute map.
///
/// # Examples
///
/// ```rust
/// use gitlab_client::Hook;
///
/// let hook: Hook = serde_json::from_str(r#"{
///     "id": 1,
///     "url": "https://ci.example.com/hook",
///     "push_events": true,
///     "enable_ssl_verification": true
/// }"#).unwrap();
///
/// assert_eq!(hook.url, "https://ci.example.com/hook");
/// assert_eq!(hook.attribute("push_events"), Some(&serde_json::Value::Bool(true)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hook {
    pub id: u64,
    pub url: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Hook {
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}
