//! Label domain types.
//!
//! This module contains types representing project and group labels.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "label_tests.rs"]
mod tests;

/// Represents a label of a project or group.
///
/// # Examples
///
/// ```
/// use gitlab_client::Label;
///
/// let label = Label {
///     id: 1,
///     name: "bug".to_string(),
///     color: "#d9534f".to_string(),
///     description: None,
///     priority: None,
/// };
/// assert_eq!(label.name, "bug");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: u64,
    /// The name of the label
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<u32>,
}

/// Payload for creating or updating a label.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabelPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}
