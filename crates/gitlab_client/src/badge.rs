//! Badge types.

use serde::{Deserialize, Serialize};

/// A badge shown on a project or group page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    pub link_url: String,
    pub image_url: String,
    /// `project` or `group`; project listings also contain inherited group badges
    #[serde(default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgePayload {
    pub name: String,
    pub link_url: String,
    pub image_url: String,
}
