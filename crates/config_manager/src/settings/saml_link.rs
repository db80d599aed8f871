//! SAML group link configuration (`group_saml_links`).

use gitlab_client::AccessLevel;
use serde::Deserialize;

/// One SAML group link; the entry name is only a label; the link is identified by
/// `saml_group_name`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SamlLinkConfig {
    pub saml_group_name: String,
    pub access_level: AccessLevel,
    #[serde(default)]
    pub member_role_id: Option<u64>,
    #[serde(default)]
    pub provider: Option<String>,
}
