//! SAML group link types.

use serde::{Deserialize, Serialize};

use crate::AccessLevel;

/// A link between a SAML group and a GitLab group, granting an access level to every
/// member of the SAML group.
///
/// GitLab returns the SAML group name as `name`; `saml_group_name` is accepted as an
/// alias so configuration-shaped data deserializes too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamlGroupLink {
    #[serde(alias = "saml_group_name")]
    pub name: String,
    pub access_level: AccessLevel,
    #[serde(default)]
    pub member_role_id: Option<u64>,
    #[serde(default)]
    pub provider: Option<String>,
}

/// Payload for creating a SAML group link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamlGroupLinkPayload {
    pub saml_group_name: String,
    pub access_level: AccessLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_role_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}
