//! SAML group links (`group_saml_links`).

use async_trait::async_trait;
use config_manager::settings::{EnforcedMap, SamlLinkConfig};
use gitlab_client::{EntityKind, SamlGroupLink, SamlGroupLinkPayload};
use serde_yaml::Value;
use std::collections::HashSet;
use tracing::debug;

use super::{tally, Change};
use crate::{ApplyResult, GitLabFormResult, Processor, ProcessorContext, Target};

#[cfg(test)]
#[path = "saml_links_tests.rs"]
mod tests;

const SECTION: &str = "group_saml_links";

/// Reconciles the SAML group links of a group, identified by `saml_group_name`.
///
/// Links cannot be edited through the API; a link whose access level or member role
/// changed is deleted and created again.
pub struct SamlLinksProcessor;

fn matches(existing: &SamlGroupLink, desired: &SamlLinkConfig) -> bool {
    existing.access_level == desired.access_level
        && existing.member_role_id == desired.member_role_id
        && (desired.provider.is_none() || existing.provider == desired.provider)
}

#[async_trait]
impl Processor for SamlLinksProcessor {
    fn section(&self) -> &'static str {
        SECTION
    }

    fn target_kind(&self) -> EntityKind {
        EntityKind::Group
    }

    fn validate(&self, _target: &Target, section: &Value) -> GitLabFormResult<()> {
        EnforcedMap::<SamlLinkConfig>::from_value(SECTION, section)?;
        Ok(())
    }

    async fn process(
        &self,
        ctx: &ProcessorContext,
        target: &Target,
        section: &Value,
    ) -> GitLabFormResult<ApplyResult> {
        let config: EnforcedMap<SamlLinkConfig> = EnforcedMap::from_value(SECTION, section)?;
        let api = ctx.api.as_ref();
        let group = target.path();
        let current = api.list_saml_links(group).await?;
        let mut result = ApplyResult::new();

        for desired in config.entries.values() {
            let name = desired.saml_group_name.as_str();
            let existing = current.iter().find(|link| link.name == name);
            if let Some(existing) = existing {
                if matches(existing, desired) {
                    debug!(entity = %target, saml_group_name = name, "SAML link unchanged");
                    result.skipped += 1;
                    continue;
                }
            }

            let payload = SamlGroupLinkPayload {
                saml_group_name: name.to_string(),
                access_level: desired.access_level,
                member_role_id: desired.member_role_id,
                provider: desired.provider.clone(),
            };
            let outcome = async {
                if existing.is_some() {
                    ctx.mutate("delete SAML link", api.delete_saml_link(group, name))
                        .await?;
                }
                ctx.mutate("create SAML link", api.create_saml_link(group, &payload))
                    .await
            }
            .await;
            let change = if existing.is_some() {
                Change::Updated
            } else {
                Change::Created
            };
            tally(&mut result, SECTION, name, change, outcome);
        }

        if config.enforce {
            let configured: HashSet<&str> = config
                .entries
                .values()
                .map(|link| link.saml_group_name.as_str())
                .collect();
            for link in current.iter().filter(|l| !configured.contains(l.name.as_str())) {
                let outcome = ctx
                    .mutate("delete SAML link", api.delete_saml_link(group, &link.name))
                    .await;
                tally(&mut result, SECTION, &link.name, Change::Deleted, outcome);
            }
        }

        Ok(result)
    }
}
