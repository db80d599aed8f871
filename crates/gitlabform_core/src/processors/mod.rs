//! One processor per configuration section.

use gitlab_client::{EntityKind, GitLabResult};
use std::fmt;
use tracing::{info, warn};

use crate::{ApplyResult, Processor};

pub mod badges;
pub mod hooks;
pub mod labels;
pub mod members;
pub mod saml_links;
pub mod schedules;
pub mod settings;
pub mod variables;

pub use badges::BadgesProcessor;
pub use hooks::HooksProcessor;
pub use labels::LabelsProcessor;
pub use members::MembersProcessor;
pub use saml_links::SamlLinksProcessor;
pub use schedules::SchedulesProcessor;
pub use settings::SettingsProcessor;
pub use variables::VariablesProcessor;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

/// Processors applied to every project, in processing order.
pub fn project_processors() -> Vec<Box<dyn Processor>> {
    vec![
        Box::new(SettingsProcessor::new(EntityKind::Project)),
        Box::new(MembersProcessor::new(EntityKind::Project)),
        Box::new(SchedulesProcessor),
        Box::new(LabelsProcessor::new(EntityKind::Project)),
        Box::new(VariablesProcessor::new(EntityKind::Project)),
        Box::new(BadgesProcessor::new(EntityKind::Project)),
        Box::new(HooksProcessor),
    ]
}

/// Processors applied to every group, in processing order.
pub fn group_processors() -> Vec<Box<dyn Processor>> {
    vec![
        Box::new(SettingsProcessor::new(EntityKind::Group)),
        Box::new(MembersProcessor::new(EntityKind::Group)),
        Box::new(SamlLinksProcessor),
        Box::new(LabelsProcessor::new(EntityKind::Group)),
        Box::new(VariablesProcessor::new(EntityKind::Group)),
        Box::new(BadgesProcessor::new(EntityKind::Group)),
    ]
}

/// Kind of change made to a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Change {
    Created,
    Updated,
    Deleted,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::Created => write!(f, "create"),
            Change::Updated => write!(f, "update"),
            Change::Deleted => write!(f, "delete"),
        }
    }
}

/// Counts the outcome of a change to `item`, logging it either way.
pub(crate) fn tally(
    result: &mut ApplyResult,
    section: &str,
    item: &str,
    change: Change,
    outcome: GitLabResult<()>,
) {
    match outcome {
        Ok(()) => {
            info!(section = section, item = item, change = %change, "Applied change");
            match change {
                Change::Created => result.created += 1,
                Change::Updated => result.updated += 1,
                Change::Deleted => result.deleted += 1,
            }
        }
        Err(e) => {
            warn!(section = section, item = item, change = %change, error = %e, "Failed to apply change");
            result.record_failure(item);
        }
    }
}
