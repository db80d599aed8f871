//! The processor abstraction: one implementation per configuration section.

use async_trait::async_trait;
use gitlab_client::{EntityKind, GitLabApi, GitLabResult, Group, Project, Scope, SharedGroup};
use serde_yaml::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::info;

use crate::{ApplyResult, GitLabFormResult, LookupCache};

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;

/// A project or group being reconciled, as fetched from GitLab.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Project(Project),
    Group(Group),
}

impl Target {
    pub fn path(&self) -> &str {
        match self {
            Target::Project(project) => &project.path_with_namespace,
            Target::Group(group) => &group.full_path,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Target::Project(_) => EntityKind::Project,
            Target::Group(_) => EntityKind::Group,
        }
    }

    pub fn scope(&self) -> Scope {
        match self {
            Target::Project(project) => Scope::project(&project.path_with_namespace),
            Target::Group(group) => Scope::group(&group.full_path),
        }
    }

    /// Groups this project or group is currently shared with.
    pub fn shared_with_groups(&self) -> &[SharedGroup] {
        match self {
            Target::Project(project) => &project.shared_with_groups,
            Target::Group(group) => &group.shared_with_groups,
        }
    }

    /// Path of the top-level group the target belongs to.
    pub fn root_namespace(&self) -> &str {
        let path = self.path();
        path.split('/').next().unwrap_or(path)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind(), self.path())
    }
}

/// Everything a processor needs besides its section content.
pub struct ProcessorContext {
    pub api: Arc<dyn GitLabApi>,
    pub cache: LookupCache,
    /// Log changes instead of making them
    pub dry_run: bool,
}

impl ProcessorContext {
    pub fn new(api: Arc<dyn GitLabApi>, dry_run: bool) -> Self {
        Self {
            api,
            cache: LookupCache::new(),
            dry_run,
        }
    }

    /// Runs a mutating API call, or only logs it in dry-run mode.
    ///
    /// The call is passed as an unpolled future, so nothing is sent when it is dropped.
    pub async fn mutate<F>(&self, action: &str, call: F) -> GitLabResult<()>
    where
        F: Future<Output = GitLabResult<()>> + Send,
    {
        if self.dry_run {
            info!(action = action, "Dry run, not applying change");
            return Ok(());
        }
        call.await
    }
}

/// Applies one configuration section to a project or group.
///
/// Implementations log and count individual item failures and carry on with the next
/// item. An `Err` means the whole section could not be processed: a configuration
/// error, or GitLab failing to list the current state.
#[async_trait]
pub trait Processor: Send + Sync {
    /// The configuration key this processor handles, e.g. `group_labels`.
    fn section(&self) -> &'static str;

    /// Whether the section applies to projects or to groups.
    fn target_kind(&self) -> EntityKind;

    /// Checks the section without calling GitLab. Every error `process` could raise
    /// from the configuration alone is raised here.
    fn validate(&self, target: &Target, section: &Value) -> GitLabFormResult<()>;

    async fn process(
        &self,
        ctx: &ProcessorContext,
        target: &Target,
        section: &Value,
    ) -> GitLabFormResult<ApplyResult>;
}
