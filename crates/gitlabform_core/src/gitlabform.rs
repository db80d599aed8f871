//! Run orchestration: resolving what to process and applying every processor to it.

use config_manager::{Configuration, EntityConfig};
use gitlab_client::{GitLabApi, Group, Project};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::processors::{group_processors, project_processors};
use crate::{ApplyResult, GitLabFormError, GitLabFormResult, Processor, ProcessorContext, Target};

#[cfg(test)]
#[path = "gitlabform_tests.rs"]
mod tests;

/// Target selecting every group and project the token can see.
pub const ALL_TARGET: &str = "ALL";

/// Target selecting every entity named in `projects_and_groups`.
pub const ALL_DEFINED_TARGET: &str = "ALL_DEFINED";

/// Options controlling a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Log the changes instead of making them
    pub dry_run: bool,

    /// Stop at the first project or group that fails
    pub terminate_after_error: bool,

    /// Process archived projects instead of skipping them
    pub include_archived_projects: bool,
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Projects and groups that were processed
    pub processed: usize,

    /// Projects and groups excluded by skip lists or because they are archived
    pub skipped: usize,

    /// Paths of the projects and groups that failed
    pub failed: Vec<String>,

    /// Changes across all processed targets
    pub changes: ApplyResult,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed, {} skipped, {} failed ({})",
            self.processed,
            self.skipped,
            self.failed.len(),
            self.changes
        )
    }
}

/// Groups and projects selected by a target, without duplicates.
#[derive(Debug, Default)]
struct Selection {
    groups: Vec<Group>,
    projects: Vec<Project>,
    group_ids: HashSet<u64>,
    project_ids: HashSet<u64>,
}

impl Selection {
    fn add_group(&mut self, group: Group) {
        if self.group_ids.insert(group.id) {
            self.groups.push(group);
        }
    }

    fn add_project(&mut self, project: Project) {
        if self.project_ids.insert(project.id) {
            self.projects.push(project);
        }
    }
}

/// Applies a configuration to GitLab.
pub struct GitLabForm {
    config: Configuration,
    ctx: ProcessorContext,
    options: RunOptions,
    project_processors: Vec<Box<dyn Processor>>,
    group_processors: Vec<Box<dyn Processor>>,
}

impl GitLabForm {
    pub fn new(api: Arc<dyn GitLabApi>, config: Configuration, options: RunOptions) -> Self {
        Self {
            config,
            ctx: ProcessorContext::new(api, options.dry_run),
            options,
            project_processors: project_processors(),
            group_processors: group_processors(),
        }
    }

    /// Processes `target`: `ALL`, `ALL_DEFINED`, a project path or a group path.
    ///
    /// The configuration of every selected target is validated first, so a configuration
    /// error ends the run before anything is changed. Groups are processed before
    /// projects. A target failing on GitLab's side is logged and the run carries on unless
    /// `terminate_after_error` is set. Failed targets are reported as
    /// [`GitLabFormError::ProcessingFailed`] at the end.
    #[instrument(skip(self), fields(dry_run = self.options.dry_run))]
    pub async fn run(&self, target: &str) -> GitLabFormResult<RunSummary> {
        let selection = self.select(target).await?;
        let mut summary = RunSummary::default();
        let targets = self.filter(selection, &mut summary);
        info!(
            targets = targets.len(),
            skipped = summary.skipped,
            "Processing projects and groups"
        );
        for entity in &targets {
            self.validate_target(entity)?;
        }

        for (index, entity) in targets.iter().enumerate() {
            info!(entity = %entity, progress = %format!("{}/{}", index + 1, targets.len()), "Processing");
            match self.process_target(entity).await {
                Ok(result) if result.is_success() => {
                    summary.processed += 1;
                    summary.changes.absorb(result);
                }
                Ok(result) => {
                    error!(
                        entity = %entity,
                        failed_items = ?result.failed_items,
                        "Some changes could not be applied"
                    );
                    summary.processed += 1;
                    summary.failed.push(entity.path().to_string());
                    summary.changes.absorb(result);
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    error!(entity = %entity, error = %e, "Failed to process");
                    summary.failed.push(entity.path().to_string());
                }
            }

            if !summary.failed.is_empty() && self.options.terminate_after_error {
                warn!("Stopping after the first failure");
                break;
            }
        }

        info!(summary = %summary, "Run finished");
        if summary.failed.is_empty() {
            Ok(summary)
        } else {
            Err(GitLabFormError::ProcessingFailed {
                failed: summary.failed,
            })
        }
    }

    fn config_for(&self, target: &Target) -> (EntityConfig, &[Box<dyn Processor>]) {
        match target {
            Target::Project(project) => (
                self.config.project_config(&project.path_with_namespace),
                self.project_processors.as_slice(),
            ),
            Target::Group(group) => (
                self.config.group_config(&group.full_path),
                self.group_processors.as_slice(),
            ),
        }
    }

    /// Parses every configured section of a target, so that configuration errors end
    /// the run before anything is changed.
    fn validate_target(&self, target: &Target) -> GitLabFormResult<()> {
        let (config, processors) = self.config_for(target);
        for processor in processors {
            if let Some(section) = config.section(processor.section()) {
                processor.validate(target, section)?;
            }
        }
        Ok(())
    }

    /// Applies every configured section to one project or group.
    async fn process_target(&self, target: &Target) -> GitLabFormResult<ApplyResult> {
        let (config, processors) = self.config_for(target);
        let mut total = ApplyResult::new();
        if config.is_empty() {
            debug!(entity = %target, "No configuration applies");
            return Ok(total);
        }
        self.log_unknown_sections(target, &config);

        for processor in processors {
            let Some(section) = config.section(processor.section()) else {
                continue;
            };
            let result = processor.process(&self.ctx, target, section).await?;
            info!(entity = %target, section = processor.section(), result = %result, "Processed section");
            total.absorb(result);
        }
        Ok(total)
    }

    async fn select(&self, target: &str) -> GitLabFormResult<Selection> {
        let api = self.ctx.api.as_ref();
        let mut selection = Selection::default();

        match target {
            ALL_TARGET => {
                for group in api.list_groups().await? {
                    selection.add_group(group);
                }
                for project in api.list_projects().await? {
                    selection.add_project(project);
                }
            }
            ALL_DEFINED_TARGET => {
                for path in self.config.defined_paths() {
                    let found = match path.strip_suffix("/*") {
                        Some(group) => self.select_group(group, &mut selection).await?,
                        None => self.select_path(path, &mut selection).await?,
                    };
                    if !found {
                        warn!(path = path, "Configured path does not exist in GitLab, skipping");
                    }
                }
            }
            path => {
                if !self.select_path(path, &mut selection).await? {
                    return Err(GitLabFormError::TargetNotFound {
                        target: path.to_string(),
                    });
                }
            }
        }

        Ok(selection)
    }

    /// Selects a project, or else a group with everything below it.
    async fn select_path(&self, path: &str, selection: &mut Selection) -> GitLabFormResult<bool> {
        match self.ctx.api.get_project(path).await {
            Ok(project) => {
                selection.add_project(project);
                Ok(true)
            }
            Err(e) if e.is_not_found() => self.select_group(path, selection).await,
            Err(e) => Err(e.into()),
        }
    }

    /// Selects a group, its descendant groups and all of their projects.
    async fn select_group(&self, path: &str, selection: &mut Selection) -> GitLabFormResult<bool> {
        let api = self.ctx.api.as_ref();
        let group = match api.get_group(path).await {
            Ok(group) => group,
            Err(e) if e.is_not_found() => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        selection.add_group(group);
        for group in api.list_descendant_groups(path).await? {
            selection.add_group(group);
        }
        for project in api.list_group_projects(path).await? {
            selection.add_project(project);
        }
        Ok(true)
    }

    fn log_unknown_sections(&self, target: &Target, config: &EntityConfig) {
        let known: HashSet<&str> = self
            .project_processors
            .iter()
            .chain(self.group_processors.iter())
            .map(|p| p.section())
            .collect();
        for name in config.section_names() {
            if !known.contains(name) {
                debug!(entity = %target, section = name, "Ignoring unknown section");
            }
        }
    }

    /// Drops skipped and archived entities; groups come first in the result.
    fn filter(&self, selection: Selection, summary: &mut RunSummary) -> Vec<Target> {
        let mut targets = Vec::new();

        for group in selection.groups {
            if self.config.is_group_skipped(&group.full_path) {
                info!(group = group.full_path.as_str(), "Skipping group");
                summary.skipped += 1;
                continue;
            }
            targets.push(Target::Group(group));
        }

        for project in selection.projects {
            let path = project.path_with_namespace.as_str();
            if self.config.is_project_skipped(path)
                || self.config.is_group_skipped(&project.namespace.full_path)
            {
                info!(project = path, "Skipping project");
                summary.skipped += 1;
                continue;
            }
            if project.archived && !self.options.include_archived_projects {
                info!(project = path, "Skipping archived project");
                summary.skipped += 1;
                continue;
            }
            targets.push(Target::Project(project));
        }

        targets
    }
}

