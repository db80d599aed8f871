//! Pipeline schedules (`schedules`).

use async_trait::async_trait;
use config_manager::settings::{DesiredSchedule, EnforcedMap, ScheduleConfig};
use config_manager::ConfigurationResult;
use gitlab_client::{
    EntityKind, GitLabApi, GitLabResult, PipelineSchedule, PipelineSchedulePayload,
    PipelineScheduleVariable,
};
use serde_yaml::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::{tally, Change};
use crate::{ApplyResult, GitLabFormResult, Processor, ProcessorContext, Target};

#[cfg(test)]
#[path = "schedules_tests.rs"]
mod tests;

const SECTION: &str = "schedules";

/// Reconciles the pipeline schedules of a project, identified by description.
///
/// GitLab allows several schedules with the same description. When that happens the
/// duplicates are all deleted and a single schedule is created in their place.
pub struct SchedulesProcessor;

/// What the configuration asks for one description.
enum Plan {
    Delete,
    Apply(DesiredSchedule),
}

/// Fields of `existing` that differ from `desired`, as an update request.
fn changed_fields(existing: &PipelineSchedule, desired: &DesiredSchedule) -> PipelineSchedulePayload {
    let differs = |current: &str, wanted: &str| (current != wanted).then(|| wanted.to_string());
    PipelineSchedulePayload {
        description: None,
        git_ref: differs(&existing.git_ref, &desired.git_ref),
        cron: differs(&existing.cron, &desired.cron),
        cron_timezone: differs(&existing.cron_timezone, &desired.cron_timezone),
        active: (existing.active != desired.active).then_some(desired.active),
    }
}

fn full_payload(desired: &DesiredSchedule) -> PipelineSchedulePayload {
    PipelineSchedulePayload {
        description: Some(desired.description.clone()),
        git_ref: Some(desired.git_ref.clone()),
        cron: Some(desired.cron.clone()),
        cron_timezone: Some(desired.cron_timezone.clone()),
        active: Some(desired.active),
    }
}

/// Changes needed to turn the `current` variables of a schedule into `desired`.
#[derive(Debug, Default, PartialEq)]
struct VariableChanges<'a> {
    create: Vec<&'a PipelineScheduleVariable>,
    update: Vec<&'a PipelineScheduleVariable>,
    delete: Vec<&'a str>,
}

impl<'a> VariableChanges<'a> {
    fn between(current: &'a [PipelineScheduleVariable], desired: &'a [PipelineScheduleVariable]) -> Self {
        let existing: HashMap<&str, &PipelineScheduleVariable> =
            current.iter().map(|v| (v.key.as_str(), v)).collect();
        let mut changes = Self::default();
        for variable in desired {
            match existing.get(variable.key.as_str()) {
                None => changes.create.push(variable),
                Some(&found) if found != variable => changes.update.push(variable),
                Some(_) => {}
            }
        }
        changes.delete = current
            .iter()
            .filter(|v| !desired.iter().any(|d| d.key == v.key))
            .map(|v| v.key.as_str())
            .collect();
        changes
    }

    fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }
}

impl SchedulesProcessor {
    async fn delete_all(
        &self,
        ctx: &ProcessorContext,
        project: &str,
        description: &str,
        schedules: &[&PipelineSchedule],
        result: &mut ApplyResult,
    ) {
        for schedule in schedules {
            let outcome = ctx
                .mutate(
                    "delete pipeline schedule",
                    ctx.api.delete_pipeline_schedule(project, schedule.id),
                )
                .await;
            tally(result, SECTION, description, Change::Deleted, outcome);
        }
    }

    async fn create(
        &self,
        ctx: &ProcessorContext,
        project: &str,
        desired: &DesiredSchedule,
        result: &mut ApplyResult,
    ) {
        if ctx.dry_run {
            info!(
                project = project,
                description = desired.description.as_str(),
                "Dry run, not creating pipeline schedule"
            );
            result.created += 1;
            return;
        }

        let outcome = create_with_variables(ctx.api.as_ref(), project, desired).await;
        tally(result, SECTION, &desired.description, Change::Created, outcome);
    }

    async fn update(
        &self,
        ctx: &ProcessorContext,
        project: &str,
        existing: &PipelineSchedule,
        desired: &DesiredSchedule,
        result: &mut ApplyResult,
    ) -> GitLabResult<()> {
        let api = ctx.api.as_ref();
        let with_variables = api.get_pipeline_schedule(project, existing.id).await?;
        let variables = VariableChanges::between(&with_variables.variables, &desired.variables);
        let fields = changed_fields(&with_variables, desired);
        let fields_changed = fields != PipelineSchedulePayload::default();

        if !fields_changed && variables.is_empty() {
            debug!(
                project = project,
                description = desired.description.as_str(),
                "Pipeline schedule unchanged"
            );
            result.skipped += 1;
            return Ok(());
        }

        let id = existing.id;
        let outcome = async {
            if fields_changed {
                ctx.mutate(
                    "update pipeline schedule",
                    api.update_pipeline_schedule(project, id, &fields),
                )
                .await?;
            }
            ctx.mutate(
                "take pipeline schedule ownership",
                api.take_pipeline_schedule_ownership(project, id),
            )
            .await?;
            for variable in &variables.create {
                ctx.mutate(
                    "create schedule variable",
                    api.create_pipeline_schedule_variable(project, id, variable),
                )
                .await?;
            }
            for variable in &variables.update {
                ctx.mutate(
                    "update schedule variable",
                    api.update_pipeline_schedule_variable(project, id, variable),
                )
                .await?;
            }
            for key in &variables.delete {
                ctx.mutate(
                    "delete schedule variable",
                    api.delete_pipeline_schedule_variable(project, id, key),
                )
                .await?;
            }
            Ok::<(), gitlab_client::Error>(())
        }
        .await;
        tally(result, SECTION, &desired.description, Change::Updated, outcome);
        Ok(())
    }
}

/// Creates the schedule, then its variables in the configured order.
async fn create_with_variables(
    api: &dyn GitLabApi,
    project: &str,
    desired: &DesiredSchedule,
) -> GitLabResult<()> {
    let created = api
        .create_pipeline_schedule(project, &full_payload(desired))
        .await?;
    for variable in &desired.variables {
        api.create_pipeline_schedule_variable(project, created.id, variable)
            .await?;
    }
    Ok(())
}

/// Resolves every configured schedule before anything is listed or changed.
fn plans(config: &EnforcedMap<ScheduleConfig>) -> ConfigurationResult<Vec<(&str, Plan)>> {
    config
        .entries
        .iter()
        .map(|(description, schedule)| {
            if schedule.delete {
                Ok((description.as_str(), Plan::Delete))
            } else {
                schedule
                    .desired(SECTION, description)
                    .map(|desired| (description.as_str(), Plan::Apply(desired)))
            }
        })
        .collect()
}

#[async_trait]
impl Processor for SchedulesProcessor {
    fn section(&self) -> &'static str {
        SECTION
    }

    fn target_kind(&self) -> EntityKind {
        EntityKind::Project
    }

    fn validate(&self, _target: &Target, section: &Value) -> GitLabFormResult<()> {
        let config: EnforcedMap<ScheduleConfig> = EnforcedMap::from_value(SECTION, section)?;
        plans(&config)?;
        Ok(())
    }

    async fn process(
        &self,
        ctx: &ProcessorContext,
        target: &Target,
        section: &Value,
    ) -> GitLabFormResult<ApplyResult> {
        let config: EnforcedMap<ScheduleConfig> = EnforcedMap::from_value(SECTION, section)?;
        let plans = plans(&config)?;

        let project = target.path();
        let current = ctx.api.list_pipeline_schedules(project).await?;
        let mut result = ApplyResult::new();

        for (description, plan) in &plans {
            let matching: Vec<&PipelineSchedule> = current
                .iter()
                .filter(|schedule| schedule.description == *description)
                .collect();

            match (plan, matching.as_slice()) {
                (Plan::Delete, []) => {
                    warn!(
                        entity = %target,
                        description = *description,
                        "Pipeline schedule to delete not found"
                    );
                    result.skipped += 1;
                }
                (Plan::Delete, found) => {
                    self.delete_all(ctx, project, description, found, &mut result)
                        .await;
                }
                (Plan::Apply(desired), []) => {
                    self.create(ctx, project, desired, &mut result).await;
                }
                (Plan::Apply(desired), [existing]) => {
                    if let Err(e) = self
                        .update(ctx, project, existing, desired, &mut result)
                        .await
                    {
                        warn!(description = *description, error = %e, "Failed to read pipeline schedule");
                        result.record_failure(*description);
                    }
                }
                (Plan::Apply(desired), duplicates) => {
                    info!(
                        entity = %target,
                        description = *description,
                        count = duplicates.len(),
                        "Replacing duplicate pipeline schedules"
                    );
                    self.delete_all(ctx, project, description, duplicates, &mut result)
                        .await;
                    self.create(ctx, project, desired, &mut result).await;
                }
            }
        }

        if config.enforce {
            for schedule in current
                .iter()
                .filter(|s| !config.entries.contains_key(&s.description))
            {
                let outcome = ctx
                    .mutate(
                        "delete pipeline schedule",
                        ctx.api.delete_pipeline_schedule(project, schedule.id),
                    )
                    .await;
                tally(&mut result, SECTION, &schedule.description, Change::Deleted, outcome);
            }
        }

        Ok(result)
    }
}
