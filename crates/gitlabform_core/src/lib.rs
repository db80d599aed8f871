//! # GitLabForm Core
//!
//! Reconciles GitLab projects and groups with a declarative YAML configuration.
//!
//! ## Overview
//!
//! A run resolves a target (a project, a group, `ALL` or `ALL_DEFINED`) to a list of
//! projects and groups, computes the effective configuration of each one from the
//! hierarchical `projects_and_groups` entries, and hands every configured section to
//! the [`Processor`] responsible for it. Processors compare the section with the
//! current state in GitLab and make only the calls needed to converge:
//!
//! - `project_settings` / `group_settings`: entity attributes
//! - `members` / `group_members`: direct members and shared groups
//! - `group_saml_links`: SAML group links
//! - `schedules`: pipeline schedules and their variables
//! - `labels` / `group_labels`, `variables` / `group_variables`,
//!   `badges` / `group_badges` and `hooks`
//!
//! ## Examples
//!
//! ```no_run
//! use config_manager::Configuration;
//! use gitlab_client::{create_client, GitLabApi};
//! use gitlabform_core::{GitLabForm, RunOptions};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Configuration::from_file(Path::new("config.yml"))?;
//! let client = create_client(&config.gitlab().client_settings()?)?;
//! let api: Arc<dyn GitLabApi> = Arc::new(client);
//!
//! let gitlabform = GitLabForm::new(api, config, RunOptions::default());
//! let summary = gitlabform.run("my-group/my-project").await?;
//! println!("{}", summary);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Invalid configuration ends a run with [`GitLabFormError::Configuration`] or
//! [`GitLabFormError::InvalidInput`] (exit code [`EXIT_INVALID_INPUT`]). GitLab errors
//! only fail the project or group being processed; failed targets are reported with
//! [`GitLabFormError::ProcessingFailed`] (exit code [`EXIT_PROCESSING_ERROR`]).

pub mod apply_result;
pub mod errors;
pub mod gitlabform;
pub mod lookup_cache;
pub mod processor;
pub mod processors;

#[cfg(test)]
mod mock_gitlab;

pub use apply_result::ApplyResult;
pub use errors::{GitLabFormError, GitLabFormResult, EXIT_INVALID_INPUT, EXIT_PROCESSING_ERROR};
pub use gitlabform::{GitLabForm, RunOptions, RunSummary, ALL_DEFINED_TARGET, ALL_TARGET};
pub use lookup_cache::LookupCache;
pub use processor::{Processor, ProcessorContext, Target};
