//! Runs GitLabForm for the parsed command line.

use crate::cli::Cli;
use crate::errors::Error;
use config_manager::Configuration;
use gitlab_client::{create_client, GitLabApi};
use gitlabform_core::{GitLabForm, RunSummary};
use std::sync::Arc;
use tracing::{debug, info};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Loads the configuration, connects to GitLab and processes the requested target.
///
/// `GITLAB_URL` and `GITLAB_TOKEN` in the environment take precedence over the file.
pub async fn execute(cli: &Cli) -> Result<RunSummary, Error> {
    execute_with(cli, |name| std::env::var(name).ok()).await
}

pub(crate) async fn execute_with<F>(cli: &Cli, lookup: F) -> Result<RunSummary, Error>
where
    F: Fn(&str) -> Option<String>,
{
    debug!(path = %cli.config.display(), "Loading configuration");
    let config = Configuration::from_file(&cli.config)?;
    let settings = config.gitlab().client_settings_with(lookup)?;
    let client = create_client(&settings).map_err(|e| Error::Config(e.to_string()))?;
    let api: Arc<dyn GitLabApi> = Arc::new(client);

    let options = cli.run_options();
    if options.dry_run {
        info!("Running in dry-run mode, nothing will be changed");
    }

    let summary = GitLabForm::new(api, config, options)
        .run(&cli.target)
        .await?;
    Ok(summary)
}
