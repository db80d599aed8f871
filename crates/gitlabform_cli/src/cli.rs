//! Command-line arguments.

use clap::Parser;
use config_manager::DEFAULT_CONFIG_FILE;
use gitlabform_core::RunOptions;
use std::path::PathBuf;

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

/// Environment variable holding a `tracing` filter; overrides `--verbose` and `--debug`.
pub const LOG_FILTER_ENV: &str = "GITLABFORM_LOG";

/// GitLabForm: apply a YAML configuration to GitLab projects and groups
#[derive(Debug, Parser)]
#[command(name = "gitlabform", version)]
#[command(about = "Apply a YAML configuration to GitLab projects and groups", long_about = None)]
pub struct Cli {
    /// Project or group path, ALL or ALL_DEFINED
    pub target: String,

    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Log what is being changed
    #[arg(short, long)]
    pub verbose: bool,

    /// Log API calls and configuration details
    #[arg(short, long)]
    pub debug: bool,

    /// Show what would change without changing anything
    #[arg(short, long)]
    pub noop: bool,

    /// Stop after the first project or group that fails
    #[arg(short, long)]
    pub terminate: bool,

    /// Also process archived projects
    #[arg(short = 'a', long)]
    pub include_archived_projects: bool,
}

impl Cli {
    /// Log level selected by the verbosity flags.
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            dry_run: self.noop,
            terminate_after_error: self.terminate,
            include_archived_projects: self.include_archived_projects,
        }
    }
}
