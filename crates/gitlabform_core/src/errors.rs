//! Error types for reconciliation runs.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Exit code for invalid or missing configuration and unknown targets.
pub const EXIT_INVALID_INPUT: i32 = 1;

/// Exit code for runs in which at least one target failed to process.
pub const EXIT_PROCESSING_ERROR: i32 = 2;

/// Errors that end a reconciliation run, or the processing of a single target.
#[derive(Error, Debug)]
pub enum GitLabFormError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] config_manager::ConfigurationError),

    #[error("GitLab API error: {0}")]
    GitLab(#[from] gitlab_client::Error),

    /// The configuration is well-formed but cannot be acted on.
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Target '{target}' is neither a project nor a group in GitLab or in the configuration")]
    TargetNotFound { target: String },

    #[error("Processing failed for {}: {}", failed.len(), failed.join(", "))]
    ProcessingFailed { failed: Vec<String> },
}

impl GitLabFormError {
    /// Errors caused by the input end the whole run; GitLab errors only affect the
    /// target being processed.
    pub fn is_fatal(&self) -> bool {
        self.exit_code() == EXIT_INVALID_INPUT
    }

    /// The process exit code this error maps to.
    pub fn exit_code(&self) -> i32 {
        match self {
            GitLabFormError::Configuration(_)
            | GitLabFormError::InvalidInput { .. }
            | GitLabFormError::TargetNotFound { .. } => EXIT_INVALID_INPUT,
            GitLabFormError::GitLab(_) | GitLabFormError::ProcessingFailed { .. } => {
                EXIT_PROCESSING_ERROR
            }
        }
    }
}

/// Result type alias for reconciliation operations.
pub type GitLabFormResult<T> = Result<T, GitLabFormError>;
