use config_manager::ConfigurationError;
use gitlabform_core::{GitLabFormError, EXIT_INVALID_INPUT};
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the GitLabForm CLI application.
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file or the connection settings cannot be used.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The run itself failed; see [`GitLabFormError`].
    #[error(transparent)]
    Run(#[from] GitLabFormError),
}

impl From<ConfigurationError> for Error {
    fn from(e: ConfigurationError) -> Self {
        Error::Config(e.to_string())
    }
}

impl Error {
    /// The process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => EXIT_INVALID_INPUT,
            Error::Run(e) => e.exit_code(),
        }
    }
}
