//! Configuration system error types.
//!
//! Domain-specific errors for loading the configuration file, parsing it and
//! validating the content of its sections.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Configuration system errors.
///
/// Every variant means the configuration cannot be used as written, so callers
/// treat all of them as invalid input rather than as a processing failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to access configuration file: {path} - {reason}")]
    FileAccessError { path: String, reason: String },

    #[error("Failed to parse configuration: {reason}")]
    ParseError { reason: String },

    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("Required configuration missing: {key}")]
    RequiredConfigMissing { key: String },

    #[error("Unsupported config_version {version}, only version 3 is supported")]
    UnsupportedVersion { version: String },
}

impl ConfigurationError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl ToString) -> Self {
        ConfigurationError::InvalidConfiguration {
            field: field.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for configuration operations.
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;
