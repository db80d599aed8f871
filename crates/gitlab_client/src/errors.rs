//! Error types for GitLab client operations.
//!
//! This module defines the error types that can occur when interacting with the GitLab API
//! through the gitlab_client crate. It provides enough context for callers to decide whether
//! an error affects a single item (and can be skipped) or the whole run.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitLab client operations.
///
/// ## Examples
///
/// ```rust,ignore
/// use gitlab_client::Error;
///
/// match client.get_project("group/project").await {
///     Ok(project) => println!("Project id: {}", project.id),
///     Err(Error::NotFound) => eprintln!("No such project"),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The GitLab API answered with a non-success status code.
    ///
    /// The message contains the `message` / `error` field of the response body when
    /// GitLab provided one, otherwise the raw body.
    #[error("GitLab API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// The client could not be built from the given connection settings.
    #[error("Invalid GitLab client configuration: {0}")]
    InvalidConfiguration(String),

    /// Error deserializing the response from GitLab.
    ///
    /// This error occurs when the GitLab API returns a response that cannot be
    /// parsed into the expected data structure.
    #[error("Failed to deserialize GitLab response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Transport level failure (DNS, TLS, timeout, connection reset).
    #[error("HTTP request to GitLab failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The requested resource was not found.
    ///
    /// This error occurs when a GitLab API request returns a 404 status code,
    /// indicating that the requested resource (project, group, user, schedule, etc.)
    /// does not exist or is not visible with the current token.
    #[error("Resource not found")]
    NotFound,

    /// The token was rejected or lacks the permissions for the request (401 / 403).
    #[error("GitLab rejected the request as unauthorized: {0}")]
    Unauthorized(String),
}

impl Error {
    /// Returns true when the error means the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }
}

/// Result type alias for GitLab client operations.
pub type GitLabResult<T> = Result<T, Error>;
