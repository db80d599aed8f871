//! Connection settings for the GitLab instance (`gitlab:` section).

use gitlab_client::ClientSettings;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::{ConfigurationError, ConfigurationResult};

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;

/// Environment variable that overrides `gitlab.url`.
pub const GITLAB_URL_ENV: &str = "GITLAB_URL";

/// Environment variable that overrides `gitlab.token`.
pub const GITLAB_TOKEN_ENV: &str = "GITLAB_TOKEN";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_ssl_verify() -> bool {
    true
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// The `gitlab:` section of the configuration file.
#[derive(Debug, Deserialize)]
pub struct GitLabConnection {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub token: Option<SecretString>,
    #[serde(default = "default_ssl_verify")]
    pub ssl_verify: bool,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for GitLabConnection {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            ssl_verify: default_ssl_verify(),
            timeout: default_timeout(),
        }
    }
}

impl GitLabConnection {
    /// Builds the client settings, letting the process environment override the file.
    pub fn client_settings(&self) -> ConfigurationResult<ClientSettings> {
        self.client_settings_with(|name| std::env::var(name).ok())
    }

    /// Builds the client settings, reading overrides through `lookup`.
    pub fn client_settings_with<F>(&self, lookup: F) -> ConfigurationResult<ClientSettings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = match lookup(GITLAB_URL_ENV).filter(|value| !value.trim().is_empty()) {
            Some(url) => {
                debug!(variable = GITLAB_URL_ENV, "GitLab URL taken from the environment");
                url
            }
            None => self
                .url
                .clone()
                .ok_or_else(|| ConfigurationError::RequiredConfigMissing {
                    key: "gitlab.url".to_string(),
                })?,
        };

        let token = match lookup(GITLAB_TOKEN_ENV).filter(|value| !value.trim().is_empty()) {
            Some(token) => {
                debug!(
                    variable = GITLAB_TOKEN_ENV,
                    "GitLab token taken from the environment"
                );
                SecretString::from(token)
            }
            None => self
                .token
                .as_ref()
                .map(|token| SecretString::from(token.expose_secret().to_string()))
                .ok_or_else(|| ConfigurationError::RequiredConfigMissing {
                    key: "gitlab.token".to_string(),
                })?,
        };

        if self.timeout == 0 {
            return Err(ConfigurationError::invalid(
                "gitlab.timeout",
                "must be at least one second",
            ));
        }

        Ok(ClientSettings {
            url,
            token,
            ssl_verify: self.ssl_verify,
            timeout: Duration::from_secs(self.timeout),
        })
    }
}
