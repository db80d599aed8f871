//! Configuration management for GitLabForm.
//!
//! This crate loads the YAML configuration file, resolves the effective configuration
//! of a project or group from the hierarchical `projects_and_groups` entries and parses
//! the individual sections into typed settings.
//!
//! # Examples
//!
//! ```rust
//! use config_manager::{settings::{EnforcedMap, LabelConfig}, Configuration};
//!
//! let config = Configuration::from_yaml_str(r##"
//! projects_and_groups:
//!   "*":
//!     labels:
//!       bug: { color: "#d73a4a" }
//!   platform/*:
//!     labels:
//!       enforce: true
//! "##)?;
//!
//! let project = config.project_config("platform/api");
//! let labels: EnforcedMap<LabelConfig> =
//!     EnforcedMap::from_value("labels", project.section("labels").unwrap())?;
//! assert!(labels.enforce);
//! assert!(labels.entries.contains_key("bug"));
//! # Ok::<(), config_manager::ConfigurationError>(())
//! ```

pub mod configuration;
pub mod connection;
pub mod errors;
pub mod merger;
pub mod settings;

// Re-export for convenient access
pub use configuration::{Configuration, EntityConfig, ALL_ENTITIES_KEY, SUPPORTED_CONFIG_VERSION};
pub use connection::{GitLabConnection, GITLAB_TOKEN_ENV, GITLAB_URL_ENV};
pub use errors::{ConfigurationError, ConfigurationResult};
pub use merger::ConfigurationMerger;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";
