//! Loading of the configuration file and lookup of per-entity configuration.
//!
//! The file is read once; the effective configuration of any project or group is then
//! computed on demand by merging the matching `projects_and_groups` entries with
//! [`ConfigurationMerger`].

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::{ConfigurationError, ConfigurationMerger, ConfigurationResult, GitLabConnection};

#[cfg(test)]
#[path = "configuration_tests.rs"]
mod tests;

/// The only configuration file version this tool understands.
pub const SUPPORTED_CONFIG_VERSION: u64 = 3;

/// Key matching every project and group.
pub const ALL_ENTITIES_KEY: &str = "*";

#[derive(Debug, Deserialize)]
struct RawConfiguration {
    #[serde(default)]
    config_version: Option<Value>,
    #[serde(default)]
    gitlab: Option<GitLabConnection>,
    #[serde(default)]
    projects_and_groups: Option<Value>,
    #[serde(default)]
    skip_groups: Vec<String>,
    #[serde(default)]
    skip_projects: Vec<String>,
}

/// A loaded configuration file.
#[derive(Debug)]
pub struct Configuration {
    gitlab: GitLabConnection,
    /// Entries of `projects_and_groups`, keyed by lower-cased path, in file order
    entries: Vec<(String, Mapping)>,
    skip_groups: Vec<String>,
    skip_projects: Vec<String>,
}

/// The merged configuration of one project or group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityConfig {
    sections: Mapping,
}

impl EntityConfig {
    pub fn new(sections: Mapping) -> Self {
        Self { sections }
    }

    /// Returns the content of a section, if configured.
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.sections.get(name).filter(|value| !value.is_null())
    }

    /// Names of all configured sections, in file order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().filter_map(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl Configuration {
    /// Reads and parses a configuration file.
    #[instrument]
    pub fn from_file(path: &Path) -> ConfigurationResult<Self> {
        let file = path.display().to_string();
        if !path.exists() {
            return Err(ConfigurationError::FileNotFound { path: file });
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::FileAccessError {
                path: file.clone(),
                reason: e.to_string(),
            }
        })?;

        let configuration = Self::from_yaml_str(&content)?;
        info!(
            path = file.as_str(),
            entries = configuration.entries.len(),
            "Loaded configuration"
        );
        Ok(configuration)
    }

    /// Parses configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> ConfigurationResult<Self> {
        let raw: RawConfiguration =
            serde_yaml::from_str(content).map_err(|e| ConfigurationError::ParseError {
                reason: e.to_string(),
            })?;

        if let Some(version) = &raw.config_version {
            check_version(version)?;
        }

        let entries = match raw.projects_and_groups {
            Some(Value::Mapping(map)) => parse_entries(map)?,
            Some(Value::Null) | None => {
                return Err(ConfigurationError::RequiredConfigMissing {
                    key: "projects_and_groups".to_string(),
                })
            }
            Some(_) => {
                return Err(ConfigurationError::invalid(
                    "projects_and_groups",
                    "must be a mapping of group and project paths",
                ))
            }
        };

        Ok(Self {
            gitlab: raw.gitlab.unwrap_or_default(),
            entries,
            skip_groups: raw.skip_groups,
            skip_projects: raw.skip_projects,
        })
    }

    pub fn gitlab(&self) -> &GitLabConnection {
        &self.gitlab
    }

    /// Paths written in `projects_and_groups`, except `*`, in file order.
    pub fn defined_paths(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .map(|(path, _)| path.as_str())
            .filter(|path| *path != ALL_ENTITIES_KEY)
    }

    /// Effective configuration of a project: `*`, then `a/*`, `a/b/*`, ... and finally
    /// the project's own entry.
    pub fn project_config(&self, project_path: &str) -> EntityConfig {
        let project_path = project_path.to_lowercase();
        let mut keys = vec![ALL_ENTITIES_KEY.to_string()];
        keys.extend(group_wildcards(parent_path(&project_path)));
        keys.push(project_path);
        self.merge(&keys)
    }

    /// Effective configuration of a group: `*`, then `a/*` down to the group's own
    /// `a/b/*`, and finally an exact `a/b` entry.
    pub fn group_config(&self, group_path: &str) -> EntityConfig {
        let group_path = group_path.to_lowercase();
        let mut keys = vec![ALL_ENTITIES_KEY.to_string()];
        keys.extend(group_wildcards(&group_path));
        keys.push(group_path);
        self.merge(&keys)
    }

    pub fn is_group_skipped(&self, group_path: &str) -> bool {
        matches_any(&self.skip_groups, group_path)
    }

    pub fn is_project_skipped(&self, project_path: &str) -> bool {
        matches_any(&self.skip_projects, project_path)
    }

    fn merge(&self, keys: &[String]) -> EntityConfig {
        let layers: Vec<&Mapping> = keys
            .iter()
            .filter_map(|key| {
                self.entries
                    .iter()
                    .find(|(path, _)| path == key)
                    .map(|(_, layer)| layer)
            })
            .collect();
        debug!(layers = ?keys, found = layers.len(), "Merging configuration layers");
        EntityConfig::new(ConfigurationMerger::new().merge_layers(layers))
    }
}

fn check_version(version: &Value) -> ConfigurationResult<()> {
    let supported = match version {
        Value::Number(number) => number.as_u64() == Some(SUPPORTED_CONFIG_VERSION),
        Value::String(text) => text.trim().parse::<u64>().ok() == Some(SUPPORTED_CONFIG_VERSION),
        _ => false,
    };
    if supported {
        return Ok(());
    }

    let version = match version {
        Value::String(text) => text.clone(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim().to_string())
            .unwrap_or_default(),
    };
    Err(ConfigurationError::UnsupportedVersion { version })
}

fn parse_entries(map: Mapping) -> ConfigurationResult<Vec<(String, Mapping)>> {
    let mut entries: Vec<(String, Mapping)> = Vec::with_capacity(map.len());
    for (key, value) in map {
        let path = key
            .as_str()
            .map(|path| path.trim().trim_end_matches('/').to_lowercase())
            .ok_or_else(|| {
                ConfigurationError::invalid("projects_and_groups", "keys must be paths")
            })?;
        let sections = match value {
            Value::Mapping(sections) => sections,
            Value::Null => Mapping::new(),
            _ => {
                return Err(ConfigurationError::invalid(
                    format!("projects_and_groups.{}", path),
                    "must be a mapping of sections",
                ))
            }
        };
        if entries.iter().any(|(existing, _)| *existing == path) {
            return Err(ConfigurationError::invalid(
                format!("projects_and_groups.{}", path),
                "is defined more than once (paths are case-insensitive)",
            ));
        }
        entries.push((path, sections));
    }
    Ok(entries)
}

/// `a/b/c` -> `["a/*", "a/b/*", "a/b/c/*"]`
fn group_wildcards(group_path: &str) -> Vec<String> {
    if group_path.is_empty() {
        return Vec::new();
    }
    let segments: Vec<&str> = group_path.split('/').collect();
    (1..=segments.len())
        .map(|depth| format!("{}/*", segments[..depth].join("/")))
        .collect()
}

fn parent_path(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

/// Matches a path against skip entries: exact paths, or `prefix/*` for everything below
/// (and including) `prefix`. Comparison ignores case.
pub(crate) fn matches_any(patterns: &[String], path: &str) -> bool {
    let path = path.to_lowercase();
    patterns.iter().any(|pattern| {
        let pattern = pattern.trim().to_lowercase();
        match pattern.strip_suffix("/*") {
            Some(prefix) => path == prefix || path.starts_with(&format!("{}/", prefix)),
            None => path == pattern,
        }
    })
}
