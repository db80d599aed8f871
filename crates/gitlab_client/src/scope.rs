//! Addressing of GitLab entities.
//!
//! Most GitLab resources (members, shares, labels, variables, badges, settings) exist
//! both on projects and on groups with the same payloads, only under a different URL
//! prefix. [`Scope`] captures that choice so the client and the processors can share one
//! implementation for both entity kinds.

use std::fmt;

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;

/// The kind of entity a configuration section applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Project,
    Group,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Project => write!(f, "project"),
            EntityKind::Group => write!(f, "group"),
        }
    }
}

/// A project or group, identified by its full path (`group/subgroup/project`).
///
/// # Examples
///
/// ```rust
/// use gitlab_client::Scope;
///
/// let scope = Scope::project("my-group/my-project");
/// assert_eq!(scope.path(), "my-group/my-project");
/// assert_eq!(scope.to_string(), "project 'my-group/my-project'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Project(String),
    Group(String),
}

impl Scope {
    pub fn project(path: impl Into<String>) -> Self {
        Scope::Project(path.into())
    }

    pub fn group(path: impl Into<String>) -> Self {
        Scope::Group(path.into())
    }

    /// The full path of the entity.
    pub fn path(&self) -> &str {
        match self {
            Scope::Project(path) | Scope::Group(path) => path,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Scope::Project(_) => EntityKind::Project,
            Scope::Group(_) => EntityKind::Group,
        }
    }

    /// The API path of the entity itself, e.g. `projects/group%2Fproject`.
    pub(crate) fn api_path(&self) -> String {
        let collection = match self {
            Scope::Project(_) => "projects",
            Scope::Group(_) => "groups",
        };
        format!("{}/{}", collection, encode_path(self.path()))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind(), self.path())
    }
}

/// URL-encodes a single path segment, including any `/` it contains.
///
/// Form encoding turns spaces into `+`, which a path would keep literally, so they are
/// rewritten to `%20`. A literal `+` has already been encoded as `%2B` at that point.
pub(crate) fn encode_path(path: &str) -> String {
    url::form_urlencoded::byte_serialize(path.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
