// ABOUTME: Project identifier in "owner/repo" form.
// ABOUTME: The key trigger sources use to look up project configuration.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectIdError {
    #[error("project identifier cannot be empty")]
    Empty,

    #[error("project identifier must be of the form owner/repo")]
    MissingSlash,

    #[error("project identifier has an empty segment")]
    EmptySegment,

    #[error("invalid character in project identifier: '{0}'")]
    InvalidChar(char),
}

/// A project identifier such as `octocat/hello-world`.
///
/// Matches the `full_name` a forge reports for a repository: exactly one
/// slash, both segments non-empty, segments limited to alphanumerics,
/// hyphen, underscore and dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(value: &str) -> Result<Self, ProjectIdError> {
        if value.is_empty() {
            return Err(ProjectIdError::Empty);
        }

        let Some((owner, repo)) = value.split_once('/') else {
            return Err(ProjectIdError::MissingSlash);
        };

        if owner.is_empty() || repo.is_empty() {
            return Err(ProjectIdError::EmptySegment);
        }

        if repo.contains('/') {
            return Err(ProjectIdError::InvalidChar('/'));
        }

        for c in owner.chars().chain(repo.chars()) {
            if !c.is_ascii_alphanumeric() && c != '-' && c != '_' && c != '.' {
                return Err(ProjectIdError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The repository segment, without the owner.
    pub fn repo(&self) -> &str {
        self.0
            .split_once('/')
            .map(|(_, repo)| repo)
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
