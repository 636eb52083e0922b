// ABOUTME: Per-project deployment configuration.
// ABOUTME: Identifier, branch, live path, persistent paths, and the activation strategy.

use crate::types::{ProjectId, ServiceName};
use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

/// Configuration for one deployable project.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Key trigger sources use to find this project, e.g. `octocat/widgets`.
    #[serde(deserialize_with = "deserialize_project_id")]
    pub identifier: ProjectId,

    /// Directory name the clone produces. Defaults to the repo segment of
    /// the identifier, which is what git names the checkout.
    #[serde(default)]
    pub short_name: Option<String>,

    /// Branch to clone.
    pub branch: String,

    /// Absolute path of the deployed project on this host.
    pub live_path: PathBuf,

    /// Clone URL override. Defaults to the GitHub https URL for the
    /// identifier.
    #[serde(default)]
    pub repo_url: Option<String>,

    /// Relative paths under `live_path` that must survive a redeploy.
    #[serde(default)]
    pub persistent: Vec<PathBuf>,

    pub strategy: Strategy,
}

/// How a freshly cloned checkout is brought online.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Strategy {
    /// Overlay a subtree of the checkout onto the live directory.
    FileTree {
        /// Path within the checkout whose content becomes the live content.
        repo_sub_path: PathBuf,
    },

    /// Copy compose files into the live directory, then pull images and
    /// cycle the service.
    ContainerService {
        compose_files: NonEmpty<PathBuf>,

        #[serde(deserialize_with = "deserialize_service_name")]
        service: ServiceName,

        /// Additional non-persistent files copied alongside the compose
        /// files (nginx snippets, env templates, ...).
        #[serde(default)]
        extra_files: Vec<PathBuf>,
    },
}

impl ProjectConfig {
    pub fn short_name(&self) -> &str {
        self.short_name
            .as_deref()
            .unwrap_or_else(|| self.identifier.repo())
    }

    pub fn clone_url(&self) -> String {
        self.repo_url
            .clone()
            .unwrap_or_else(|| format!("https://github.com/{}.git", self.identifier))
    }

    /// Reject configurations the pipeline cannot act on safely.
    pub fn validate(&self) -> Result<(), String> {
        if !self.live_path.is_absolute() {
            return Err(format!(
                "{}: live_path must be absolute, got '{}'",
                self.identifier,
                self.live_path.display()
            ));
        }

        if self.branch.is_empty() {
            return Err(format!("{}: branch cannot be empty", self.identifier));
        }

        for path in &self.persistent {
            check_relative(&self.identifier, "persistent", path)?;
        }

        match &self.strategy {
            Strategy::FileTree { repo_sub_path } => {
                check_relative(&self.identifier, "repo_sub_path", repo_sub_path)?;
            }
            Strategy::ContainerService {
                compose_files,
                extra_files,
                ..
            } => {
                for path in compose_files.iter().chain(extra_files.iter()) {
                    check_relative(&self.identifier, "compose/extra file", path)?;
                }
            }
        }

        Ok(())
    }
}

fn check_relative(id: &ProjectId, what: &str, path: &Path) -> Result<(), String> {
    if path.is_absolute() {
        return Err(format!(
            "{id}: {what} path '{}' must be relative",
            path.display()
        ));
    }

    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(format!(
            "{id}: {what} path '{}' must not contain '..'",
            path.display()
        ));
    }

    Ok(())
}

fn deserialize_project_id<'de, D>(deserializer: D) -> Result<ProjectId, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ProjectId::new(&s).map_err(serde::de::Error::custom)
}

fn deserialize_service_name<'de, D>(deserializer: D) -> Result<ServiceName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ServiceName::new(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_tree_project() -> ProjectConfig {
        ProjectConfig {
            identifier: ProjectId::new("octocat/widgets").unwrap(),
            short_name: None,
            branch: "main".to_string(),
            live_path: PathBuf::from("/srv/widgets"),
            repo_url: None,
            persistent: vec![PathBuf::from("config/secrets.env")],
            strategy: Strategy::FileTree {
                repo_sub_path: PathBuf::from("dist"),
            },
        }
    }

    #[test]
    fn short_name_defaults_to_repo_segment() {
        let project = file_tree_project();
        assert_eq!(project.short_name(), "widgets");
    }

    #[test]
    fn explicit_short_name_wins() {
        let mut project = file_tree_project();
        project.short_name = Some("widgets-frontend".to_string());
        assert_eq!(project.short_name(), "widgets-frontend");
    }

    #[test]
    fn clone_url_defaults_to_github() {
        let project = file_tree_project();
        assert_eq!(project.clone_url(), "https://github.com/octocat/widgets.git");
    }

    #[test]
    fn repo_url_override_is_used_verbatim() {
        let mut project = file_tree_project();
        project.repo_url = Some("https://git.internal/widgets.git".to_string());
        assert_eq!(project.clone_url(), "https://git.internal/widgets.git");
    }

    #[test]
    fn relative_live_path_is_rejected() {
        let mut project = file_tree_project();
        project.live_path = PathBuf::from("srv/widgets");
        assert!(project.validate().unwrap_err().contains("absolute"));
    }

    #[test]
    fn absolute_persistent_path_is_rejected() {
        let mut project = file_tree_project();
        project.persistent = vec![PathBuf::from("/etc/passwd")];
        assert!(project.validate().unwrap_err().contains("relative"));
    }

    #[test]
    fn parent_traversal_is_rejected() {
        let mut project = file_tree_project();
        project.persistent = vec![PathBuf::from("../outside")];
        assert!(project.validate().unwrap_err().contains(".."));
    }
}
