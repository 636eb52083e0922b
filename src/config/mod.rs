// ABOUTME: Configuration types and parsing for slipway.yml.
// ABOUTME: Handles YAML parsing, discovery, validation, and the project registry.

mod project;

pub use project::{ProjectConfig, Strategy};

use crate::error::{Error, Result};
use crate::types::ProjectId;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "slipway.yml";
pub const CONFIG_FILENAME_ALT: &str = "slipway.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".slipway/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Upper bound for each external command the pipeline runs (clone,
    /// pull, up). `null` disables the limit.
    #[serde(default = "default_step_timeout", with = "humantime_serde")]
    pub step_timeout: Option<Duration>,

    #[serde(default)]
    pub projects: Vec<ProjectConfig>,
}

fn default_step_timeout() -> Option<Duration> {
    Some(Duration::from_secs(600))
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    fn validate(&self) -> Result<()> {
        for project in &self.projects {
            project.validate().map_err(Error::InvalidConfig)?;
        }
        Ok(())
    }

    pub fn into_registry(self) -> Result<ProjectRegistry> {
        let mut projects = HashMap::new();

        for project in self.projects {
            let id = project.identifier.clone();
            if projects.insert(id.clone(), project).is_some() {
                return Err(Error::InvalidConfig(format!(
                    "duplicate project identifier: {id}"
                )));
            }
        }

        Ok(ProjectRegistry {
            step_timeout: self.step_timeout,
            projects,
        })
    }
}

/// Maps project identifiers to their configuration.
///
/// This is what trigger sources (webhook listener, file watcher, the CLI)
/// consult before invoking the pipeline.
#[derive(Debug)]
pub struct ProjectRegistry {
    step_timeout: Option<Duration>,
    projects: HashMap<ProjectId, ProjectConfig>,
}

impl ProjectRegistry {
    pub fn lookup(&self, identifier: &ProjectId) -> Option<&ProjectConfig> {
        self.projects.get(identifier)
    }

    pub fn step_timeout(&self) -> Option<Duration> {
        self.step_timeout
    }

    pub fn projects(&self) -> impl Iterator<Item = &ProjectConfig> {
        self.projects.values()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, TEMPLATE_YAML)?;
    Ok(())
}

const TEMPLATE_YAML: &str = r#"# slipway configuration
#
# step_timeout bounds each external command (git clone, docker-compose
# pull/up). Set to null to disable.
step_timeout: 10m

projects:
  # File-tree project: the checkout's sub path is overlaid onto live_path.
  - identifier: octocat/widgets
    branch: main
    live_path: /srv/widgets
    persistent:
      - config/secrets.env
    strategy:
      type: file-tree
      repo_sub_path: dist

  # Containerized project: compose files are refreshed, images pulled,
  # service cycled.
  - identifier: octocat/api
    branch: main
    live_path: /srv/api
    persistent:
      - data
    strategy:
      type: container-service
      compose_files:
        - docker-compose.yml
      service: api
"#;
