// ABOUTME: Shared test helpers: a scripted ProcessOps fake and project fixtures.
// ABOUTME: Lets pipeline tests run without git or docker-compose installed.

// Each test binary only uses some of these helpers, so allow dead_code.
#![allow(dead_code)]

use async_trait::async_trait;
use slipway::config::{ProjectConfig, Strategy};
use slipway::process::{CommandOutput, Invocation, ProcessError, ProcessOps};
use slipway::types::{ProjectId, ServiceName};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// One recorded command execution.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl RecordedCall {
    /// Short verb for assertions: "clone", "pull", or "up".
    pub fn verb(&self) -> &'static str {
        verb_of(&self.program, &self.args)
    }
}

fn verb_of(program: &str, args: &[String]) -> &'static str {
    if program == "git" {
        return "clone";
    }
    if args.iter().any(|a| a == "pull") {
        return "pull";
    }
    if args.iter().any(|a| a == "up") {
        return "up";
    }
    "other"
}

enum Outcome {
    Exit(i32),
    Timeout,
}

type CloneAction = Box<dyn Fn(&Path) -> io::Result<()> + Send + Sync>;

/// A `ProcessOps` implementation driven by the test.
///
/// Records every invocation. `on_clone` fabricates the checkout the real
/// `git clone` would have produced; `fail_on`/`time_out_on` script failures
/// for a given verb.
#[derive(Default)]
pub struct ScriptedRunner {
    calls: Mutex<Vec<RecordedCall>>,
    failures: HashMap<&'static str, Outcome>,
    clone_action: Option<CloneAction>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_clone<F>(mut self, action: F) -> Self
    where
        F: Fn(&Path) -> io::Result<()> + Send + Sync + 'static,
    {
        self.clone_action = Some(Box::new(action));
        self
    }

    pub fn fail_on(mut self, verb: &'static str) -> Self {
        self.failures.insert(verb, Outcome::Exit(1));
        self
    }

    pub fn time_out_on(mut self, verb: &'static str) -> Self {
        self.failures.insert(verb, Outcome::Timeout);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn verbs(&self) -> Vec<&'static str> {
        self.calls().iter().map(|c| c.verb()).collect()
    }
}

#[async_trait]
impl ProcessOps for ScriptedRunner {
    async fn run(
        &self,
        invocation: &Invocation,
        working_dir: &Path,
    ) -> Result<CommandOutput, ProcessError> {
        let call = RecordedCall {
            program: invocation.program.clone(),
            args: invocation.args.clone(),
            cwd: working_dir.to_path_buf(),
        };
        let verb = call.verb();
        self.calls.lock().unwrap().push(call);

        match self.failures.get(verb) {
            Some(Outcome::Exit(code)) => {
                return Err(ProcessError::Failed {
                    program: invocation.program.clone(),
                    code: Some(*code),
                    stderr: format!("scripted {verb} failure"),
                });
            }
            Some(Outcome::Timeout) => {
                return Err(ProcessError::TimedOut {
                    program: invocation.program.clone(),
                    limit: Duration::from_secs(1),
                });
            }
            None => {}
        }

        if verb == "clone"
            && let Some(action) = &self.clone_action
        {
            action(working_dir).map_err(|source| ProcessError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;
        }

        Ok(CommandOutput::default())
    }
}

/// Write `(relative path, content)` pairs under `root`, creating parents.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full, content).unwrap();
    }
}

/// Collect every file under `root` as `relative path -> content`.
pub fn read_tree(root: &Path) -> Vec<(String, String)> {
    let mut out = Vec::new();
    collect(root, root, &mut out);
    out.sort();
    out
}

fn collect(root: &Path, dir: &Path, out: &mut Vec<(String, String)>) {
    if !dir.exists() {
        return;
    }
    for entry in std::fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let path = entry.path();
        if path.is_dir() {
            collect(root, &path, out);
        } else {
            let rel = path.strip_prefix(root).unwrap().to_string_lossy().into_owned();
            let content = std::fs::read_to_string(&path).unwrap_or_default();
            out.push((rel, content));
        }
    }
}

pub fn file_tree_project(live: &Path, persistent: &[&str], repo_sub_path: &str) -> ProjectConfig {
    ProjectConfig {
        identifier: ProjectId::new("acme/widgets").unwrap(),
        short_name: None,
        branch: "main".to_string(),
        live_path: live.to_path_buf(),
        repo_url: None,
        persistent: persistent.iter().map(PathBuf::from).collect(),
        strategy: Strategy::FileTree {
            repo_sub_path: PathBuf::from(repo_sub_path),
        },
    }
}

pub fn compose_project(live: &Path, persistent: &[&str]) -> ProjectConfig {
    ProjectConfig {
        identifier: ProjectId::new("acme/api").unwrap(),
        short_name: None,
        branch: "main".to_string(),
        live_path: live.to_path_buf(),
        repo_url: None,
        persistent: persistent.iter().map(PathBuf::from).collect(),
        strategy: Strategy::ContainerService {
            compose_files: nonempty::nonempty![PathBuf::from("docker-compose.yml")],
            service: ServiceName::new("api").unwrap(),
            extra_files: vec![],
        },
    }
}
