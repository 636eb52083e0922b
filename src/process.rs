// ABOUTME: External command execution boundary.
// ABOUTME: Structured argv invocations via tokio::process, with a per-command timeout.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// A program plus its argument list.
///
/// Commands are always spawned directly from an argv, never assembled into a
/// shell string, so no input ever reaches a shell interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured output of a successfully exited command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Errors from running an external command.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {code:?}: {stderr}")]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{program} did not finish within {limit:?}")]
    TimedOut { program: String, limit: Duration },
}

impl ProcessError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProcessError::TimedOut { .. })
    }
}

/// Command execution capability.
///
/// The deployment pipeline only ever talks to external tooling (git,
/// docker-compose) through this trait, so tests can substitute a scripted
/// runner.
#[async_trait]
pub trait ProcessOps: Send + Sync {
    /// Run a command to completion in `working_dir`, capturing output.
    ///
    /// Returns `ProcessError::Failed` on non-zero exit, with stderr attached.
    async fn run(
        &self,
        invocation: &Invocation,
        working_dir: &Path,
    ) -> Result<CommandOutput, ProcessError>;
}

/// Production runner backed by `tokio::process`.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ProcessOps for ProcessRunner {
    async fn run(
        &self,
        invocation: &Invocation,
        working_dir: &Path,
    ) -> Result<CommandOutput, ProcessError> {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(command = %invocation, dir = %working_dir.display(), "running command");

        let wait = command.output();
        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, wait).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(ProcessError::TimedOut {
                        program: invocation.program.clone(),
                        limit,
                    });
                }
            },
            None => wait.await,
        };

        let output = output.map_err(|source| ProcessError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(ProcessError::Failed {
                program: invocation.program.clone(),
                code: output.status.code(),
                stderr,
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}
