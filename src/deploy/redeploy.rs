// ABOUTME: The redeploy pipeline: typestate transitions and the step driver.
// ABOUTME: Each transition consumes self; failures hand the job back so staging is destroyed.

use std::fmt;
use std::marker::PhantomData;
use std::path::PathBuf;

use crate::config::ProjectConfig;
use crate::process::{Invocation, ProcessOps};
use crate::staging::StagingSession;

use super::error::DeployError;
use super::state::{Activated, Cloned, Initialized, Restored, Snapshotted, Wiped};
use super::{fsutil, preserve, strategy};

/// Result type for transitions: on failure the job comes back with the
/// error so the caller can destroy the staging session.
pub type TransitionResult<T, S> = Result<Redeploy<T>, (Redeploy<S>, DeployError)>;

/// Pipeline step names for structured log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Stage,
    Clone,
    Snapshot,
    Wipe,
    Restore,
    Activate,
    Cleanup,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Stage => "stage",
            Step::Clone => "clone",
            Step::Snapshot => "snapshot",
            Step::Wipe => "wipe",
            Step::Restore => "restore",
            Step::Activate => "activate",
            Step::Cleanup => "cleanup",
        };
        write!(f, "{name}")
    }
}

/// One redeploy attempt, parameterized by its pipeline state.
///
/// The marker type makes the step order part of the API: a job that has not
/// snapshotted cannot wipe, a job that has not restored cannot activate.
#[derive(Debug)]
pub struct Redeploy<S> {
    project: ProjectConfig,
    session: StagingSession,
    _state: PhantomData<S>,
}

impl Redeploy<Initialized> {
    /// Allocate a staging session and start a redeploy for `project`.
    pub fn begin(project: ProjectConfig) -> Result<Self, DeployError> {
        let session = StagingSession::create().map_err(DeployError::StagingFailed)?;
        Ok(Redeploy {
            project,
            session,
            _state: PhantomData,
        })
    }

    /// Clone the configured branch into the staging clone dir.
    pub async fn clone_source<R>(self, runner: &R) -> TransitionResult<Cloned, Initialized>
    where
        R: ProcessOps + ?Sized,
    {
        let invocation = git_clone(&self.project);
        tracing::info!(
            project = %self.project.identifier,
            step = %Step::Clone,
            url = %self.project.clone_url(),
            branch = %self.project.branch,
            "cloning repository"
        );

        match runner.run(&invocation, self.session.clone_dir()).await {
            Ok(_) => Ok(self.transition()),
            Err(e) => {
                let err = DeployError::from_clone(e);
                Err((self, err))
            }
        }
    }
}

impl<S> Redeploy<S> {
    fn transition<T>(self) -> Redeploy<T> {
        Redeploy {
            project: self.project,
            session: self.session,
            _state: PhantomData,
        }
    }

    /// The checkout produced by the clone.
    fn checkout_dir(&self) -> PathBuf {
        self.session.clone_dir().join(self.project.short_name())
    }

    /// Destroy staging and hand the step error back, logging both. A
    /// cleanup problem is logged inside `destroy` and never masks `err`.
    fn abort(self, step: Step, err: DeployError) -> DeployError {
        tracing::error!(
            project = %self.project.identifier,
            step = %step,
            error = %err,
            "redeploy failed"
        );
        self.session.destroy();
        err
    }
}

impl Redeploy<Cloned> {
    /// Copy persistent paths out of the live dir into the snapshot dir.
    pub async fn snapshot_persistent(self) -> TransitionResult<Snapshotted, Cloned> {
        tracing::info!(
            project = %self.project.identifier,
            step = %Step::Snapshot,
            paths = self.project.persistent.len(),
            "snapshotting persistent paths"
        );

        match preserve::snapshot(
            &self.project.live_path,
            &self.project.persistent,
            self.session.snapshot_dir(),
        )
        .await
        {
            Ok(()) => Ok(self.transition()),
            Err(e) => Err((self, DeployError::SnapshotFailed(e))),
        }
    }
}

impl Redeploy<Snapshotted> {
    /// Remove everything inside the live dir. Only reachable after the
    /// snapshot fully succeeded.
    pub async fn wipe_live(self) -> TransitionResult<Wiped, Snapshotted> {
        tracing::info!(
            project = %self.project.identifier,
            step = %Step::Wipe,
            live = %self.project.live_path.display(),
            "clearing live dir"
        );

        match fsutil::clear_dir(&self.project.live_path).await {
            Ok(()) => Ok(self.transition()),
            Err(e) => Err((self, DeployError::WipeFailed(e))),
        }
    }
}

impl Redeploy<Wiped> {
    /// Copy persistent paths from the snapshot back into the live dir.
    pub async fn restore_persistent(self) -> TransitionResult<Restored, Wiped> {
        tracing::info!(
            project = %self.project.identifier,
            step = %Step::Restore,
            "restoring persistent paths"
        );

        match preserve::restore(
            self.session.snapshot_dir(),
            &self.project.persistent,
            &self.project.live_path,
        )
        .await
        {
            Ok(()) => Ok(self.transition()),
            Err(e) => Err((self, DeployError::RestoreFailed(e))),
        }
    }
}

impl Redeploy<Restored> {
    /// Run the configured activation strategy against the checkout.
    pub async fn activate<R>(self, runner: &R) -> TransitionResult<Activated, Restored>
    where
        R: ProcessOps + ?Sized,
    {
        tracing::info!(
            project = %self.project.identifier,
            step = %Step::Activate,
            "activating new version"
        );

        let checkout = self.checkout_dir();
        match strategy::activate(runner, &checkout, &self.project).await {
            Ok(()) => Ok(self.transition()),
            Err(e) => {
                let err = DeployError::from_strategy(e);
                Err((self, err))
            }
        }
    }
}

impl Redeploy<Activated> {
    /// Destroy the staging session; the redeploy is complete.
    pub fn finish(self) {
        tracing::info!(
            project = %self.project.identifier,
            step = %Step::Cleanup,
            "removing staging dirs"
        );
        self.session.destroy();
    }
}

/// Run one complete redeploy for `project`.
///
/// Steps execute strictly in sequence; the first failure destroys the
/// staging session and is returned as the attempt's single error. The
/// function is stateless between calls and safe to invoke concurrently for
/// different projects; callers must not run two redeploys of the same
/// project at once.
pub async fn redeploy<R>(project: &ProjectConfig, runner: &R) -> Result<(), DeployError>
where
    R: ProcessOps + ?Sized,
{
    let job = match Redeploy::begin(project.clone()) {
        Ok(job) => job,
        Err(err) => {
            tracing::error!(
                project = %project.identifier,
                step = %Step::Stage,
                error = %err,
                "redeploy failed"
            );
            return Err(err);
        }
    };

    let job = match job.clone_source(runner).await {
        Ok(job) => job,
        Err((job, err)) => return Err(job.abort(Step::Clone, err)),
    };

    let job = match job.snapshot_persistent().await {
        Ok(job) => job,
        Err((job, err)) => return Err(job.abort(Step::Snapshot, err)),
    };

    let job = match job.wipe_live().await {
        Ok(job) => job,
        Err((job, err)) => return Err(job.abort(Step::Wipe, err)),
    };

    let job = match job.restore_persistent().await {
        Ok(job) => job,
        Err((job, err)) => return Err(job.abort(Step::Restore, err)),
    };

    let job = match job.activate(runner).await {
        Ok(job) => job,
        Err((job, err)) => return Err(job.abort(Step::Activate, err)),
    };

    job.finish();
    tracing::info!(project = %project.identifier, "redeploy complete");
    Ok(())
}

fn git_clone(project: &ProjectConfig) -> Invocation {
    Invocation::new("git")
        .arg("clone")
        .arg("-b")
        .arg(project.branch.as_str())
        .arg("--single-branch")
        .arg(project.clone_url())
}
