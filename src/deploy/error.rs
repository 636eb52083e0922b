// ABOUTME: Error types for the redeploy pipeline.
// ABOUTME: One variant per pipeline step, plus the strategy-level breakdown.

use crate::process::ProcessError;

/// Errors from the activation step.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    /// Copying files from the checkout into the live directory failed.
    #[error("failed to overlay files onto live dir: {0}")]
    FileOverlayFailed(#[source] std::io::Error),

    /// Fetching updated container images failed.
    #[error("failed to pull images: {0}")]
    ImagesPullFailed(#[source] ProcessError),

    /// Bringing the service up failed.
    #[error("failed to bring service up: {0}")]
    ServiceUpFailed(#[source] ProcessError),
}

/// Errors that terminate a redeploy attempt.
///
/// Each variant names the step that failed. None of these are retried; the
/// trigger source decides whether another attempt happens.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Allocating the staging directories failed.
    #[error("failed to create staging dirs: {0}")]
    StagingFailed(#[source] std::io::Error),

    /// The git clone failed.
    #[error("failed to clone repository: {0}")]
    CloneFailed(#[source] ProcessError),

    /// Copying persistent paths out of the live dir failed.
    #[error("failed to snapshot persistent paths: {0}")]
    SnapshotFailed(#[source] std::io::Error),

    /// Clearing the live dir failed.
    #[error("failed to wipe live dir: {0}")]
    WipeFailed(#[source] std::io::Error),

    /// Copying persistent paths back into the live dir failed. The live dir
    /// is left wiped and partially restored; see the pipeline docs.
    #[error("failed to restore persistent paths: {0}")]
    RestoreFailed(#[source] std::io::Error),

    /// The activation strategy failed after restore.
    #[error("activation failed: {0}")]
    Strategy(#[from] StrategyError),

    /// An external command exceeded the configured step timeout.
    #[error("step '{step}' timed out")]
    TimedOut { step: &'static str },
}

impl DeployError {
    /// Classify a process failure during clone: timeouts get their own
    /// variant, everything else is a clone failure.
    pub(crate) fn from_clone(err: ProcessError) -> Self {
        if err.is_timeout() {
            DeployError::TimedOut { step: "clone" }
        } else {
            DeployError::CloneFailed(err)
        }
    }

    /// Classify a strategy failure, surfacing command timeouts as `TimedOut`.
    pub(crate) fn from_strategy(err: StrategyError) -> Self {
        match err {
            StrategyError::ImagesPullFailed(e) if e.is_timeout() => {
                DeployError::TimedOut { step: "pull" }
            }
            StrategyError::ServiceUpFailed(e) if e.is_timeout() => {
                DeployError::TimedOut { step: "up" }
            }
            other => DeployError::Strategy(other),
        }
    }
}
