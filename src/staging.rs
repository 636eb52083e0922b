// ABOUTME: Ephemeral working directories for one redeploy attempt.
// ABOUTME: A StagingSession pairs a clone dir and a snapshot dir, removed on every exit path.

use std::io;
use std::path::Path;
use tempfile::TempDir;

/// The pair of temporary directories owned by a single redeploy.
///
/// `clone_dir` receives the fresh git checkout, `snapshot_dir` the copies of
/// persistent paths. Both are created with unpredictable names so concurrent
/// redeploys of different projects cannot collide. Dropping the session
/// removes both directories; `destroy` does the same eagerly and logs any
/// cleanup failure instead of raising it, so a cleanup problem never masks
/// the pipeline error that led here.
#[derive(Debug)]
pub struct StagingSession {
    clone: TempDir,
    snapshot: TempDir,
}

impl StagingSession {
    pub fn create() -> io::Result<Self> {
        let clone = tempfile::Builder::new().prefix("slipway-clone-").tempdir()?;
        let snapshot = tempfile::Builder::new()
            .prefix("slipway-snapshot-")
            .tempdir()?;
        tracing::debug!(
            clone_dir = %clone.path().display(),
            snapshot_dir = %snapshot.path().display(),
            "created staging session"
        );
        Ok(Self { clone, snapshot })
    }

    pub fn clone_dir(&self) -> &Path {
        self.clone.path()
    }

    pub fn snapshot_dir(&self) -> &Path {
        self.snapshot.path()
    }

    /// Remove both directories now. Best effort: failures are logged, never
    /// returned, and a directory that is already gone is not an error.
    pub fn destroy(self) {
        for dir in [self.clone, self.snapshot] {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                tracing::warn!(dir = %path.display(), error = %e, "failed to remove staging dir");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_two_distinct_empty_dirs() {
        let session = StagingSession::create().unwrap();
        assert!(session.clone_dir().is_dir());
        assert!(session.snapshot_dir().is_dir());
        assert_ne!(session.clone_dir(), session.snapshot_dir());
        assert_eq!(
            std::fs::read_dir(session.clone_dir()).unwrap().count(),
            0,
            "clone dir starts empty"
        );
    }

    #[test]
    fn destroy_removes_both_dirs() {
        let session = StagingSession::create().unwrap();
        let clone = session.clone_dir().to_path_buf();
        let snapshot = session.snapshot_dir().to_path_buf();

        std::fs::write(clone.join("file"), b"x").unwrap();
        session.destroy();

        assert!(!clone.exists());
        assert!(!snapshot.exists());
    }

    #[test]
    fn destroy_tolerates_already_removed_dir() {
        let session = StagingSession::create().unwrap();
        std::fs::remove_dir_all(session.clone_dir()).unwrap();
        session.destroy();
    }

    #[test]
    fn drop_is_the_cleanup_backstop() {
        let clone;
        {
            let session = StagingSession::create().unwrap();
            clone = session.clone_dir().to_path_buf();
        }
        assert!(!clone.exists());
    }

    #[test]
    fn sessions_never_share_dirs() {
        let a = StagingSession::create().unwrap();
        let b = StagingSession::create().unwrap();
        assert_ne!(a.clone_dir(), b.clone_dir());
        assert_ne!(a.snapshot_dir(), b.snapshot_dir());
    }
}
