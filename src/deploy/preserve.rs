// ABOUTME: Snapshot and restore of persistent paths across a redeploy.
// ABOUTME: The same relative path is used under the live dir and the snapshot root.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::fsutil::copy_tree;

/// Copy each persistent path out of `live` into `snapshot_dir`.
///
/// Paths are processed in configuration order; the first copy error aborts
/// the remaining batch. A path absent from `live` is skipped — absence is
/// carried over as absence. A `live` directory that does not exist at all
/// (first-ever deploy) makes the whole snapshot a no-op.
pub async fn snapshot(live: &Path, paths: &[PathBuf], snapshot_dir: &Path) -> io::Result<()> {
    if !fs::try_exists(live).await? {
        tracing::debug!(live = %live.display(), "live dir absent, nothing to snapshot");
        return Ok(());
    }

    transfer(live, paths, snapshot_dir).await
}

/// Copy each persistent path from `snapshot_dir` back into `target`,
/// creating intermediate directories first. Entries that were absent at
/// snapshot time stay absent.
pub async fn restore(snapshot_dir: &Path, paths: &[PathBuf], target: &Path) -> io::Result<()> {
    transfer(snapshot_dir, paths, target).await
}

async fn transfer(src_root: &Path, paths: &[PathBuf], dst_root: &Path) -> io::Result<()> {
    for path in paths {
        let src = src_root.join(path);
        if !fs::try_exists(&src).await? {
            tracing::debug!(path = %path.display(), "persistent path absent, skipping");
            continue;
        }

        let dst = dst_root.join(path);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent).await?;
        }
        copy_tree(&src, &dst).await?;
    }

    Ok(())
}
