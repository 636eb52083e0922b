// ABOUTME: Filesystem helpers for the deployment pipeline.
// ABOUTME: Recursive tree copy and directory clearing, all through tokio::fs.

use futures::FutureExt;
use futures::future::BoxFuture;
use std::io;
use std::path::Path;
use tokio::fs;

/// Copy a file or directory tree from `src` to `dst`, creating intermediate
/// directories as needed. Existing files at the destination are overwritten;
/// nothing at the destination is deleted.
pub fn copy_tree<'a>(src: &'a Path, dst: &'a Path) -> BoxFuture<'a, io::Result<()>> {
    async move {
        let meta = fs::metadata(src).await?;

        if meta.is_dir() {
            fs::create_dir_all(dst).await?;
            let mut entries = fs::read_dir(src).await?;
            while let Some(entry) = entries.next_entry().await? {
                let child_src = entry.path();
                let child_dst = dst.join(entry.file_name());
                copy_tree(&child_src, &child_dst).await?;
            }
        } else {
            if let Some(parent) = dst.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::copy(src, dst).await?;
        }

        Ok(())
    }
    .boxed()
}

/// Remove every entry inside `dir`, keeping the directory itself.
///
/// A missing `dir` is created instead, which covers the first-ever deploy of
/// a project whose live directory does not exist yet.
pub async fn clear_dir(dir: &Path) -> io::Result<()> {
    if !fs::try_exists(dir).await? {
        fs::create_dir_all(dir).await?;
        return Ok(());
    }

    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_dir() {
            fs::remove_dir_all(&path).await?;
        } else {
            fs::remove_file(&path).await?;
        }
    }

    Ok(())
}
