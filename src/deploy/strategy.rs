// ABOUTME: Activation strategies: file-tree overlay and container-service cycle.
// ABOUTME: Runs after persistent files are restored; makes the checkout the active deployment.

use nonempty::NonEmpty;
use std::path::{Path, PathBuf};

use crate::config::{ProjectConfig, Strategy};
use crate::process::{Invocation, ProcessOps};
use crate::types::ServiceName;

use super::error::StrategyError;
use super::fsutil::copy_tree;

/// Bring the freshly cloned checkout online.
///
/// The live directory already holds the restored persistent files; both
/// strategies only add or overwrite, never delete. Steps run strictly in
/// order: files are copied first, and for the container strategy images are
/// pulled before the service is brought up. A pull failure aborts before
/// `up` — a partially pulled image set is an accepted residual, retried by
/// the next redeploy.
pub async fn activate<R>(
    runner: &R,
    checkout: &Path,
    project: &ProjectConfig,
) -> Result<(), StrategyError>
where
    R: ProcessOps + ?Sized,
{
    match &project.strategy {
        Strategy::FileTree { repo_sub_path } => {
            let source = checkout.join(repo_sub_path);
            tracing::info!(
                project = %project.identifier,
                source = %source.display(),
                live = %project.live_path.display(),
                "overlaying file tree"
            );
            copy_tree(&source, &project.live_path)
                .await
                .map_err(StrategyError::FileOverlayFailed)?;
        }

        Strategy::ContainerService {
            compose_files,
            service,
            extra_files,
        } => {
            for file in compose_files.iter().chain(extra_files.iter()) {
                let src = checkout.join(file);
                let dst = project.live_path.join(file);
                tracing::info!(
                    project = %project.identifier,
                    file = %file.display(),
                    "refreshing service file"
                );
                copy_tree(&src, &dst)
                    .await
                    .map_err(StrategyError::FileOverlayFailed)?;
            }

            cycle_service(runner, &project.live_path, compose_files, service).await?;
        }
    }

    Ok(())
}

/// Pull newer images and bring the service up again, in place.
///
/// The short path a file watcher takes when compose files at the live path
/// changed without a new build: no re-clone, no file copies. Pull failure
/// aborts before `up`, exactly as in a full activation.
pub async fn cycle_service<R>(
    runner: &R,
    live_path: &Path,
    compose_files: &NonEmpty<PathBuf>,
    service: &ServiceName,
) -> Result<(), StrategyError>
where
    R: ProcessOps + ?Sized,
{
    tracing::info!(live = %live_path.display(), "pulling images");
    runner
        .run(&compose_pull(compose_files), live_path)
        .await
        .map_err(StrategyError::ImagesPullFailed)?;

    tracing::info!(live = %live_path.display(), service = %service, "bringing service up");
    runner
        .run(&compose_up(compose_files, service), live_path)
        .await
        .map_err(StrategyError::ServiceUpFailed)?;

    Ok(())
}

fn compose_base(compose_files: &NonEmpty<PathBuf>) -> Invocation {
    let mut invocation = Invocation::new("docker-compose");
    for file in compose_files.iter() {
        invocation = invocation
            .arg("-f")
            .arg(file.to_string_lossy().into_owned());
    }
    invocation
}

pub(crate) fn compose_pull(compose_files: &NonEmpty<PathBuf>) -> Invocation {
    compose_base(compose_files).arg("pull")
}

pub(crate) fn compose_up(compose_files: &NonEmpty<PathBuf>, service: &ServiceName) -> Invocation {
    compose_base(compose_files)
        .args(["up", "-d"])
        .arg(service.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nonempty::nonempty;

    #[test]
    fn pull_names_every_compose_file() {
        let files = nonempty![
            PathBuf::from("docker-compose.yml"),
            PathBuf::from("docker-compose.prod.yml")
        ];

        let invocation = compose_pull(&files);
        assert_eq!(invocation.program, "docker-compose");
        assert_eq!(
            invocation.args,
            vec![
                "-f",
                "docker-compose.yml",
                "-f",
                "docker-compose.prod.yml",
                "pull"
            ]
        );
    }

    #[test]
    fn up_is_detached_and_targets_the_service() {
        let files = nonempty![PathBuf::from("docker-compose.yml")];
        let service = ServiceName::new("web").unwrap();

        let invocation = compose_up(&files, &service);
        assert_eq!(
            invocation.args,
            vec!["-f", "docker-compose.yml", "up", "-d", "web"]
        );
    }
}
