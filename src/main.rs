// ABOUTME: Entry point for the slipway CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use slipway::config::{self, Config, ProjectConfig, ProjectRegistry, Strategy};
use slipway::deploy::{self, DeployError};
use slipway::error::{Error, Result};
use slipway::process::ProcessRunner;
use slipway::types::ProjectId;
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { force } => {
            let cwd = env::current_dir()?;
            config::init_config(&cwd, force)
        }
        Commands::Run { identifier } => {
            let registry = load_config(cli.config.as_deref())?.into_registry()?;
            let project = find_project(&registry, identifier)?;

            let runner = ProcessRunner::new(registry.step_timeout());
            deploy::redeploy(project, &runner).await?;

            println!("Redeployed {}", project.identifier);
            Ok(())
        }
        Commands::Cycle { identifier } => {
            let registry = load_config(cli.config.as_deref())?.into_registry()?;
            let project = find_project(&registry, identifier)?;

            let Strategy::ContainerService {
                compose_files,
                service,
                ..
            } = &project.strategy
            else {
                return Err(Error::NotContainerService(project.identifier.to_string()));
            };

            let runner = ProcessRunner::new(registry.step_timeout());
            deploy::cycle_service(&runner, &project.live_path, compose_files, service)
                .await
                .map_err(DeployError::from)?;

            println!("Cycled {}", project.identifier);
            Ok(())
        }
        Commands::List => {
            let registry = load_config(cli.config.as_deref())?.into_registry()?;

            let mut projects: Vec<_> = registry.projects().collect();
            projects.sort_by(|a, b| a.identifier.as_str().cmp(b.identifier.as_str()));

            for project in projects {
                println!(
                    "{}  branch={}  live={}",
                    project.identifier,
                    project.branch,
                    project.live_path.display()
                );
            }
            Ok(())
        }
        Commands::Validate => {
            let registry = load_config(cli.config.as_deref())?.into_registry()?;
            println!("Configuration OK ({} project(s))", registry.len());
            Ok(())
        }
    }
}

fn find_project(registry: &ProjectRegistry, identifier: String) -> Result<&ProjectConfig> {
    let id = ProjectId::new(&identifier)
        .map_err(|e| Error::InvalidConfig(format!("invalid project identifier: {e}")))?;
    registry
        .lookup(&id)
        .ok_or(Error::UnknownProject(identifier))
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => {
            let cwd = env::current_dir()?;
            Config::discover(&cwd)
        }
    }
}
