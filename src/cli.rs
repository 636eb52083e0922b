// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "slipway")]
#[command(about = "Webhook-driven redeployment agent for self-hosted projects")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file (defaults to discovery in the
    /// current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new slipway.yml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Redeploy one configured project now
    Run {
        /// Project identifier (owner/repo)
        identifier: String,
    },

    /// Pull images and cycle a container-service project in place,
    /// without redeploying
    Cycle {
        /// Project identifier (owner/repo)
        identifier: String,
    },

    /// List configured projects
    List,

    /// Parse and validate the configuration
    Validate,
}
