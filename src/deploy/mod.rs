// ABOUTME: The redeploy pipeline using the type state pattern.
// ABOUTME: Exports the orchestrator, state markers, preserver, and strategy executor.

mod error;
mod fsutil;
mod preserve;
mod redeploy;
mod state;
mod strategy;

pub use error::{DeployError, StrategyError};
pub use fsutil::{clear_dir, copy_tree};
pub use preserve::{restore, snapshot};
pub use redeploy::{Redeploy, Step, TransitionResult, redeploy};
pub use state::{Activated, Cloned, Initialized, Restored, Snapshotted, Wiped};
pub use strategy::{activate, cycle_service};
