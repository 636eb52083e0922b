// ABOUTME: Pipeline state marker types for the type state pattern.
// ABOUTME: Zero-sized types enforce the step order at compile time.

/// Staging session created, nothing run yet.
/// Available actions: `clone_source()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Repository cloned into the staging area.
/// Available actions: `snapshot_persistent()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Cloned;

/// Persistent paths copied into the snapshot dir.
/// Available actions: `wipe_live()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Snapshotted;

/// Live directory cleared.
/// Available actions: `restore_persistent()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Wiped;

/// Persistent paths restored into the live directory.
/// Available actions: `activate()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Restored;

/// New version online.
/// Available actions: `finish()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Activated;
