//! Workspace resolution
//!
//! Turns the `--root` flag (or `CCM_HOME`) into a ready orchestrator.

use std::path::PathBuf;

use ccm_core::{EngineConfig, SyncOrchestrator};
use ccm_fs::WorkspaceLayout;

use crate::error::Result;

/// Open the workspace at `root`, or the default location, creating the
/// settings file and `Projects/` on first use.
pub fn open(root: Option<PathBuf>) -> Result<SyncOrchestrator> {
    let root = match root {
        Some(root) => root,
        None => WorkspaceLayout::default_root()?,
    };
    let layout = WorkspaceLayout::resolve(&root);
    tracing::debug!(root = %layout.root, "Opening workspace");

    let engine = SyncOrchestrator::new(layout, EngineConfig::default());
    engine.settings().initialize(engine.layout())?;
    Ok(engine)
}
