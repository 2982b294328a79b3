//! Workspace initialization

use colored::Colorize;

use ccm_core::SyncOrchestrator;

use crate::error::Result;

/// Run the init command
///
/// Opening the workspace already creates whatever is missing; this only
/// reports where it lives.
pub fn run_init(engine: &SyncOrchestrator) -> Result<()> {
    let layout = engine.layout();
    println!(
        "{} Workspace ready at {}",
        "OK".green().bold(),
        layout.root.as_str().cyan()
    );
    println!("   settings: {}", layout.settings_file());
    println!("   projects: {}", layout.projects_dir());
    Ok(())
}
