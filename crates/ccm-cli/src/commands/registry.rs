//! CLI registry commands

use std::path::PathBuf;

use colored::Colorize;

use ccm_core::SyncOrchestrator;
use ccm_meta::AdditionalPath;

use crate::error::Result;

/// Run the cli add command
pub fn run_cli_add(
    engine: &SyncOrchestrator,
    name: &str,
    install_path: PathBuf,
    extras: Vec<AdditionalPath>,
) -> Result<()> {
    println!("{} Registering CLI: {}", "=>".blue().bold(), name.cyan());
    if !install_path.exists() {
        eprintln!(
            "{} install path {} does not exist yet",
            "warning:".yellow().bold(),
            install_path.display()
        );
    }

    engine.settings().add_cli(name, install_path, extras)?;
    println!("{} CLI {} registered.", "OK".green().bold(), name.cyan());
    Ok(())
}

/// Run the cli remove command
pub fn run_cli_remove(engine: &SyncOrchestrator, name: &str) -> Result<()> {
    if engine.settings().remove_cli(name)? {
        println!("{} CLI {} removed.", "OK".green().bold(), name.cyan());
    } else {
        println!("{} CLI {} was not registered.", "OK".green().bold(), name.cyan());
    }
    Ok(())
}

/// Run the cli list command
pub fn run_cli_list(engine: &SyncOrchestrator, json: bool) -> Result<()> {
    let settings = engine.settings().read();

    if json {
        println!("{}", serde_json::to_string_pretty(&settings.cli_registry)?);
        return Ok(());
    }

    if settings.cli_registry.is_empty() {
        println!("No CLIs registered.");
        return Ok(());
    }
    for (name, entry) in settings.cli_registry.iter() {
        println!("{} {}", name.cyan().bold(), entry.install_path.display());
        for extra in &entry.additional_paths {
            println!("    {} {}", extra.alias.dimmed(), extra.path.display());
        }
    }
    Ok(())
}
