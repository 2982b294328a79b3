//! Snapshot commands

use colored::Colorize;

use ccm_core::SyncOrchestrator;

use crate::error::{CliError, Result};

/// Run the backup command
pub fn run_backup(
    engine: &SyncOrchestrator,
    project: &str,
    clis: &[String],
    notes: Option<&str>,
) -> Result<()> {
    println!("{} Backing up {}", "=>".blue().bold(), project.cyan());
    let timestamp = engine.create_snapshot(project, clis, notes)?;
    println!("{} Snapshot {} created.", "OK".green().bold(), timestamp.cyan());
    Ok(())
}

/// Run the snapshots command
pub fn run_snapshots(engine: &SyncOrchestrator, project: &str, json: bool) -> Result<()> {
    let snapshots = engine.list_snapshots(project)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshots)?);
        return Ok(());
    }

    if snapshots.is_empty() {
        println!("No snapshots for {}.", project.cyan());
        return Ok(());
    }
    for meta in &snapshots {
        println!(
            "{} {:<8} {:<18} {}",
            meta.timestamp.cyan().bold(),
            meta.snapshot_type.to_string(),
            meta.source.to_string(),
            meta.included_clis.join(", ")
        );
        if !meta.notes.is_empty() {
            println!("    {}", meta.notes.dimmed());
        }
    }
    Ok(())
}

/// Run the restore command
///
/// Every CLI is attempted; the command fails if any of them did.
pub fn run_restore(
    engine: &SyncOrchestrator,
    project: &str,
    timestamp: &str,
    cli: Option<&str>,
) -> Result<()> {
    println!(
        "{} Restoring {} from {}",
        "=>".blue().bold(),
        project.cyan(),
        timestamp.cyan()
    );

    let report = engine.restore_from_snapshot(project, timestamp, cli)?;
    for name in &report.restored {
        println!("{} {} restored.", "OK".green().bold(), name.cyan());
    }
    for failure in &report.failures {
        eprintln!("{} {}: {}", "failed:".red().bold(), failure.cli, failure.error);
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "{} of {} CLI(s) failed to restore",
            report.failures.len(),
            report.failures.len() + report.restored.len()
        )))
    }
}

/// Run the delete-snapshot command
pub fn run_delete_snapshot(engine: &SyncOrchestrator, project: &str, timestamp: &str) -> Result<()> {
    engine.delete_snapshot(project, timestamp)?;
    println!("{} Snapshot {} deleted.", "OK".green().bold(), timestamp.cyan());
    Ok(())
}
