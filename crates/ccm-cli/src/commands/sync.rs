//! Import and apply commands

use colored::Colorize;

use ccm_core::{ImportOutcome, SyncOrchestrator};

use super::print_warnings;
use crate::error::{CliError, Result};

/// Run the import command
///
/// Large files abort the import without touching the working copy.
pub fn run_import(
    engine: &SyncOrchestrator,
    project: &str,
    cli: &str,
    skip_large_file_check: bool,
) -> Result<()> {
    println!(
        "{} Importing {} into {}",
        "=>".blue().bold(),
        cli.cyan(),
        project.cyan()
    );

    match engine.import_from_install(project, cli, skip_large_file_check)? {
        ImportOutcome::Imported { warnings } => {
            print_warnings(&warnings);
            println!("{} Working copy updated.", "OK".green().bold());
            Ok(())
        }
        ImportOutcome::LargeFilesFound { files } => {
            for file in &files {
                eprintln!(
                    "  {} {} ({:.1} MiB)",
                    "large:".yellow().bold(),
                    file.path,
                    file.size as f64 / (1024.0 * 1024.0)
                );
            }
            Err(CliError::user(format!(
                "{} file(s) exceed the size limit; rerun with --skip-large-file-check to import anyway",
                files.len()
            )))
        }
    }
}

/// Run the apply command
pub fn run_apply(engine: &SyncOrchestrator, project: &str, cli: &str, paths: &[String]) -> Result<()> {
    println!(
        "{} Applying {} from {}",
        "=>".blue().bold(),
        cli.cyan(),
        project.cyan()
    );

    let selected = if paths.is_empty() { None } else { Some(paths) };
    let report = engine.apply_to_install(project, cli, selected)?;
    print_warnings(&report.warnings);
    println!(
        "{} Applied. Previous state saved as snapshot {}.",
        "OK".green().bold(),
        report.snapshot.cyan()
    );
    Ok(())
}
