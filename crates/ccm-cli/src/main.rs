//! CLI Config Manager
//!
//! Stages AI CLI configuration directories in project working copies,
//! applies them back, and keeps rolling snapshots of the install paths.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use ccm_core::SyncOrchestrator;

use cli::{CliAction, Commands, ProjectAction, RulesAction};
use error::Result;

fn main() {
    if let Err(e) = run() {
        if e.is_critical() {
            eprintln!("{}: {}", "CRITICAL".red().bold(), e);
            eprintln!(
                "The install path could not be restored. Recover it manually from the project's backup directory."
            );
        } else {
            eprintln!("{}: {}", "error".red().bold(), e);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{} failed to initialize logging: {}", "warning:".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(cmd) => execute_command(cli.root, cmd),
        None => {
            // No command provided - show help hint
            println!("{} CLI Config Manager", "ccm".green().bold());
            println!();
            println!("Run {} for available commands.", "ccm --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(root: Option<std::path::PathBuf>, cmd: Commands) -> Result<()> {
    match cmd {
        // Listing a directory needs no workspace.
        Commands::Ls { dir, json } => commands::run_ls(&dir, json),
        cmd => {
            let engine = context::open(root)?;
            dispatch(&engine, cmd)
        }
    }
}

fn dispatch(engine: &SyncOrchestrator, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init => commands::run_init(engine),
        Commands::Cli { action } => match action {
            CliAction::Add {
                name,
                install_path,
                extras,
            } => commands::run_cli_add(engine, &name, install_path, extras),
            CliAction::Remove { name } => commands::run_cli_remove(engine, &name),
            CliAction::List { json } => commands::run_cli_list(engine, json),
        },
        Commands::Rules { action } => match action {
            RulesAction::Show { cli } => commands::run_rules_show(engine, cli.as_deref()),
            RulesAction::SetGlobal { rules } => commands::run_rules_set_global(engine, rules),
            RulesAction::SetCli { cli, rules } => commands::run_rules_set_cli(engine, &cli, rules),
        },
        Commands::Project { action } => match action {
            ProjectAction::Create { name, clis } => commands::run_project_create(engine, &name, &clis),
            ProjectAction::List => commands::run_project_list(engine),
            ProjectAction::Delete { name } => commands::run_project_delete(engine, &name),
            ProjectAction::Link { project, cli } => commands::run_project_link(engine, &project, &cli),
            ProjectAction::Unlink { project, cli } => {
                commands::run_project_unlink(engine, &project, &cli)
            }
        },
        Commands::Import {
            project,
            cli,
            skip_large_file_check,
        } => commands::run_import(engine, &project, &cli, skip_large_file_check),
        Commands::Apply {
            project,
            cli,
            paths,
        } => commands::run_apply(engine, &project, &cli, &paths),
        Commands::Restore {
            project,
            timestamp,
            cli,
        } => commands::run_restore(engine, &project, &timestamp, cli.as_deref()),
        Commands::Backup {
            project,
            clis,
            notes,
        } => commands::run_backup(engine, &project, &clis, notes.as_deref()),
        Commands::Snapshots { project, json } => commands::run_snapshots(engine, &project, json),
        Commands::DeleteSnapshot { project, timestamp } => {
            commands::run_delete_snapshot(engine, &project, &timestamp)
        }
        Commands::Ls { dir, json } => commands::run_ls(&dir, json),
    }
}
