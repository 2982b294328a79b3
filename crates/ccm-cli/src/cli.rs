//! CLI argument parsing using clap derive

use std::path::PathBuf;

use ccm_meta::AdditionalPath;
use clap::{Parser, Subcommand};

/// CLI Config Manager - stage, apply and back up AI CLI configuration
#[derive(Parser, Debug)]
#[command(name = "ccm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Workspace root (defaults to the platform config directory)
    #[arg(long, global = true, env = "CCM_HOME")]
    pub root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create the workspace (settings.json and Projects/) if missing
    Init,

    /// Manage registered CLIs
    Cli {
        #[command(subcommand)]
        action: CliAction,
    },

    /// Show or edit ignore rules
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },

    /// Manage projects
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Copy a CLI's install path into the project's working copy
    ///
    /// Replaces the working copy with the files the ignore rules admit.
    /// Stops if any file exceeds 100 MiB unless the check is skipped.
    Import {
        project: String,
        cli: String,

        /// Import even if large files are present
        #[arg(long)]
        skip_large_file_check: bool,
    },

    /// Copy the working copy onto the install path
    ///
    /// The install path is backed up first and restored automatically if
    /// the copy fails.
    ///
    /// Examples:
    ///   ccm apply demo claude                      # everything
    ///   ccm apply demo claude --path skills/review # one directory
    Apply {
        project: String,
        cli: String,

        /// Apply only this working-copy relative path (repeatable)
        #[arg(long = "path")]
        paths: Vec<String>,
    },

    /// Restore install paths from a snapshot
    Restore {
        project: String,
        timestamp: String,

        /// Restore only this CLI (required for partial snapshots)
        #[arg(long)]
        cli: Option<String>,
    },

    /// Take a manual snapshot
    Backup {
        project: String,

        /// CLI to include (repeatable; default all linked CLIs)
        #[arg(long = "cli")]
        clis: Vec<String>,

        /// Free-form note stored with the snapshot
        #[arg(long)]
        notes: Option<String>,
    },

    /// List a project's snapshots, newest first
    Snapshots {
        project: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Delete a snapshot
    DeleteSnapshot { project: String, timestamp: String },

    /// List a directory one level deep
    Ls {
        dir: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

/// Registry actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    /// Register a CLI and its install directory
    Add {
        name: String,
        install_path: PathBuf,

        /// Additional single file to track, as alias=path (repeatable)
        #[arg(long = "extra", value_parser = parse_extra)]
        extras: Vec<AdditionalPath>,
    },

    /// Unregister a CLI
    Remove { name: String },

    /// List registered CLIs
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

/// Ignore rule actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RulesAction {
    /// Print global and per-CLI rules
    Show {
        /// Print only the rules in effect for this CLI, in order
        #[arg(long)]
        cli: Option<String>,
    },

    /// Replace the global rules
    SetGlobal {
        #[arg(allow_hyphen_values = true)]
        rules: Vec<String>,
    },

    /// Replace the rules of one CLI
    SetCli {
        cli: String,
        #[arg(allow_hyphen_values = true)]
        rules: Vec<String>,
    },
}

/// Project actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ProjectAction {
    /// Create a project linking registered CLIs
    Create {
        name: String,

        /// CLI to link (repeatable)
        #[arg(long = "cli")]
        clis: Vec<String>,
    },

    /// List projects
    List,

    /// Delete a project with its working copies and snapshots
    Delete { name: String },

    /// Link a registered CLI to a project
    Link { project: String, cli: String },

    /// Unlink a CLI, deleting its working copy but keeping snapshots
    Unlink { project: String, cli: String },
}

fn parse_extra(value: &str) -> Result<AdditionalPath, String> {
    let (alias, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected alias=path, got '{value}'"))?;
    if alias.is_empty() || path.is_empty() {
        return Err(format!("expected alias=path, got '{value}'"));
    }
    Ok(AdditionalPath::new(alias, path))
}
