//! Project management commands

use colored::Colorize;

use ccm_core::SyncOrchestrator;

use crate::error::Result;

/// Run the project create command
pub fn run_project_create(engine: &SyncOrchestrator, name: &str, clis: &[String]) -> Result<()> {
    println!("{} Creating project: {}", "=>".blue().bold(), name.cyan());
    let settings = engine.settings().read();
    let meta = engine.projects().create(name, clis, &settings)?;
    println!(
        "{} Project {} created with {} linked CLI(s).",
        "OK".green().bold(),
        meta.project_name.cyan(),
        meta.linked_clis.len()
    );
    Ok(())
}

/// Run the project list command
pub fn run_project_list(engine: &SyncOrchestrator) -> Result<()> {
    let names = engine.projects().list()?;
    if names.is_empty() {
        println!("No projects.");
        return Ok(());
    }
    for name in names {
        let clis = engine
            .projects()
            .get_meta(&name)
            .map(|meta| meta.linked_clis.keys().collect::<Vec<_>>().join(", "))
            .unwrap_or_default();
        println!("{} {}", name.cyan().bold(), clis.dimmed());
    }
    Ok(())
}

/// Run the project delete command
pub fn run_project_delete(engine: &SyncOrchestrator, name: &str) -> Result<()> {
    engine.projects().require(name)?;
    engine.projects().delete(name)?;
    println!("{} Project {} deleted.", "OK".green().bold(), name.cyan());
    Ok(())
}

/// Run the project link command
pub fn run_project_link(engine: &SyncOrchestrator, project: &str, cli: &str) -> Result<()> {
    let settings = engine.settings().read();
    engine.projects().link_cli(project, cli, &settings)?;
    println!("{} Linked {} to {}.", "OK".green().bold(), cli.cyan(), project.cyan());
    Ok(())
}

/// Run the project unlink command
pub fn run_project_unlink(engine: &SyncOrchestrator, project: &str, cli: &str) -> Result<()> {
    if engine.projects().unlink_cli(project, cli)? {
        println!("{} Unlinked {} from {}.", "OK".green().bold(), cli.cyan(), project.cyan());
    } else {
        println!("{} {} was not linked to {}.", "OK".green().bold(), cli.cyan(), project.cyan());
    }
    Ok(())
}
