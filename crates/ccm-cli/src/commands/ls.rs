//! Directory listing command

use std::path::Path;

use colored::Colorize;

use ccm_core::list_dir;

use crate::error::Result;

/// Run the ls command
pub fn run_ls(dir: &Path, json: bool) -> Result<()> {
    let entries = list_dir(dir);

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        if entry.is_directory {
            println!("{}/", entry.name.blue().bold());
        } else if entry.is_symlink {
            println!("{} {}", entry.name.cyan(), "(symlink)".dimmed());
        } else {
            let size = entry.size_bytes.map(|s| s.to_string()).unwrap_or_default();
            println!("{} {}", entry.name, size.dimmed());
        }
    }
    Ok(())
}
