//! Validation of user-supplied names

use std::collections::HashSet;
use std::sync::LazyLock;

use ccm_fs::{WorkspacePath, validate_path_identifier};
use regex::Regex;

use crate::{AdditionalPath, Error, Result};

static ALIAS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+$").unwrap_or_else(|e| unreachable!("static alias pattern: {e}"))
});

/// Project names become directory names.
pub fn validate_project_name(name: &str) -> Result<()> {
    validate_path_identifier(name, "Project name").map_err(Error::validation)
}

/// CLI keys become working-copy and snapshot directory names, so they
/// must not collide with anything else stored beside them.
pub fn validate_cli_name(name: &str) -> Result<()> {
    validate_path_identifier(name, "CLI name").map_err(Error::validation)?;
    let reserved = [
        WorkspacePath::BackupDir,
        WorkspacePath::LockFile,
        WorkspacePath::ProjectMeta,
        WorkspacePath::SnapshotMeta,
        WorkspacePath::AdditionalFilesDir,
    ];
    if reserved.iter().any(|r| r.as_str().eq_ignore_ascii_case(name)) {
        return Err(Error::validation(format!("CLI name '{name}' is reserved")));
    }
    Ok(())
}

/// Validate one alias.
pub fn validate_alias(alias: &str) -> Result<()> {
    if alias == WorkspacePath::AdditionalFilesDir.as_str() {
        return Err(Error::validation(format!("Alias '{alias}' is reserved")));
    }
    if !ALIAS_PATTERN.is_match(alias) {
        return Err(Error::validation(format!(
            "Alias '{alias}' must be alphanumeric with _ or -"
        )));
    }
    Ok(())
}

/// Validate the additional paths of one CLI.
///
/// Files are synchronized by basename, so basenames must be distinct and
/// must not shadow the reserved snapshot directory.
pub fn validate_additional_paths(paths: &[AdditionalPath]) -> Result<()> {
    let mut aliases = HashSet::new();
    let mut basenames = HashSet::new();

    for entry in paths {
        validate_alias(&entry.alias)?;
        if !aliases.insert(entry.alias.to_lowercase()) {
            return Err(Error::validation(format!("Duplicate alias '{}'", entry.alias)));
        }

        let basename = entry.basename().ok_or_else(|| {
            Error::validation(format!("Additional path '{}' has no file name", entry.path.display()))
        })?;
        if basename == WorkspacePath::AdditionalFilesDir.as_str() {
            return Err(Error::validation(format!("File name '{basename}' is reserved")));
        }
        if !basenames.insert(basename.clone()) {
            return Err(Error::validation(format!(
                "Two additional paths share the file name '{basename}'"
            )));
        }
    }
    Ok(())
}
