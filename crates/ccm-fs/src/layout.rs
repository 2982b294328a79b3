//! Workspace layout
//!
//! Maps workspace concepts (projects, snapshots, working copies) to their
//! on-disk locations:
//!
//! ```text
//! <root>/
//!   settings.json
//!   Projects/
//!     <project>/
//!       project.json
//!       .lock
//!       <cliKey>/              working copy
//!       backup/
//!         bak<timestamp>/
//!           meta.json
//!           <cliKey>/          copy of the install path
//!           _additionalFiles/
//!             <cliKey>/
//! ```

use std::path::Path;

use crate::constants::{SNAPSHOT_DIR_PREFIX, STAGING_SUFFIX, WorkspacePath};
use crate::{Error, NormalizedPath, Result, sanitize_component};

/// Directory name used under the platform config directory by default.
const DEFAULT_ROOT_NAME: &str = "CLIConfigManager";

/// Resolves every workspace location from a single root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    pub root: NormalizedPath,
}

impl WorkspaceLayout {
    /// Create a layout rooted at `root`. Does not touch the filesystem.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: NormalizedPath::new(root),
        }
    }

    /// Create a layout rooted at `root`, canonicalizing it when it exists.
    pub fn resolve(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        match dunce::canonicalize(root) {
            Ok(canonical) => Self::new(canonical),
            Err(_) => Self::new(root),
        }
    }

    /// The default workspace root under the platform config directory.
    pub fn default_root() -> Result<std::path::PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(DEFAULT_ROOT_NAME))
            .ok_or(Error::NoDefaultRoot)
    }

    pub fn settings_file(&self) -> NormalizedPath {
        self.root.join(WorkspacePath::SettingsFile.as_str())
    }

    pub fn projects_dir(&self) -> NormalizedPath {
        self.root.join(WorkspacePath::ProjectsDir.as_str())
    }

    /// Directory of a project; the name is sanitized for the filesystem.
    pub fn project_dir(&self, project: &str) -> NormalizedPath {
        self.projects_dir().join(&sanitize_component(project))
    }

    pub fn project_meta(&self, project: &str) -> NormalizedPath {
        self.project_dir(project)
            .join(WorkspacePath::ProjectMeta.as_str())
    }

    pub fn lock_file(&self, project: &str) -> NormalizedPath {
        self.project_dir(project).join(WorkspacePath::LockFile.as_str())
    }

    pub fn backup_dir(&self, project: &str) -> NormalizedPath {
        self.project_dir(project).join(WorkspacePath::BackupDir.as_str())
    }

    /// Final (committed) directory of a snapshot.
    pub fn snapshot_dir(&self, project: &str, timestamp: &str) -> NormalizedPath {
        self.backup_dir(project)
            .join(&format!("{SNAPSHOT_DIR_PREFIX}{timestamp}"))
    }

    /// Staging directory a snapshot is written to before it is committed.
    pub fn staging_dir(&self, project: &str, timestamp: &str) -> NormalizedPath {
        self.backup_dir(project)
            .join(&format!("{SNAPSHOT_DIR_PREFIX}{timestamp}{STAGING_SUFFIX}"))
    }

    /// Working copy of one linked CLI.
    pub fn working_copy(&self, project: &str, cli_key: &str) -> NormalizedPath {
        self.project_dir(project).join(cli_key)
    }
}
