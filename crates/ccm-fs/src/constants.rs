//! Names of the fixed entries in the workspace directory tree.

use std::path::Path;

/// Reserved file and directory names used by the workspace layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspacePath {
    /// `settings.json` at the workspace root
    SettingsFile,
    /// `Projects` directory holding one directory per project
    ProjectsDir,
    /// `project.json` inside a project directory
    ProjectMeta,
    /// `backup` directory holding a project's snapshots
    BackupDir,
    /// `meta.json` inside a snapshot directory
    SnapshotMeta,
    /// `_additionalFiles` inside a snapshot's CLI directory
    AdditionalFilesDir,
    /// `.lock` file guarding a project against concurrent operations
    LockFile,
}

impl WorkspacePath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SettingsFile => "settings.json",
            Self::ProjectsDir => "Projects",
            Self::ProjectMeta => "project.json",
            Self::BackupDir => "backup",
            Self::SnapshotMeta => "meta.json",
            Self::AdditionalFilesDir => "_additionalFiles",
            Self::LockFile => ".lock",
        }
    }
}

/// Prefix of every committed snapshot directory name.
pub const SNAPSHOT_DIR_PREFIX: &str = "bak";

/// Suffix of a snapshot directory that is still being written.
pub const STAGING_SUFFIX: &str = ".tmp";

impl AsRef<Path> for WorkspacePath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for WorkspacePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for WorkspacePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
