//! Results of sync operations

use crate::{Error, LargeFile};

/// Result of an import that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The working copy was replaced.
    Imported { warnings: Vec<String> },
    /// Nothing was touched; the caller may retry with the check skipped.
    LargeFilesFound { files: Vec<LargeFile> },
}

impl ImportOutcome {
    pub fn is_imported(&self) -> bool {
        matches!(self, Self::Imported { .. })
    }
}

/// Result of a successful apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    /// Timestamp of the backup taken before the install path was touched
    pub snapshot: String,
    pub warnings: Vec<String>,
}

/// One CLI that could not be restored.
#[derive(Debug)]
pub struct RestoreFailure {
    pub cli: String,
    pub error: Error,
}

/// Per-CLI outcome of a restore. CLIs are restored independently.
#[derive(Debug, Default)]
pub struct RestoreReport {
    pub restored: Vec<String>,
    pub failures: Vec<RestoreFailure>,
}

impl RestoreReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
