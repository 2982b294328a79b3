//! Error types for ccm-core

use std::path::PathBuf;

/// Result type for ccm-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`], used by callers to decide how to
/// present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A project, linked CLI or snapshot does not exist
    NotFound,
    /// Input was rejected before any disk access
    Validation,
    /// Another operation holds the project
    Busy,
    /// An I/O failure aborted the operation
    IoFatal,
    /// Restoring the pre-apply backup failed; the install path may be inconsistent
    RollbackFailure,
}

/// Errors that can occur in ccm-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid ignore rule '{rule}': {message}")]
    InvalidRule { rule: String, message: String },

    #[error("Snapshot {timestamp} not found in project '{project}'")]
    SnapshotNotFound { project: String, timestamp: String },

    #[error("Install path does not exist: {path}")]
    InstallPathMissing { path: PathBuf },

    #[error("Snapshot does not contain CLI '{cli}'")]
    CliNotInSnapshot { cli: String },

    #[error("Partial snapshot {timestamp} cannot restore an entire project; name a CLI")]
    PartialRestore { timestamp: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Project '{project}' is busy with another operation")]
    Busy { project: String },

    #[error("Install path {path} does not match its snapshot after restore")]
    RestoreMismatch { path: PathBuf },

    #[error("Backup failed, install path untouched: {source}")]
    BackupFailed {
        #[source]
        source: Box<Error>,
    },

    #[error("Apply failed and rolled back: {cause}")]
    ApplyRolledBack { cause: Box<Error> },

    #[error("Apply failed ({cause}) and rollback failed: {rollback}")]
    RollbackFailed { cause: Box<Error>, rollback: Box<Error> },

    /// Filesystem error from ccm-fs
    #[error(transparent)]
    Fs(#[from] ccm_fs::Error),

    /// Metadata error from ccm-meta
    #[error(transparent)]
    Meta(#[from] ccm_meta::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SnapshotNotFound { .. } | Self::InstallPathMissing { .. } => ErrorKind::NotFound,
            Self::InvalidRule { .. }
            | Self::PartialRestore { .. }
            | Self::CliNotInSnapshot { .. }
            | Self::Validation { .. } => ErrorKind::Validation,
            Self::Busy { .. } => ErrorKind::Busy,
            Self::BackupFailed { .. }
            | Self::ApplyRolledBack { .. }
            | Self::RestoreMismatch { .. }
            | Self::Fs(_) => ErrorKind::IoFatal,
            Self::RollbackFailed { .. } => ErrorKind::RollbackFailure,
            Self::Meta(err) => match err {
                ccm_meta::Error::Fs(_) => ErrorKind::IoFatal,
                err if err.is_not_found() => ErrorKind::NotFound,
                _ => ErrorKind::Validation,
            },
        }
    }

    /// True only when the install path may have been left half-written.
    pub fn is_critical(&self) -> bool {
        self.kind() == ErrorKind::RollbackFailure
    }

    pub(crate) fn from_walk(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
        let source = match err.into_io_error() {
            Some(io) => io,
            None => std::io::Error::other("filesystem loop detected"),
        };
        ccm_fs::Error::io(path, source).into()
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ccm_fs::Error::io(path, source).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rollback_failure_is_critical() {
        let cause = || Box::new(Error::validation("boom"));

        let rolled_back = Error::ApplyRolledBack { cause: cause() };
        let failed = Error::RollbackFailed {
            cause: cause(),
            rollback: cause(),
        };

        assert_eq!(rolled_back.kind(), ErrorKind::IoFatal);
        assert!(!rolled_back.is_critical());
        assert_eq!(failed.kind(), ErrorKind::RollbackFailure);
        assert!(failed.is_critical());
    }

    #[test]
    fn meta_errors_are_classified() {
        let not_found: Error = ccm_meta::Error::ProjectNotFound {
            name: "demo".into(),
        }
        .into();
        let invalid: Error = ccm_meta::Error::validation("bad").into();

        assert_eq!(not_found.kind(), ErrorKind::NotFound);
        assert_eq!(invalid.kind(), ErrorKind::Validation);
    }

    #[test]
    fn display_names_the_snapshot() {
        let err = Error::SnapshotNotFound {
            project: "demo".into(),
            timestamp: "20250101000000000".into(),
        };

        assert!(err.to_string().contains("20250101000000000"));
    }
}
