//! Error types for ccm-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from ccm-core
    #[error(transparent)]
    Core(#[from] ccm_core::Error),

    /// Error from ccm-meta
    #[error(transparent)]
    Meta(#[from] ccm_meta::Error),

    /// Error from ccm-fs
    #[error(transparent)]
    Fs(#[from] ccm_fs::Error),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Whether the failure left an install path in an unknown state.
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Core(err) if err.is_critical())
    }
}
