//! Error types for ccm-meta

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] ccm_fs::Error),

    #[error("Project not found: {name}")]
    ProjectNotFound { name: String },

    #[error("CLI '{cli}' is not linked to project '{project}'")]
    CliNotLinked { project: String, cli: String },

    #[error("CLI '{name}' is not registered")]
    CliNotRegistered { name: String },

    #[error("{kind} '{name}' already exists")]
    AlreadyExists { kind: &'static str, name: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether this error means something the caller asked for does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProjectNotFound { .. } | Self::CliNotLinked { .. } | Self::CliNotRegistered { .. }
        )
    }
}
