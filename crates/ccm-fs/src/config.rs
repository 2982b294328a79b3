//! JSON metadata loading and saving

use crate::{Error, NormalizedPath, Result, io};
use serde::{Serialize, de::DeserializeOwned};

/// Store for the JSON metadata files the workspace keeps
/// (`settings.json`, `project.json`, `meta.json`).
///
/// Files are pretty-printed and always replaced atomically.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore {
    robustness: io::RobustnessConfig,
}

impl ConfigStore {
    /// Create a new ConfigStore with default robustness settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new ConfigStore with custom robustness settings.
    pub fn with_robustness(robustness: io::RobustnessConfig) -> Self {
        Self { robustness }
    }

    /// Load a metadata file.
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        Self::check_format(path)?;
        let content = io::read_text(path)?;
        serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_native(),
            format: "JSON".into(),
            message: e.to_string(),
        })
    }

    /// Load a metadata file, returning `None` when it is missing or
    /// cannot be parsed.
    pub fn load_optional<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Option<T> {
        match self.load(path) {
            Ok(value) => Some(value),
            Err(Error::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Ignoring unreadable metadata: {}", e);
                None
            }
        }
    }

    /// Save a metadata file atomically.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        Self::check_format(path)?;
        let content = serde_json::to_string_pretty(value).map_err(|e| Error::ConfigSerialize {
            path: path.to_native(),
            format: "JSON".into(),
            message: e.to_string(),
        })?;

        io::write_atomic(path, content.as_bytes(), self.robustness)
    }

    fn check_format(path: &NormalizedPath) -> Result<()> {
        let extension = path.extension().unwrap_or("");
        if extension.eq_ignore_ascii_case("json") {
            Ok(())
        } else {
            Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            })
        }
    }
}
