//! Filesystem primitives for CLI Config Manager
//!
//! Provides normalized path handling, the on-disk workspace layout, atomic
//! metadata I/O and the retrying file copy used by the sync engine.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod layout;
pub mod path;

pub use config::ConfigStore;
pub use constants::WorkspacePath;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use layout::WorkspaceLayout;
pub use path::{NormalizedPath, sanitize_component, validate_path_identifier, validate_relative_path};
