//! Settings and project metadata for CLI Config Manager.
//!
//! This crate owns the JSON documents that describe which CLIs are
//! registered, which ignore rules apply to them and which projects link
//! them. The sync engine in `ccm-core` consumes it as its install-path
//! resolver.

pub mod cimap;
pub mod clock;
pub mod defaults;
pub mod error;
pub mod project;
pub mod schema;
pub mod settings;
pub mod validation;

pub use cimap::CaseInsensitiveMap;
pub use error::{Error, Result};
pub use project::ProjectStore;
pub use schema::{
    AdditionalPath, CliEntry, IgnoreRuleSet, Language, LinkedCli, ProjectMeta, ResolvedCli,
    Settings,
};
pub use settings::{IgnoreRulesUpdate, SettingsStore};
