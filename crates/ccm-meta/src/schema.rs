//! Schema of `settings.json` and `project.json`

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::CaseInsensitiveMap;
use crate::defaults;

/// A single file tracked outside a CLI's install directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalPath {
    /// Short identifier, `[A-Za-z0-9_-]+`
    pub alias: String,
    /// Absolute location of the file
    pub path: PathBuf,
}

impl AdditionalPath {
    pub fn new(alias: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            alias: alias.into(),
            path: path.into(),
        }
    }

    /// Name the file is stored under in working copies and snapshots.
    pub fn basename(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}

/// A CLI registered in the settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliEntry {
    pub install_path: PathBuf,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_paths: Vec<AdditionalPath>,
}

/// Ordered gitignore-style rules: global rules first, then per-CLI rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnoreRuleSet {
    pub global: Vec<String>,
    #[serde(default)]
    pub per_cli: CaseInsensitiveMap<Vec<String>>,
}

impl IgnoreRuleSet {
    /// Rule set that excludes nothing.
    pub fn empty() -> Self {
        Self {
            global: Vec::new(),
            per_cli: CaseInsensitiveMap::new(),
        }
    }

    /// Per-CLI rules for `cli_key`, empty when none are configured.
    pub fn per_cli_rules(&self, cli_key: &str) -> &[String] {
        self.per_cli.get(cli_key).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for IgnoreRuleSet {
    fn default() -> Self {
        Self {
            global: defaults::default_global_rules(),
            per_cli: CaseInsensitiveMap::new(),
        }
    }
}

/// UI language; carried for compatibility with existing settings files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en-US")]
    EnUs,
}

/// Contents of `settings.json`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub cli_registry: CaseInsensitiveMap<CliEntry>,
    #[serde(default)]
    pub ignore_rules: IgnoreRuleSet,
    #[serde(default)]
    pub language: Language,
}

/// A CLI linked to a project, as recorded in `project.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedCli {
    #[serde(rename = "snapshotInstallPath")]
    pub install_path: PathBuf,
    #[serde(
        rename = "snapshotAdditionalPaths",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub additional_paths: Vec<AdditionalPath>,
}

/// Contents of `project.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    pub project_name: String,
    pub created_time: String,
    #[serde(rename = "linkedCLIs", default)]
    pub linked_clis: CaseInsensitiveMap<LinkedCli>,
}

impl ProjectMeta {
    /// Look up a linked CLI by any casing of its key.
    pub fn resolve_cli(&self, cli_name: &str) -> Option<ResolvedCli> {
        self.linked_clis
            .get_key_value(cli_name)
            .map(|(key, linked)| ResolvedCli {
                cli_key: key.to_string(),
                install_path: linked.install_path.clone(),
                additional_paths: linked.additional_paths.clone(),
            })
    }
}

/// A linked CLI with its canonical key, as handed to the sync engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCli {
    pub cli_key: String,
    pub install_path: PathBuf,
    pub additional_paths: Vec<AdditionalPath>,
}
