//! Settings store
//!
//! Reads and writes `settings.json`. The parsed document is cached inside
//! the store instance; callers that change the file behind its back use
//! [`SettingsStore::reload`] or [`SettingsStore::invalidate`].

use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use ccm_fs::{ConfigStore, NormalizedPath, WorkspaceLayout};

use crate::validation::{validate_additional_paths, validate_cli_name};
use crate::{AdditionalPath, CliEntry, Error, Result, Settings};

/// Partial update of the ignore rules.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRulesUpdate {
    /// Replaces the global rules when set.
    pub global: Option<Vec<String>>,
    /// Merged into the per-CLI rules, replacing lists for the given CLIs.
    pub per_cli: Vec<(String, Vec<String>)>,
}

/// Explicit, instance-scoped settings cache.
#[derive(Debug)]
pub struct SettingsStore {
    path: NormalizedPath,
    store: ConfigStore,
    cache: Mutex<Option<Settings>>,
}

impl SettingsStore {
    /// Create a store for the settings file of `layout`.
    pub fn new(layout: &WorkspaceLayout) -> Self {
        Self::at(layout.settings_file())
    }

    /// Create a store for an explicit settings file.
    pub fn at(path: NormalizedPath) -> Self {
        Self {
            path,
            store: ConfigStore::new(),
            cache: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    fn cache(&self) -> MutexGuard<'_, Option<Settings>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create the workspace directories and a default settings file if
    /// they do not exist yet.
    pub fn initialize(&self, layout: &WorkspaceLayout) -> Result<()> {
        let projects = layout.projects_dir().to_native();
        fs::create_dir_all(&projects).map_err(|e| ccm_fs::Error::io(&projects, e))?;
        if !self.path.exists() {
            tracing::info!(path = %self.path, "Writing default settings");
            self.store.save(&self.path, &Settings::default())?;
        }
        Ok(())
    }

    /// Current settings.
    ///
    /// A missing or unreadable file yields the default settings.
    pub fn read(&self) -> Settings {
        let mut cache = self.cache();
        if let Some(settings) = cache.as_ref() {
            return settings.clone();
        }
        let settings: Settings = self.store.load_optional(&self.path).unwrap_or_default();
        *cache = Some(settings.clone());
        settings
    }

    /// Drop the cached settings and read the file again.
    pub fn reload(&self) -> Settings {
        self.invalidate();
        self.read()
    }

    /// Drop the cached settings; the next read goes to disk.
    pub fn invalidate(&self) {
        *self.cache() = None;
    }

    /// Persist `settings` and make them the cached value.
    pub fn write(&self, settings: &Settings) -> Result<()> {
        self.store.save(&self.path, settings)?;
        *self.cache() = Some(settings.clone());
        Ok(())
    }

    /// Register a CLI. Names are unique regardless of case.
    pub fn add_cli(
        &self,
        name: &str,
        install_path: impl Into<PathBuf>,
        additional_paths: Vec<AdditionalPath>,
    ) -> Result<()> {
        validate_cli_name(name)?;
        validate_additional_paths(&additional_paths)?;

        let mut settings = self.read();
        if let Some(existing) = settings.cli_registry.resolve_key(name) {
            return Err(Error::AlreadyExists {
                kind: "CLI",
                name: existing.to_string(),
            });
        }

        settings.cli_registry.insert(
            name,
            CliEntry {
                install_path: install_path.into(),
                additional_paths,
            },
        );
        self.write(&settings)
    }

    /// Unregister a CLI and drop its per-CLI rules.
    ///
    /// Returns whether anything was removed.
    pub fn remove_cli(&self, name: &str) -> Result<bool> {
        let mut settings = self.read();
        let Some((key, _)) = settings.cli_registry.remove(name) else {
            return Ok(false);
        };
        settings.ignore_rules.per_cli.remove(&key);
        self.write(&settings)?;
        Ok(true)
    }

    /// Replace the global rules and/or merge per-CLI rules.
    pub fn update_ignore_rules(&self, update: IgnoreRulesUpdate) -> Result<()> {
        let mut settings = self.read();
        if let Some(global) = update.global {
            settings.ignore_rules.global = global;
        }
        for (cli, rules) in update.per_cli {
            settings.ignore_rules.per_cli.insert(cli, rules);
        }
        self.write(&settings)
    }
}
