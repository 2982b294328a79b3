//! Project metadata store
//!
//! A project links one or more registered CLIs. Each link records the
//! install path (and additional paths) the CLI had when it was linked, and
//! owns a working-copy directory named after the CLI key.

use std::fs;
use std::path::PathBuf;

use ccm_fs::{ConfigStore, WorkspaceLayout, io};

use crate::clock;
use crate::validation::validate_project_name;
use crate::{CaseInsensitiveMap, Error, LinkedCli, ProjectMeta, ResolvedCli, Result, Settings};

/// CRUD over `Projects/<name>/project.json`.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    layout: WorkspaceLayout,
    store: ConfigStore,
}

impl ProjectStore {
    pub fn new(layout: WorkspaceLayout) -> Self {
        Self {
            layout,
            store: ConfigStore::new(),
        }
    }

    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    /// Names of all project directories, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let dir = self.layout.projects_dir().to_native();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ccm_fs::Error::io(&dir, e).into()),
        };

        let mut names: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }

    /// Whether a project of this name exists, ignoring case.
    pub fn exists(&self, name: &str) -> Result<bool> {
        let wanted = name.to_lowercase();
        Ok(self.list()?.iter().any(|p| p.to_lowercase() == wanted))
    }

    /// Metadata of a project, or `None` if it is missing or unreadable.
    pub fn get_meta(&self, name: &str) -> Option<ProjectMeta> {
        self.store.load_optional(&self.layout.project_meta(name))
    }

    /// Metadata of a project, failing with [`Error::ProjectNotFound`].
    pub fn require(&self, name: &str) -> Result<ProjectMeta> {
        self.get_meta(name).ok_or_else(|| Error::ProjectNotFound {
            name: name.to_string(),
        })
    }

    /// Resolve a linked CLI by any casing of its key.
    pub fn resolve_cli(&self, project: &str, cli_name: &str) -> Result<ResolvedCli> {
        self.require(project)?
            .resolve_cli(cli_name)
            .ok_or_else(|| Error::CliNotLinked {
                project: project.to_string(),
                cli: cli_name.to_string(),
            })
    }

    /// Working-copy directory of a linked CLI.
    pub fn working_copy_path(&self, project: &str, cli_name: &str) -> Result<PathBuf> {
        let cli = self.resolve_cli(project, cli_name)?;
        Ok(self.layout.working_copy(project, &cli.cli_key).to_native())
    }

    /// Create a project linking the given registered CLIs.
    pub fn create(&self, name: &str, cli_names: &[String], settings: &Settings) -> Result<ProjectMeta> {
        validate_project_name(name)?;
        if self.exists(name)? {
            return Err(Error::AlreadyExists {
                kind: "Project",
                name: name.to_string(),
            });
        }

        let mut linked_clis = CaseInsensitiveMap::new();
        for cli_name in cli_names {
            let (key, linked) = Self::link_from_registry(cli_name, settings)?;
            linked_clis.insert(key, linked);
        }

        let backup = self.layout.backup_dir(name).to_native();
        fs::create_dir_all(&backup).map_err(|e| ccm_fs::Error::io(&backup, e))?;
        for key in linked_clis.keys() {
            self.create_working_copy_dir(name, key)?;
        }

        let meta = ProjectMeta {
            project_name: name.to_string(),
            created_time: clock::iso_utc8(clock::now_utc8()),
            linked_clis,
        };
        self.store.save(&self.layout.project_meta(name), &meta)?;
        tracing::info!(project = name, "Created project");
        Ok(meta)
    }

    /// Delete a project with its working copies and snapshots.
    pub fn delete(&self, name: &str) -> Result<()> {
        let dir = self.layout.project_dir(name).to_native();
        io::remove_dir_all_if_exists(&dir)?;
        Ok(())
    }

    /// Link a registered CLI to an existing project.
    pub fn link_cli(&self, project: &str, cli_name: &str, settings: &Settings) -> Result<()> {
        let mut meta = self.require(project)?;
        if let Some(existing) = meta.linked_clis.resolve_key(cli_name) {
            return Err(Error::AlreadyExists {
                kind: "Linked CLI",
                name: existing.to_string(),
            });
        }

        let (key, linked) = Self::link_from_registry(cli_name, settings)?;
        self.create_working_copy_dir(project, &key)?;
        meta.linked_clis.insert(key, linked);
        self.store.save(&self.layout.project_meta(project), &meta)?;
        Ok(())
    }

    /// Unlink a CLI, deleting its working copy but keeping snapshots.
    ///
    /// Returns whether the CLI was linked.
    pub fn unlink_cli(&self, project: &str, cli_name: &str) -> Result<bool> {
        let mut meta = self.require(project)?;
        let Some((key, _)) = meta.linked_clis.remove(cli_name) else {
            return Ok(false);
        };

        let working_copy = self.layout.working_copy(project, &key).to_native();
        io::remove_dir_all_if_exists(&working_copy)?;
        self.store.save(&self.layout.project_meta(project), &meta)?;
        Ok(true)
    }

    fn link_from_registry(cli_name: &str, settings: &Settings) -> Result<(String, LinkedCli)> {
        let (key, entry) = settings
            .cli_registry
            .get_key_value(cli_name)
            .ok_or_else(|| Error::CliNotRegistered {
                name: cli_name.to_string(),
            })?;
        Ok((
            key.to_string(),
            LinkedCli {
                install_path: entry.install_path.clone(),
                additional_paths: entry.additional_paths.clone(),
            },
        ))
    }

    fn create_working_copy_dir(&self, project: &str, cli_key: &str) -> Result<()> {
        let dir = self.layout.working_copy(project, cli_key).to_native();
        fs::create_dir_all(&dir).map_err(|e| ccm_fs::Error::io(&dir, e))?;
        Ok(())
    }
}
