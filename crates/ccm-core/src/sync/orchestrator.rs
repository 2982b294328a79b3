//! SyncOrchestrator implementation

use std::collections::HashSet;
use std::fs::{self, DirEntry};
use std::path::Path;

use ccm_fs::constants::WorkspacePath;
use ccm_fs::{WorkspaceLayout, checksum, io, validate_relative_path};
use ccm_meta::{AdditionalPath, ProjectStore, ResolvedCli, SettingsStore};

use super::{ApplyReport, ImportOutcome, RestoreFailure, RestoreReport};
use crate::snapshot::{SnapshotMeta, SnapshotRequest, SnapshotSource, SnapshotStore, SnapshotType};
use crate::{EngineConfig, Error, LargeFileScanner, PatternMatcher, ProjectLock, Result, TreeMirror};

/// Entry point for every engine operation.
///
/// Owns the settings store (the source of ignore rules), the project store
/// (the install-path resolver) and the snapshot store. Every mutating
/// operation holds the project's [`ProjectLock`] while it runs.
pub struct SyncOrchestrator {
    layout: WorkspaceLayout,
    settings: SettingsStore,
    projects: ProjectStore,
    snapshots: SnapshotStore,
    config: EngineConfig,
}

impl SyncOrchestrator {
    pub fn new(layout: WorkspaceLayout, config: EngineConfig) -> Self {
        Self {
            settings: SettingsStore::new(&layout),
            projects: ProjectStore::new(layout.clone()),
            snapshots: SnapshotStore::new(layout.clone(), config),
            layout,
            config,
        }
    }

    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn projects(&self) -> &ProjectStore {
        &self.projects
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    /// Global rules followed by the rules configured for `cli_key`.
    pub fn compile_ignore_rules(&self, cli_key: &str) -> Result<PatternMatcher> {
        PatternMatcher::for_cli(cli_key, &self.settings.read().ignore_rules)
    }

    /// Replace a CLI's working copy with the filtered contents of its
    /// install path. The install path is only read.
    pub fn import_from_install(
        &self,
        project: &str,
        cli_name: &str,
        skip_large_file_check: bool,
    ) -> Result<ImportOutcome> {
        let cli = self.projects.resolve_cli(project, cli_name)?;
        let matcher = self.compile_ignore_rules(&cli.cli_key)?;
        let _lock = ProjectLock::acquire(&self.layout, project)?;
        tracing::info!(project, cli = %cli.cli_key, "Importing from install path");

        if !cli.install_path.is_dir() {
            return Err(Error::InstallPathMissing {
                path: cli.install_path.clone(),
            });
        }

        if !skip_large_file_check {
            let files = LargeFileScanner::new(&matcher, self.config.large_file_threshold)
                .scan(&cli.install_path);
            if !files.is_empty() {
                tracing::info!(project, count = files.len(), "Import stopped by large files");
                return Ok(ImportOutcome::LargeFilesFound { files });
            }
        }

        let working_copy = self.layout.working_copy(project, &cli.cli_key).to_native();
        io::remove_dir_all_if_exists(&working_copy)?;

        let mut warnings = Vec::new();
        let stats = TreeMirror::new(&matcher, self.config.copy).mirror(
            &cli.install_path,
            &working_copy,
            &mut warnings,
        )?;

        for extra in &cli.additional_paths {
            let Some(name) = extra.basename() else {
                continue;
            };
            if extra.path.is_file() {
                io::copy_file(&extra.path, &working_copy.join(name), self.config.copy)?;
            } else {
                warnings.push(format!(
                    "Skipped missing additional file: {}",
                    extra.path.display()
                ));
            }
        }

        tracing::info!(project, cli = %cli.cli_key, files = stats.files, "Import finished");
        Ok(ImportOutcome::Imported { warnings })
    }

    /// Copy a working copy (or selected paths of it) onto the install path.
    ///
    /// A snapshot of the install path is taken first; if that fails nothing
    /// is touched. If copying fails the install path is restored from that
    /// snapshot and [`Error::ApplyRolledBack`] is returned, or
    /// [`Error::RollbackFailed`] if the restore failed too.
    pub fn apply_to_install(
        &self,
        project: &str,
        cli_name: &str,
        selected_paths: Option<&[String]>,
    ) -> Result<ApplyReport> {
        let cli = self.projects.resolve_cli(project, cli_name)?;
        let selected = match selected_paths {
            Some(paths) if !paths.is_empty() => Some(
                paths
                    .iter()
                    .map(|p| validate_relative_path(p).map_err(Error::validation))
                    .collect::<Result<Vec<_>>>()?,
            ),
            _ => None,
        };
        let matcher = self.compile_ignore_rules(&cli.cli_key)?;

        let working_copy = self.layout.working_copy(project, &cli.cli_key).to_native();
        if !working_copy.is_dir() {
            return Err(Error::validation(format!(
                "Working copy of {} does not exist; import it first",
                cli.cli_key
            )));
        }

        let _lock = ProjectLock::acquire(&self.layout, project)?;
        tracing::info!(project, cli = %cli.cli_key, partial = selected.is_some(), "Applying to install path");

        let snapshot_type = if selected.is_some() {
            SnapshotType::Partial
        } else {
            SnapshotType::Full
        };
        let mut warnings = Vec::new();
        let snapshot = self
            .snapshots
            .create(
                project,
                std::slice::from_ref(&cli),
                &SnapshotRequest::new(snapshot_type, SnapshotSource::AutoApplyBackup),
                &mut warnings,
            )
            .map_err(|e| Error::BackupFailed { source: Box::new(e) })?;

        let applied = match &selected {
            Some(paths) => self.apply_selected(&cli, &working_copy, paths, &matcher, &mut warnings),
            None => self.apply_all(&cli, &working_copy, &matcher, &mut warnings),
        };

        let Err(cause) = applied else {
            tracing::info!(project, cli = %cli.cli_key, snapshot = %snapshot, "Apply finished");
            return Ok(ApplyReport { snapshot, warnings });
        };

        tracing::error!(project, cli = %cli.cli_key, "Apply failed, rolling back: {}", cause);
        let snapshot_dir = self.snapshots.snapshot_path(project, &snapshot);
        match self.roll_back(&snapshot_dir, &cli) {
            Ok(()) => {
                tracing::info!(project, cli = %cli.cli_key, snapshot = %snapshot, "Rolled back");
                Err(Error::ApplyRolledBack {
                    cause: Box::new(cause),
                })
            }
            Err(rollback) => {
                tracing::error!(
                    project,
                    cli = %cli.cli_key,
                    snapshot = %snapshot,
                    "Rollback failed, install path may be inconsistent: {}",
                    rollback
                );
                Err(Error::RollbackFailed {
                    cause: Box::new(cause),
                    rollback: Box::new(rollback),
                })
            }
        }
    }

    /// Reproduce a snapshot onto install paths, ignoring current rules.
    ///
    /// With `cli_name` only that CLI is restored; otherwise every CLI the
    /// snapshot includes, which a partial snapshot refuses. Each CLI is
    /// restored independently and failures are collected in the report.
    pub fn restore_from_snapshot(
        &self,
        project: &str,
        timestamp: &str,
        cli_name: Option<&str>,
    ) -> Result<RestoreReport> {
        let meta = self.projects.require(project)?;
        let snapshot = self.require_snapshot(project, timestamp)?;
        if snapshot.snapshot_type == SnapshotType::Partial && cli_name.is_none() {
            return Err(Error::PartialRestore {
                timestamp: timestamp.to_string(),
            });
        }

        let _lock = ProjectLock::acquire(&self.layout, project)?;
        tracing::info!(project, timestamp, "Restoring snapshot");

        let targets = match cli_name {
            Some(name) => vec![name.to_string()],
            None => snapshot.included_clis.clone(),
        };
        let snapshot_dir = self.snapshots.snapshot_path(project, timestamp);

        let mut report = RestoreReport::default();
        for name in targets {
            let restored = meta
                .resolve_cli(&name)
                .ok_or_else(|| {
                    Error::from(ccm_meta::Error::CliNotLinked {
                        project: project.to_string(),
                        cli: name.clone(),
                    })
                })
                .and_then(|cli| self.restore_cli(&snapshot_dir, &cli).map(|()| cli.cli_key));

            match restored {
                Ok(cli_key) => report.restored.push(cli_key),
                Err(error) => {
                    tracing::warn!(project, cli = %name, "Restore failed: {}", error);
                    report.failures.push(RestoreFailure { cli: name, error });
                }
            }
        }
        Ok(report)
    }

    /// Take a manual snapshot of the named CLIs, or of every linked CLI
    /// when none are named. Returns the new snapshot's timestamp.
    pub fn create_snapshot(
        &self,
        project: &str,
        cli_names: &[String],
        notes: Option<&str>,
    ) -> Result<String> {
        let meta = self.projects.require(project)?;
        let mut clis: Vec<ResolvedCli> = if cli_names.is_empty() {
            meta.linked_clis
                .keys()
                .filter_map(|key| meta.resolve_cli(key))
                .collect()
        } else {
            cli_names
                .iter()
                .map(|name| {
                    meta.resolve_cli(name).ok_or_else(|| {
                        Error::from(ccm_meta::Error::CliNotLinked {
                            project: project.to_string(),
                            cli: name.clone(),
                        })
                    })
                })
                .collect::<Result<_>>()?
        };
        let mut seen = HashSet::new();
        clis.retain(|cli| seen.insert(cli.cli_key.clone()));
        if clis.is_empty() {
            return Err(Error::validation(format!(
                "Project '{project}' has no linked CLIs to back up"
            )));
        }

        let snapshot_type = if clis.len() < meta.linked_clis.len() {
            SnapshotType::Partial
        } else {
            SnapshotType::Full
        };
        let request = SnapshotRequest::new(snapshot_type, SnapshotSource::ManualBackup)
            .with_notes(notes.unwrap_or_default());

        let _lock = ProjectLock::acquire(&self.layout, project)?;
        let mut warnings = Vec::new();
        let timestamp = self.snapshots.create(project, &clis, &request, &mut warnings)?;
        for warning in &warnings {
            tracing::warn!(project, timestamp = %timestamp, "{}", warning);
        }
        Ok(timestamp)
    }

    /// Snapshots of a project, newest first.
    pub fn list_snapshots(&self, project: &str) -> Result<Vec<SnapshotMeta>> {
        self.projects.require(project)?;
        Ok(self.snapshots.list(project))
    }

    pub fn delete_snapshot(&self, project: &str, timestamp: &str) -> Result<()> {
        self.projects.require(project)?;
        let _lock = ProjectLock::acquire(&self.layout, project)?;
        self.snapshots.delete(project, timestamp)
    }

    fn require_snapshot(&self, project: &str, timestamp: &str) -> Result<SnapshotMeta> {
        self.snapshots
            .get_meta(project, timestamp)
            .ok_or_else(|| Error::SnapshotNotFound {
                project: project.to_string(),
                timestamp: timestamp.to_string(),
            })
    }

    /// Full apply: every root entry of the working copy. Additional files
    /// go to their external location regardless of rules.
    fn apply_all(
        &self,
        cli: &ResolvedCli,
        working_copy: &Path,
        matcher: &PatternMatcher,
        warnings: &mut Vec<String>,
    ) -> Result<()> {
        fs::create_dir_all(&cli.install_path).map_err(|e| Error::io(&cli.install_path, e))?;
        let mirror = TreeMirror::new(matcher, self.config.copy);

        for entry in sorted_entries(working_copy)? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let src = entry.path();
            let file_type = entry.file_type().map_err(|e| Error::io(&src, e))?;

            if file_type.is_file() {
                if let Some(extra) = additional_for(cli, &name) {
                    io::copy_file(&src, &extra.path, self.config.copy)?;
                    continue;
                }
            }
            if !matcher.matches(&name, file_type.is_dir()) {
                continue;
            }
            if file_type.is_symlink() {
                warnings.push(format!("Skipped symlink: {name}"));
                continue;
            }

            let dest = cli.install_path.join(&name);
            if file_type.is_dir() {
                mirror.mirror_at(&src, &dest, &name, warnings)?;
            } else {
                io::copy_file(&src, &dest, self.config.copy)?;
            }
        }
        Ok(())
    }

    /// Partial apply: only the given working-copy relative paths.
    fn apply_selected(
        &self,
        cli: &ResolvedCli,
        working_copy: &Path,
        paths: &[String],
        matcher: &PatternMatcher,
        warnings: &mut Vec<String>,
    ) -> Result<()> {
        let mirror = TreeMirror::new(matcher, self.config.copy);

        for rel in paths {
            let src = working_copy.join(rel);
            let Ok(metadata) = fs::symlink_metadata(&src) else {
                warnings.push(format!("Skipped missing path: {rel}"));
                continue;
            };

            if metadata.is_file() && !rel.contains('/') {
                if let Some(extra) = additional_for(cli, rel) {
                    io::copy_file(&src, &extra.path, self.config.copy)?;
                    continue;
                }
            }
            if !matcher.matches(rel, metadata.is_dir()) {
                tracing::debug!(path = %rel, "Skipping ignored path");
                continue;
            }
            if metadata.file_type().is_symlink() {
                warnings.push(format!("Skipped symlink: {rel}"));
                continue;
            }

            let dest = cli.install_path.join(rel);
            if metadata.is_dir() {
                mirror.mirror_at(&src, &dest, rel, warnings)?;
            } else {
                io::copy_file(&src, &dest, self.config.copy)?;
            }
        }
        Ok(())
    }

    /// Replace a CLI's install path with its copy in a snapshot, then put
    /// its additional files back. Refuses before deleting anything if the
    /// snapshot does not contain the CLI.
    ///
    /// Symlinks in the install path are left in place.
    fn restore_cli(&self, snapshot_dir: &Path, cli: &ResolvedCli) -> Result<()> {
        let backup = snapshot_dir.join(&cli.cli_key);
        if !backup.is_dir() {
            return Err(Error::CliNotInSnapshot {
                cli: cli.cli_key.clone(),
            });
        }

        let kept = io::clear_dir_keep_symlinks(&cli.install_path)?;
        fs::create_dir_all(&cli.install_path).map_err(|e| Error::io(&cli.install_path, e))?;
        if kept > 0 {
            tracing::debug!(cli = %cli.cli_key, symlinks = kept, "Left symlinks in install path");
        }

        let everything = PatternMatcher::allow_all();
        let mut skipped = Vec::new();
        TreeMirror::new(&everything, self.config.copy).mirror(&backup, &cli.install_path, &mut skipped)?;

        let extras_dir = snapshot_dir
            .join(WorkspacePath::AdditionalFilesDir.as_str())
            .join(&cli.cli_key);
        for extra in &cli.additional_paths {
            let Some(name) = extra.basename() else {
                continue;
            };
            let src = extras_dir.join(&name);
            if src.is_file() {
                io::copy_file(&src, &extra.path, self.config.copy)?;
            } else {
                tracing::debug!(file = %name, "Additional file not in snapshot");
            }
        }

        tracing::info!(cli = %cli.cli_key, path = %cli.install_path.display(), "Restored install path");
        Ok(())
    }

    /// Restore the pre-apply snapshot and check the install path now holds
    /// exactly the files the snapshot does.
    fn roll_back(&self, snapshot_dir: &Path, cli: &ResolvedCli) -> Result<()> {
        self.restore_cli(snapshot_dir, cli)?;

        let expected = checksum::tree_digest(&snapshot_dir.join(&cli.cli_key))?;
        let actual = checksum::tree_digest(&cli.install_path)?;
        if expected != actual {
            return Err(Error::RestoreMismatch {
                path: cli.install_path.clone(),
            });
        }
        Ok(())
    }
}

fn additional_for<'a>(cli: &'a ResolvedCli, name: &str) -> Option<&'a AdditionalPath> {
    cli.additional_paths
        .iter()
        .find(|extra| extra.basename().as_deref() == Some(name))
}

fn sorted_entries(dir: &Path) -> Result<Vec<DirEntry>> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| Error::io(dir, e))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| Error::io(dir, e))?;
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}
