//! Snapshot creation, listing and retention

use std::fs;
use std::path::{Path, PathBuf};

use ccm_fs::constants::{SNAPSHOT_DIR_PREFIX, STAGING_SUFFIX, WorkspacePath};
use ccm_fs::{ConfigStore, NormalizedPath, WorkspaceLayout, io};
use ccm_meta::{ResolvedCli, clock};
use chrono::TimeDelta;

use super::{SnapshotMeta, SnapshotSource, SnapshotType};
use crate::{EngineConfig, Error, PatternMatcher, Result, TreeMirror};

/// How a new snapshot should be labelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRequest {
    pub snapshot_type: SnapshotType,
    pub source: SnapshotSource,
    pub notes: String,
}

impl SnapshotRequest {
    pub fn new(snapshot_type: SnapshotType, source: SnapshotSource) -> Self {
        Self {
            snapshot_type,
            source,
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Owns the `backup/` directory of every project.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    layout: WorkspaceLayout,
    config: EngineConfig,
    meta_store: ConfigStore,
}

impl SnapshotStore {
    pub fn new(layout: WorkspaceLayout, config: EngineConfig) -> Self {
        Self {
            layout,
            meta_store: ConfigStore::with_robustness(config.copy),
            config,
        }
    }

    /// Capture the install paths of `clis` as a new snapshot.
    ///
    /// Everything is written to `bak<ts>.tmp` first and renamed into place
    /// once complete, so a listing never sees a partial snapshot. On failure
    /// the staging directory is removed. Retention runs after the commit.
    ///
    /// Ignore rules do not apply: the snapshot holds every regular file of
    /// each install path. Skipped symlinks and missing sources are reported
    /// through `warnings`.
    pub fn create(
        &self,
        project: &str,
        clis: &[ResolvedCli],
        request: &SnapshotRequest,
        warnings: &mut Vec<String>,
    ) -> Result<String> {
        self.sweep_staging(project);

        let timestamp = self.allocate_timestamp(project);
        let staging = self.layout.staging_dir(project, &timestamp).to_native();
        let final_dir = self.layout.snapshot_dir(project, &timestamp).to_native();

        let committed = fs::create_dir_all(&staging)
            .map_err(|e| Error::io(&staging, e))
            .and_then(|()| self.populate(&staging, &timestamp, clis, request, warnings))
            .and_then(|()| fs::rename(&staging, &final_dir).map_err(|e| Error::io(&final_dir, e)));

        if let Err(err) = committed {
            if let Err(cleanup) = io::remove_dir_all_if_exists(&staging) {
                tracing::warn!("Failed to remove staging directory: {}", cleanup);
            }
            return Err(err);
        }

        tracing::info!(project, timestamp = %timestamp, source = %request.source, "Created snapshot");
        self.enforce_retention(project);
        Ok(timestamp)
    }

    /// Committed snapshots, newest first. Unreadable ones are skipped.
    pub fn list(&self, project: &str) -> Vec<SnapshotMeta> {
        let dir = self.layout.backup_dir(project).to_native();
        let Ok(entries) = fs::read_dir(&dir) else {
            return Vec::new();
        };

        let mut snapshots: Vec<SnapshotMeta> = entries
            .flatten()
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                let timestamp = name.strip_prefix(SNAPSHOT_DIR_PREFIX)?;
                if !clock::is_compact_timestamp(timestamp) {
                    return None;
                }
                self.get_meta(project, timestamp)
            })
            .collect();

        snapshots.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        snapshots
    }

    pub fn get_meta(&self, project: &str, timestamp: &str) -> Option<SnapshotMeta> {
        if !clock::is_compact_timestamp(timestamp) {
            return None;
        }
        let path = self
            .layout
            .snapshot_dir(project, timestamp)
            .join(WorkspacePath::SnapshotMeta.as_str());
        self.meta_store.load_optional(&path)
    }

    pub fn snapshot_path(&self, project: &str, timestamp: &str) -> PathBuf {
        self.layout.snapshot_dir(project, timestamp).to_native()
    }

    /// Remove a snapshot. A missing snapshot is not an error.
    pub fn delete(&self, project: &str, timestamp: &str) -> Result<()> {
        if !clock::is_compact_timestamp(timestamp) {
            return Err(Error::validation(format!(
                "'{timestamp}' is not a snapshot timestamp"
            )));
        }
        io::remove_dir_all_if_exists(&self.snapshot_path(project, timestamp))?;
        Ok(())
    }

    /// Delete the oldest snapshots beyond the retention limit, oldest first.
    ///
    /// A snapshot that cannot be deleted is logged and skipped. Returns the
    /// timestamps that were evicted.
    pub fn enforce_retention(&self, project: &str) -> Vec<String> {
        let snapshots = self.list(project);
        let keep = self.config.max_snapshots;
        if snapshots.len() <= keep {
            return Vec::new();
        }

        let mut evicted = Vec::new();
        for meta in snapshots[keep..].iter().rev() {
            match self.delete(project, &meta.timestamp) {
                Ok(()) => {
                    tracing::info!(project, timestamp = %meta.timestamp, "Evicted snapshot");
                    evicted.push(meta.timestamp.clone());
                }
                Err(err) => {
                    tracing::warn!(project, timestamp = %meta.timestamp, "Failed to evict snapshot: {}", err);
                }
            }
        }
        evicted
    }

    /// Remove staging directories left behind by interrupted creates.
    pub fn sweep_staging(&self, project: &str) -> usize {
        let dir = self.layout.backup_dir(project).to_native();
        let Ok(entries) = fs::read_dir(&dir) else {
            return 0;
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !(name.starts_with(SNAPSHOT_DIR_PREFIX) && name.ends_with(STAGING_SUFFIX)) {
                continue;
            }
            match io::remove_dir_all_if_exists(&entry.path()) {
                Ok(()) => {
                    tracing::debug!(project, staging = %name, "Removed stale staging directory");
                    removed += 1;
                }
                Err(err) => tracing::warn!("Failed to remove stale staging directory: {}", err),
            }
        }
        removed
    }

    /// Current UTC+8 time, advanced a millisecond at a time past any
    /// snapshot or staging directory already using it.
    fn allocate_timestamp(&self, project: &str) -> String {
        let mut at = clock::now_utc8();
        loop {
            let timestamp = clock::compact_timestamp(at);
            if !self.layout.snapshot_dir(project, &timestamp).exists()
                && !self.layout.staging_dir(project, &timestamp).exists()
            {
                return timestamp;
            }
            at += TimeDelta::milliseconds(1);
        }
    }

    fn populate(
        &self,
        staging: &Path,
        timestamp: &str,
        clis: &[ResolvedCli],
        request: &SnapshotRequest,
        warnings: &mut Vec<String>,
    ) -> Result<()> {
        let everything = PatternMatcher::allow_all();
        let mirror = TreeMirror::new(&everything, self.config.copy);

        for cli in clis {
            let dest = staging.join(&cli.cli_key);
            if cli.install_path.is_dir() {
                mirror.mirror(&cli.install_path, &dest, warnings)?;
            } else {
                fs::create_dir_all(&dest).map_err(|e| Error::io(&dest, e))?;
                tracing::warn!(cli = %cli.cli_key, path = %cli.install_path.display(), "Install path missing; captured as empty");
                warnings.push(format!(
                    "Install path of {} does not exist: {}",
                    cli.cli_key,
                    cli.install_path.display()
                ));
            }

            let extras_dir = staging
                .join(WorkspacePath::AdditionalFilesDir.as_str())
                .join(&cli.cli_key);
            for extra in &cli.additional_paths {
                let Some(name) = extra.basename() else {
                    continue;
                };
                if extra.path.is_file() {
                    io::copy_file(&extra.path, &extras_dir.join(name), self.config.copy)?;
                } else {
                    warnings.push(format!(
                        "Skipped missing additional file: {}",
                        extra.path.display()
                    ));
                }
            }
        }

        let meta = SnapshotMeta {
            timestamp: timestamp.to_string(),
            snapshot_type: request.snapshot_type,
            included_clis: clis.iter().map(|cli| cli.cli_key.clone()).collect(),
            source: request.source,
            created_time: clock::iso_utc8(clock::now_utc8()),
            notes: request.notes.clone(),
        };
        let meta_path = NormalizedPath::new(staging.join(WorkspacePath::SnapshotMeta.as_str()));
        self.meta_store.save(&meta_path, &meta)?;
        Ok(())
    }
}
