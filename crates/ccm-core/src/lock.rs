//! Per-project operation lock

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use ccm_fs::WorkspaceLayout;
use fs2::FileExt;

use crate::{Error, Result};

/// Exclusive advisory lock on `Projects/<p>/.lock`.
///
/// Held for the duration of one mutating operation. Acquisition never
/// waits: a project that is already locked yields [`Error::Busy`]. The lock
/// is released when the guard is dropped.
#[derive(Debug)]
pub struct ProjectLock {
    file: File,
    path: PathBuf,
}

impl ProjectLock {
    pub fn acquire(layout: &WorkspaceLayout, project: &str) -> Result<Self> {
        let path = layout.lock_file(project).to_native();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| Error::io(&path, e))?;

        match FileExt::try_lock_exclusive(&file) {
            Ok(()) => {
                tracing::debug!(project, "Acquired project lock");
                Ok(Self { file, path })
            }
            Err(e) if is_contended(&e) => Err(Error::Busy {
                project: project.to_string(),
            }),
            Err(e) => Err(Error::io(&path, e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ProjectLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), "Failed to release project lock: {}", e);
        }
    }
}

fn is_contended(err: &std::io::Error) -> bool {
    err.kind() == std::io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
