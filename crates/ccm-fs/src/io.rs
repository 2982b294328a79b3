//! Atomic metadata I/O and the retrying file copy

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use backoff::backoff::Backoff;
use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Tuning for operations that touch files other programs may hold open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobustnessConfig {
    /// Total attempts for a single file copy, including the first one.
    pub max_attempts: u32,
    /// Fixed delay between copy attempts.
    pub retry_delay: Duration,
    /// Flush metadata files to disk before renaming them into place.
    pub enable_fsync: bool,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_millis(500),
            enable_fsync: true,
        }
    }
}

/// Constant delay, giving up after a fixed number of retries.
struct FixedRetries {
    delay: Duration,
    remaining: u32,
    budget: u32,
}

impl FixedRetries {
    fn new(config: RobustnessConfig) -> Self {
        let budget = config.max_attempts.saturating_sub(1);
        Self {
            delay: config.retry_delay,
            remaining: budget,
            budget,
        }
    }
}

impl Backoff for FixedRetries {
    fn reset(&mut self) {
        self.remaining = self.budget;
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.delay)
    }
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers never see a partial file.
pub fn write_atomic(path: &NormalizedPath, content: &[u8], config: RobustnessConfig) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    let written = temp_file
        .write_all(content)
        .and_then(|_| {
            if config.enable_fsync {
                temp_file.sync_all()
            } else {
                Ok(())
            }
        })
        .map_err(|e| Error::io(&temp_path, e));

    let _ = FileExt::unlock(&temp_file);
    drop(temp_file);

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, &native_path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::io(&native_path, e)
    })
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes(), RobustnessConfig::default())
}

/// Whether an I/O error belongs to the "file is busy or locked" class.
///
/// These are the errors a running application holding a config file open
/// tends to produce, and are worth a short retry.
pub fn is_transient(err: &io::Error) -> bool {
    match err.kind() {
        io::ErrorKind::PermissionDenied | io::ErrorKind::ResourceBusy => true,
        _ => is_sharing_violation(err),
    }
}

#[cfg(windows)]
fn is_sharing_violation(err: &io::Error) -> bool {
    // ERROR_SHARING_VIOLATION, ERROR_LOCK_VIOLATION
    matches!(err.raw_os_error(), Some(32) | Some(33))
}

#[cfg(not(windows))]
fn is_sharing_violation(_err: &io::Error) -> bool {
    false
}

/// Make an existing destination file writable again.
fn clear_readonly(dest: &Path) -> io::Result<()> {
    let metadata = match fs::symlink_metadata(dest) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    if !metadata.is_file() || !metadata.permissions().readonly() {
        return Ok(());
    }

    let mut perms = metadata.permissions();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        perms.set_mode(perms.mode() | 0o200);
    }
    #[cfg(not(unix))]
    {
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(false);
    }
    fs::set_permissions(dest, perms)
}

/// Copy a single file, creating parent directories as needed.
///
/// Transient lock/permission errors are retried up to
/// `config.max_attempts` times with a fixed delay, clearing a read-only
/// destination before each retry. Any other error, or running out of
/// attempts, returns [`Error::CopyFailed`] naming both paths.
pub fn copy_file(src: &Path, dest: &Path, config: RobustnessConfig) -> Result<u64> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let mut attempts = 0u32;
    let result = backoff::retry_notify(
        FixedRetries::new(config),
        || {
            attempts += 1;
            if attempts > 1 {
                clear_readonly(dest).map_err(backoff::Error::permanent)?;
            }
            fs::copy(src, dest).map_err(|e| {
                if is_transient(&e) {
                    backoff::Error::transient(e)
                } else {
                    backoff::Error::permanent(e)
                }
            })
        },
        |err: io::Error, delay: Duration| {
            tracing::warn!(
                src = %src.display(),
                dest = %dest.display(),
                "Copy failed ({}), retrying in {:?}",
                err,
                delay
            );
        },
    );

    result.map_err(|err| {
        let source = match err {
            backoff::Error::Permanent(e) => e,
            backoff::Error::Transient { err, .. } => err,
        };
        Error::CopyFailed {
            src: src.to_path_buf(),
            dest: dest.to_path_buf(),
            attempts,
            source,
        }
    })
}

/// Recursively remove a directory; a missing directory is not an error.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Empty a directory in place without removing any symlink inside it.
///
/// Regular files are deleted, and so are subdirectories left empty. A
/// subdirectory that still holds a symlink stays. A missing directory is
/// not an error. Returns the number of symlinks left in place.
pub fn clear_dir_keep_symlinks(dir: &Path) -> Result<usize> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(Error::io(dir, e)),
    };

    let mut kept = 0;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| Error::io(&path, e))?;
        if file_type.is_symlink() {
            tracing::debug!(path = %path.display(), "Keeping symlink");
            kept += 1;
        } else if file_type.is_dir() {
            let inner = clear_dir_keep_symlinks(&path)?;
            if inner == 0 {
                fs::remove_dir(&path).map_err(|e| Error::io(&path, e))?;
            }
            kept += inner;
        } else {
            fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
        }
    }
    Ok(kept)
}
