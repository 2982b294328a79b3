//! Filtered tree copy

use std::fs;
use std::path::Path;

use ccm_fs::{RobustnessConfig, io};

use crate::{Error, PatternMatcher, Result, walk};

/// Totals from one mirror run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorStats {
    pub files: usize,
    pub bytes: u64,
}

/// Copies a source tree into a destination tree through a [`PatternMatcher`].
///
/// Symlinks are never followed or copied; each one skipped adds a warning.
/// Directories are created even when empty unless they are excluded. The
/// first file that cannot be copied (after retries) aborts the run.
#[derive(Debug, Clone, Copy)]
pub struct TreeMirror<'a> {
    matcher: &'a PatternMatcher,
    copy: RobustnessConfig,
}

impl<'a> TreeMirror<'a> {
    pub fn new(matcher: &'a PatternMatcher, copy: RobustnessConfig) -> Self {
        Self { matcher, copy }
    }

    pub fn mirror(&self, source: &Path, dest: &Path, warnings: &mut Vec<String>) -> Result<MirrorStats> {
        self.mirror_at(source, dest, "", warnings)
    }

    /// Mirror a subtree whose root sits at `base` in the rule namespace.
    pub fn mirror_at(
        &self,
        source: &Path,
        dest: &Path,
        base: &str,
        warnings: &mut Vec<String>,
    ) -> Result<MirrorStats> {
        fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;

        let mut stats = MirrorStats::default();
        for entry in walk::filtered(source, base, self.matcher) {
            let entry = entry.map_err(Error::from_walk)?;
            let Ok(rel) = entry.path().strip_prefix(source) else {
                continue;
            };
            let target = dest.join(rel);
            let file_type = entry.file_type();

            if file_type.is_symlink() {
                let shown = walk::rule_path(source, base, entry.path()).unwrap_or_default();
                tracing::warn!(path = %entry.path().display(), "Skipping symlink");
                warnings.push(format!("Skipped symlink: {shown}"));
            } else if file_type.is_dir() {
                fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
            } else {
                let bytes = io::copy_file(entry.path(), &target, self.copy)?;
                tracing::debug!(src = %entry.path().display(), bytes, "Copied");
                stats.files += 1;
                stats.bytes += bytes;
            }
        }
        Ok(stats)
    }
}
