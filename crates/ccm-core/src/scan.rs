//! Pre-flight scan for oversized files

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{PatternMatcher, walk};

/// A file above the size threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargeFile {
    /// Path relative to the scanned directory, `/`-separated
    pub path: String,
    pub size: u64,
}

/// Walks a tree with the same rules as [`crate::TreeMirror`] and reports
/// files strictly larger than the threshold. Unreadable entries are skipped.
#[derive(Debug, Clone, Copy)]
pub struct LargeFileScanner<'a> {
    matcher: &'a PatternMatcher,
    threshold: u64,
}

impl<'a> LargeFileScanner<'a> {
    pub fn new(matcher: &'a PatternMatcher, threshold: u64) -> Self {
        Self { matcher, threshold }
    }

    pub fn scan(&self, dir: &Path) -> Vec<LargeFile> {
        let mut found = Vec::new();
        for entry in walk::filtered(dir, "", self.matcher) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!("Scan skipped an entry: {}", err);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if metadata.len() > self.threshold {
                if let Some(path) = walk::rule_path(dir, "", entry.path()) {
                    found.push(LargeFile {
                        path,
                        size: metadata.len(),
                    });
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccm_test_utils::write_tree;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn reports_only_included_files_above_threshold() {
        let temp = TempDir::new().unwrap();
        write_tree(
            temp.path(),
            &[
                ("small.txt", "1234"),
                ("big.bin", "0123456789"),
                ("exact.txt", "01234"),
                ("ignored/huge.bin", "0123456789012345"),
                ("nested/big.dat", "abcdefghij"),
            ],
        );

        let matcher = PatternMatcher::compile(&["ignored/"], &[] as &[&str]).unwrap();
        let found = LargeFileScanner::new(&matcher, 5).scan(temp.path());

        assert_eq!(
            found,
            vec![
                LargeFile {
                    path: "big.bin".into(),
                    size: 10
                },
                LargeFile {
                    path: "nested/big.dat".into(),
                    size: 10
                },
            ]
        );
    }

    #[test]
    fn missing_directory_reports_nothing() {
        let temp = TempDir::new().unwrap();

        let found = LargeFileScanner::new(&PatternMatcher::allow_all(), 0).scan(&temp.path().join("nope"));

        assert!(found.is_empty());
    }
}
