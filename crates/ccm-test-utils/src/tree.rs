//! Directory tree fixtures.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;


/// Write `(relative path, content)` pairs under `root`, creating parents.
///
/// # Panics
/// Panics if any file cannot be written.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("write_tree: failed to create {}: {e}", parent.display()));
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("write_tree: failed to write {}: {e}", path.display()));
    }
}

/// Every regular file under `root`, keyed by `/`-separated relative path.
///
/// Symlinks are not followed. A missing root yields an empty map.
pub fn read_tree(root: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut files = BTreeMap::new();
    collect(root, "", &mut files);
    files
}

/// Digest of a tree's regular files and their relative paths.
///
/// Two trees have the same digest exactly when [`read_tree`] returns the
/// same map for both.
///
/// # Panics
/// Panics if a file under `root` cannot be read.
pub fn tree_digest(root: &Path) -> String {
    ccm_fs::checksum::tree_digest(root)
        .unwrap_or_else(|e| panic!("tree_digest: failed to digest {}: {e}", root.display()))
}

fn collect(dir: &Path, prefix: &str, files: &mut BTreeMap<String, Vec<u8>>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        let rel = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            collect(&entry.path(), &rel, files);
        } else if file_type.is_file() {
            let content = fs::read(entry.path())
                .unwrap_or_else(|e| panic!("read_tree: failed to read {rel}: {e}"));
            files.insert(rel, content);
        }
    }
}
