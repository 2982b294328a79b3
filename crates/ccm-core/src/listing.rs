//! One-level directory listing for file browsers

use std::fs;
use std::path::Path;

use serde::Serialize;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub name: String,
    pub relative_path: String,
    pub is_directory: bool,
    pub is_symlink: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

/// List `dir` one level deep: directories first, then by name.
///
/// Sizes are reported for regular files only. An unreadable directory
/// yields an empty list.
pub fn list_dir(dir: &Path) -> Vec<FileEntry> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(path = %dir.display(), "Cannot list directory: {}", err);
            return Vec::new();
        }
    };

    let mut listing: Vec<FileEntry> = entries
        .flatten()
        .filter_map(|entry| {
            let file_type = entry.file_type().ok()?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let size_bytes = if file_type.is_file() {
                entry.metadata().ok().map(|m| m.len())
            } else {
                None
            };
            Some(FileEntry {
                relative_path: name.clone(),
                name,
                is_directory: file_type.is_dir(),
                is_symlink: file_type.is_symlink(),
                size_bytes,
            })
        })
        .collect();

    listing.sort_by(|a, b| {
        b.is_directory
            .cmp(&a.is_directory)
            .then_with(|| a.name.cmp(&b.name))
    });
    listing
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccm_test_utils::write_tree;
    use tempfile::TempDir;

    #[test]
    fn directories_first_then_names() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("b.txt", "bb"), ("a.txt", "a"), ("z/inner.txt", "")]);
        fs::create_dir(temp.path().join("c")).unwrap();

        let names: Vec<_> = list_dir(temp.path()).into_iter().map(|e| e.name).collect();

        assert_eq!(names, vec!["c", "z", "a.txt", "b.txt"]);
    }

    #[test]
    fn sizes_only_for_files() {
        let temp = TempDir::new().unwrap();
        write_tree(temp.path(), &[("f.txt", "four"), ("d/x", "")]);

        let listing = list_dir(temp.path());

        assert_eq!(listing[0].size_bytes, None);
        assert!(listing[0].is_directory);
        assert_eq!(listing[1].size_bytes, Some(4));
        assert_eq!(listing[1].relative_path, "f.txt");
    }

    #[test]
    fn unreadable_directory_is_empty() {
        let temp = TempDir::new().unwrap();

        assert!(list_dir(&temp.path().join("missing")).is_empty());
    }
}
