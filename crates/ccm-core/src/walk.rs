//! Filtered directory traversal shared by the mirror and the scanner.

use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::PatternMatcher;

/// Walk everything below `root` in name order without following symlinks.
///
/// Excluded directories are pruned, not descended into. `base` is prefixed
/// to every path handed to the matcher, so a subtree can be walked with the
/// rules of its enclosing tree.
pub(crate) fn filtered<'a>(
    root: &'a Path,
    base: &'a str,
    matcher: &'a PatternMatcher,
) -> impl Iterator<Item = walkdir::Result<DirEntry>> + 'a {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            match rule_path(root, base, entry.path()) {
                Some(rel) => matcher.matches(&rel, entry.file_type().is_dir()),
                None => false,
            }
        })
}

/// `path` relative to `root`, prefixed with `base`, joined with `/`.
pub(crate) fn rule_path(root: &Path, base: &str, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut parts: Vec<String> = Vec::new();
    if !base.is_empty() {
        parts.push(base.to_string());
    }
    parts.extend(
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    Some(parts.join("/"))
}
