//! SHA-256 digests of files and directory trees
//!
//! Digests are written as `sha256:<hex>`. A tree digest covers the
//! relative path and content of every regular file under a root; symlinks
//! and empty directories do not contribute, so a tree restored from a
//! snapshot digests the same as the snapshot itself.

use std::fs::File;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::{Error, Result};

const PREFIX: &str = "sha256:";

fn finish(hasher: Sha256) -> String {
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Digest of raw bytes.
pub fn bytes_digest(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    finish(hasher)
}

/// Digest of a file's contents, read in a stream.
pub fn file_digest(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| Error::io(path, e))?;
    Ok(finish(hasher))
}

/// Digest of every regular file under `root` together with its
/// `/`-separated relative path.
///
/// The digest does not depend on where the tree lives. A missing root
/// digests like an empty directory.
pub fn tree_digest(root: &Path) -> Result<String> {
    let mut hasher = Sha256::new();
    if !root.exists() {
        return Ok(finish(hasher));
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            Error::io(path, io::Error::from(e))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        hasher.update(rel.as_bytes());
        hasher.update([0u8]);
        hasher.update(file_digest(entry.path())?.as_bytes());
        hasher.update(b"\n");
    }
    Ok(finish(hasher))
}
