//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

/// Characters that may not appear in a directory name derived from user input.
const UNSAFE_COMPONENT_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// A path normalized to use forward slashes internally.
///
/// All paths are normalized to forward slashes for storage and matching and
/// converted to platform-native format only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes for internal storage.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let normalized = path_str.replace('\\', "/");
        Self { inner: normalized }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        if self.inner.is_empty() {
            return Self {
                inner: segment_normalized,
            };
        }
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self { inner: joined }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

/// Validate that a user-supplied name is safe for use as a single directory
/// component.
///
/// Rejects empty names and anything that could escape the parent directory.
/// The error is a human-readable message prefixed with `label`.
pub fn validate_path_identifier(value: &str, label: &str) -> std::result::Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{label} cannot be empty"));
    }
    if value.contains("..") || value.contains('/') || value.contains('\\') {
        return Err(format!("{label} '{value}' is invalid"));
    }
    Ok(())
}

/// Replace characters that are not allowed in directory names with `_`.
pub fn sanitize_component(name: &str) -> String {
    name.chars()
        .map(|c| if UNSAFE_COMPONENT_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Normalize a path that must stay relative to some root.
///
/// Separators become `/`, empty and `.` segments are dropped. Absolute
/// paths, drive prefixes and `..` segments are rejected.
pub fn validate_relative_path(value: &str) -> std::result::Result<String, String> {
    let normalized = value.replace('\\', "/");
    if normalized.starts_with('/') {
        return Err(format!("Path '{value}' must be relative"));
    }

    let mut segments = Vec::new();
    for (i, segment) in normalized.split('/').enumerate() {
        match segment {
            "" | "." => continue,
            ".." => return Err(format!("Path '{value}' escapes its root")),
            s if i == 0 && s.len() == 2 && s.ends_with(':') => {
                return Err(format!("Path '{value}' must be relative"));
            }
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return Err("Path cannot be empty".to_string());
    }
    Ok(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn join_uses_forward_slashes() {
        let base = NormalizedPath::new("root\\projects");
        assert_eq!(base.join("demo\\cli").as_str(), "root/projects/demo/cli");
    }

    #[test]
    fn file_name_and_extension() {
        let path = NormalizedPath::new("a/b/settings.json");
        assert_eq!(path.file_name(), Some("settings.json"));
        assert_eq!(path.extension(), Some("json"));
        assert_eq!(NormalizedPath::new("a/.hidden").extension(), None);
    }

    #[test]
    fn parent_of_nested_path() {
        let path = NormalizedPath::new("/a/b/c");
        assert_eq!(path.parent().unwrap().as_str(), "/a/b");
        assert_eq!(NormalizedPath::new("/a").parent().unwrap().as_str(), "/");
    }

    #[rstest]
    #[case("demo", true)]
    #[case("my project", true)]
    #[case("", false)]
    #[case("   ", false)]
    #[case("../escape", false)]
    #[case("a/b", false)]
    #[case("a\\b", false)]
    fn identifier_validation(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(validate_path_identifier(value, "Project name").is_ok(), ok);
    }

    #[test]
    fn sanitize_replaces_reserved_characters() {
        assert_eq!(sanitize_component("a<b>c:d\"e|f?g*h"), "a_b_c_d_e_f_g_h");
        assert_eq!(sanitize_component("plain-name"), "plain-name");
    }

    #[rstest]
    #[case("agents/foo.md", Ok("agents/foo.md"))]
    #[case("agents\\foo.md", Ok("agents/foo.md"))]
    #[case("./settings.json", Ok("settings.json"))]
    #[case("a//b/./c", Ok("a/b/c"))]
    #[case("/etc/passwd", Err(()))]
    #[case("C:/Windows", Err(()))]
    #[case("../outside", Err(()))]
    #[case("a/../../b", Err(()))]
    #[case("", Err(()))]
    #[case("./", Err(()))]
    fn relative_path_validation(#[case] value: &str, #[case] expected: Result<&str, ()>) {
        let actual = validate_relative_path(value);
        assert_eq!(actual.as_deref().map_err(|_| ()), expected);
    }
}
