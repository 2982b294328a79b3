//! [`TestWorkspace`] builder for engine and CLI test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use ccm_fs::WorkspaceLayout;
use ccm_meta::{AdditionalPath, IgnoreRulesUpdate, ProjectStore, SettingsStore};
use tempfile::TempDir;

use crate::tree::write_tree;

/// A temporary workspace root plus a sibling directory for fake install
/// paths.
///
/// ```text
/// <temp>/home/       workspace root (settings.json, Projects/)
/// <temp>/installs/   one install directory per registered CLI
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use ccm_test_utils::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// ws.register_cli("Claude", &[("settings.json", "{}")]);
/// ws.create_project("demo", &["Claude"]);
/// ws.assert_file_exists("Projects/demo/project.json");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
    layout: WorkspaceLayout,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create a workspace with default settings and no CLIs.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let layout = WorkspaceLayout::new(temp_dir.path().join("home"));
        SettingsStore::new(&layout)
            .initialize(&layout)
            .expect("TestWorkspace::new: failed to initialize settings");
        Self { temp_dir, layout }
    }

    /// Root of the workspace (the directory holding `settings.json`).
    pub fn root(&self) -> PathBuf {
        self.layout.root.to_native()
    }

    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    /// A fresh settings store; reads always reflect the file on disk.
    pub fn settings(&self) -> SettingsStore {
        SettingsStore::new(&self.layout)
    }

    pub fn projects(&self) -> ProjectStore {
        ProjectStore::new(self.layout.clone())
    }

    /// Where the fake install directory of `cli` lives.
    pub fn install_dir(&self, cli: &str) -> PathBuf {
        self.temp_dir.path().join("installs").join(cli)
    }

    /// Scratch directory outside both the workspace and the installs.
    pub fn outside(&self, rel: &str) -> PathBuf {
        self.temp_dir.path().join("outside").join(rel)
    }

    /// Populate an install directory and register it as a CLI.
    pub fn register_cli(&self, cli: &str, files: &[(&str, &str)]) -> PathBuf {
        self.register_cli_with_extras(cli, files, Vec::new())
    }

    /// Like [`Self::register_cli`], also tracking additional files.
    pub fn register_cli_with_extras(
        &self,
        cli: &str,
        files: &[(&str, &str)],
        extras: Vec<AdditionalPath>,
    ) -> PathBuf {
        let install = self.install_dir(cli);
        fs::create_dir_all(&install).unwrap();
        write_tree(&install, files);
        self.settings()
            .add_cli(cli, &install, extras)
            .unwrap_or_else(|e| panic!("register_cli: failed to register {cli}: {e}"));
        install
    }

    /// Replace the global ignore rules.
    pub fn set_global_rules(&self, rules: &[&str]) {
        self.settings()
            .update_ignore_rules(IgnoreRulesUpdate {
                global: Some(rules.iter().map(|r| r.to_string()).collect()),
                per_cli: Vec::new(),
            })
            .expect("set_global_rules: failed to write settings");
    }

    /// Create a project linking already registered CLIs.
    pub fn create_project(&self, name: &str, clis: &[&str]) {
        let clis: Vec<String> = clis.iter().map(|c| c.to_string()).collect();
        self.projects()
            .create(name, &clis, &self.settings().read())
            .unwrap_or_else(|e| panic!("create_project: failed to create {name}: {e}"));
    }

    /// Working copy of `cli` in `project`.
    pub fn working_copy(&self, project: &str, cli: &str) -> PathBuf {
        self.layout.working_copy(project, cli).to_native()
    }

    /// Assert that `path` (relative to the workspace root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the workspace root) does **not** exist.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` contains `content`.
    pub fn assert_file_contains(&self, path: &Path, content: &str) {
        let file_content = fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path.display(),
            content,
            file_content
        );
    }
}
