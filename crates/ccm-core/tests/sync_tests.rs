//! End-to-end behaviour of import, apply and restore

use std::fs;
use std::time::Duration;

use ccm_core::{
    EngineConfig, Error, ErrorKind, ImportOutcome, ProjectLock, SnapshotSource, SnapshotType,
    SyncOrchestrator,
};
use ccm_fs::RobustnessConfig;
use ccm_meta::AdditionalPath;
use ccm_test_utils::{TestWorkspace, read_tree, tree_digest, write_tree};
use pretty_assertions::assert_eq;

fn fast_config() -> EngineConfig {
    EngineConfig {
        copy: RobustnessConfig {
            max_attempts: 3,
            retry_delay: Duration::from_millis(1),
            enable_fsync: false,
        },
        ..EngineConfig::default()
    }
}

fn engine(ws: &TestWorkspace) -> SyncOrchestrator {
    SyncOrchestrator::new(ws.layout().clone(), fast_config())
}

fn paths(tree: &std::collections::BTreeMap<String, Vec<u8>>) -> Vec<&str> {
    tree.keys().map(String::as_str).collect()
}

/// One CLI "Claude" linked to project "demo", with the given rules.
fn single_cli(rules: &[&str], files: &[(&str, &str)]) -> TestWorkspace {
    let ws = TestWorkspace::new();
    ws.set_global_rules(rules);
    ws.register_cli("Claude", files);
    ws.create_project("demo", &["Claude"]);
    ws
}

#[test]
fn import_keeps_only_reincluded_files() {
    let ws = single_cli(
        &["**", "!settings.json"],
        &[("settings.json", "{}"), ("secret.key", "hunter2")],
    );

    let outcome = engine(&ws).import_from_install("demo", "claude", false).unwrap();

    assert_eq!(outcome, ImportOutcome::Imported { warnings: vec![] });
    let tree = read_tree(&ws.working_copy("demo", "Claude"));
    assert_eq!(paths(&tree), vec!["settings.json"]);
}

#[test]
fn import_is_idempotent() {
    let ws = single_cli(
        &["**", "!skills/", "**/*.log"],
        &[("skills/a/SKILL.md", "a"), ("skills/a/x.log", "l"), ("other.txt", "o")],
    );
    let engine = engine(&ws);
    let working_copy = ws.working_copy("demo", "Claude");

    engine.import_from_install("demo", "Claude", false).unwrap();
    let first = tree_digest(&working_copy);
    engine.import_from_install("demo", "Claude", false).unwrap();

    assert_eq!(tree_digest(&working_copy), first);
    assert_eq!(paths(&read_tree(&working_copy)), vec!["skills/a/SKILL.md"]);
}

#[test]
fn import_replaces_stale_working_copy_and_never_touches_install() {
    let ws = single_cli(&[], &[("a.txt", "a")]);
    write_tree(&ws.working_copy("demo", "Claude"), &[("stale.txt", "old")]);
    let before = tree_digest(&ws.install_dir("Claude"));

    engine(&ws).import_from_install("demo", "Claude", false).unwrap();

    assert_eq!(paths(&read_tree(&ws.working_copy("demo", "Claude"))), vec!["a.txt"]);
    assert_eq!(tree_digest(&ws.install_dir("Claude")), before);
}

#[test]
fn import_stops_on_large_files_unless_skipped() {
    let ws = single_cli(&[], &[("big.bin", "0123456789"), ("small.txt", "1")]);
    write_tree(&ws.working_copy("demo", "Claude"), &[("keep.txt", "k")]);
    let engine = SyncOrchestrator::new(
        ws.layout().clone(),
        EngineConfig {
            large_file_threshold: 5,
            ..fast_config()
        },
    );

    let outcome = engine.import_from_install("demo", "Claude", false).unwrap();
    let ImportOutcome::LargeFilesFound { files } = outcome else {
        panic!("expected large files, got {outcome:?}");
    };
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "big.bin");
    assert_eq!(files[0].size, 10);
    assert!(ws.working_copy("demo", "Claude").join("keep.txt").exists());

    let outcome = engine.import_from_install("demo", "Claude", true).unwrap();
    assert!(outcome.is_imported());
    assert!(ws.working_copy("demo", "Claude").join("big.bin").exists());
}

#[test]
fn import_copies_additional_files_flat() {
    let ws = TestWorkspace::new();
    ws.set_global_rules(&["**"]);
    write_tree(&ws.outside("home"), &[(".claude.json", "{}")]);
    ws.register_cli_with_extras(
        "Claude",
        &[("settings.json", "{}")],
        vec![
            AdditionalPath::new("json", ws.outside("home/.claude.json")),
            AdditionalPath::new("gone", ws.outside("home/missing.md")),
        ],
    );
    ws.create_project("demo", &["Claude"]);

    let outcome = engine(&ws).import_from_install("demo", "Claude", false).unwrap();

    let ImportOutcome::Imported { warnings } = outcome else {
        panic!("import should succeed");
    };
    assert_eq!(paths(&read_tree(&ws.working_copy("demo", "Claude"))), vec![".claude.json"]);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("missing.md"));
}

#[test]
fn import_reports_not_found_without_touching_disk() {
    let ws = single_cli(&[], &[("a.txt", "a")]);
    let engine = engine(&ws);

    let no_project = engine.import_from_install("nope", "Claude", false).unwrap_err();
    let no_cli = engine.import_from_install("demo", "Codex", false).unwrap_err();

    assert_eq!(no_project.kind(), ErrorKind::NotFound);
    assert_eq!(no_cli.kind(), ErrorKind::NotFound);
    ws.assert_file_not_exists("Projects/nope");
}

#[test]
fn apply_backs_up_then_copies() {
    let ws = single_cli(&["*.log"], &[("settings.json", "old")]);
    write_tree(
        &ws.working_copy("demo", "Claude"),
        &[("settings.json", "new"), ("agents/a.md", "agent"), ("run.log", "log")],
    );
    let engine = engine(&ws);

    let report = engine.apply_to_install("demo", "Claude", None).unwrap();

    let install = ws.install_dir("Claude");
    assert_eq!(fs::read_to_string(install.join("settings.json")).unwrap(), "new");
    assert!(install.join("agents/a.md").is_file());
    assert!(!install.join("run.log").exists());

    let meta = engine.snapshots().get_meta("demo", &report.snapshot).unwrap();
    assert_eq!(meta.source, SnapshotSource::AutoApplyBackup);
    assert_eq!(meta.snapshot_type, SnapshotType::Full);
    let backed_up = engine.snapshots().snapshot_path("demo", &report.snapshot).join("Claude");
    assert_eq!(fs::read_to_string(backed_up.join("settings.json")).unwrap(), "old");
}

#[test]
fn apply_routes_additional_files_past_the_rules() {
    let ws = TestWorkspace::new();
    ws.set_global_rules(&["**", "!settings.json"]);
    let external = ws.outside("home/.claude.json");
    write_tree(&ws.outside("home"), &[(".claude.json", "old")]);
    ws.register_cli_with_extras(
        "Claude",
        &[],
        vec![AdditionalPath::new("json", &external)],
    );
    ws.create_project("demo", &["Claude"]);
    write_tree(
        &ws.working_copy("demo", "Claude"),
        &[(".claude.json", "new"), ("settings.json", "{}")],
    );

    engine(&ws).apply_to_install("demo", "Claude", None).unwrap();

    assert_eq!(fs::read_to_string(&external).unwrap(), "new");
    assert!(!ws.install_dir("Claude").join(".claude.json").exists());
    assert!(ws.install_dir("Claude").join("settings.json").exists());
}

#[test]
fn partial_apply_copies_selected_paths_and_warns_on_missing() {
    let ws = single_cli(&[], &[("keep.txt", "install")]);
    write_tree(
        &ws.working_copy("demo", "Claude"),
        &[("keep.txt", "wc"), ("skills/a/SKILL.md", "s"), ("other.txt", "o")],
    );
    let engine = engine(&ws);
    let selected = vec!["skills".to_string(), "gone.txt".to_string()];

    let report = engine.apply_to_install("demo", "Claude", Some(selected.as_slice())).unwrap();

    let install = ws.install_dir("Claude");
    assert!(install.join("skills/a/SKILL.md").is_file());
    assert!(!install.join("other.txt").exists());
    assert_eq!(fs::read_to_string(install.join("keep.txt")).unwrap(), "install");
    assert_eq!(report.warnings, vec!["Skipped missing path: gone.txt".to_string()]);
    let meta = engine.snapshots().get_meta("demo", &report.snapshot).unwrap();
    assert_eq!(meta.snapshot_type, SnapshotType::Partial);
}

#[test]
fn partial_apply_rejects_escaping_paths_before_backup() {
    let ws = single_cli(&[], &[("a.txt", "a")]);
    fs::create_dir_all(ws.working_copy("demo", "Claude")).unwrap();
    let engine = engine(&ws);

    for bad in ["../outside.txt", "/etc/passwd"] {
        let err = engine
            .apply_to_install("demo", "Claude", Some(&[bad.to_string()][..]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{bad}");
    }
    assert!(engine.list_snapshots("demo").unwrap().is_empty());
}

#[test]
fn failed_apply_rolls_back_byte_identical() {
    let ws = single_cli(
        &[],
        &[("0-first.txt", "original"), ("a.txt/inner.txt", "dir content"), ("z.txt", "z")],
    );
    // A file where the install path has a directory cannot be copied.
    write_tree(
        &ws.working_copy("demo", "Claude"),
        &[("0-first.txt", "changed"), ("a.txt", "file"), ("new.txt", "n")],
    );
    let before = read_tree(&ws.install_dir("Claude"));

    let err = engine(&ws).apply_to_install("demo", "Claude", None).unwrap_err();

    assert!(matches!(err, Error::ApplyRolledBack { .. }), "{err}");
    assert!(!err.is_critical());
    assert_eq!(read_tree(&ws.install_dir("Claude")), before);
}

#[cfg(unix)]
#[test]
fn rollback_leaves_symlinks_in_the_install_path() {
    let ws = single_cli(&[], &[("0.txt", "original"), ("d.txt/x", "dir content")]);
    let managed = ws.outside("dotfiles/real.md");
    write_tree(&ws.outside("dotfiles"), &[("real.md", "managed elsewhere")]);
    let link = ws.install_dir("Claude").join("CLAUDE.md");
    std::os::unix::fs::symlink(&managed, &link).unwrap();
    write_tree(
        &ws.working_copy("demo", "Claude"),
        &[("0.txt", "changed"), ("d.txt", "file")],
    );
    let before = read_tree(&ws.install_dir("Claude"));

    let err = engine(&ws).apply_to_install("demo", "Claude", None).unwrap_err();

    assert!(matches!(err, Error::ApplyRolledBack { .. }), "{err}");
    assert_eq!(fs::read_link(&link).unwrap(), managed);
    assert_eq!(read_tree(&ws.install_dir("Claude")), before);
    assert_eq!(fs::read_to_string(&managed).unwrap(), "managed elsewhere");
}

#[test]
fn backup_failure_aborts_apply_before_touching_install() {
    let ws = single_cli(&[], &[("a.txt", "orig")]);
    write_tree(&ws.working_copy("demo", "Claude"), &[("a.txt", "new")]);
    let backup_dir = ws.layout().backup_dir("demo").to_native();
    fs::remove_dir_all(&backup_dir).unwrap();
    fs::write(&backup_dir, "not a directory").unwrap();
    let before = tree_digest(&ws.install_dir("Claude"));

    let err = engine(&ws).apply_to_install("demo", "Claude", None).unwrap_err();

    assert!(matches!(err, Error::BackupFailed { .. }), "{err}");
    assert_eq!(err.kind(), ErrorKind::IoFatal);
    assert!(!err.is_critical());
    assert_eq!(tree_digest(&ws.install_dir("Claude")), before);
}

#[test]
fn rollback_without_its_snapshot_is_critical() {
    let ws = single_cli(&[], &[("a.txt/inner.txt", "dir content")]);
    write_tree(&ws.working_copy("demo", "Claude"), &[("a.txt", "file")]);
    // Keeping zero snapshots evicts the pre-apply backup as soon as it is written.
    let engine = SyncOrchestrator::new(
        ws.layout().clone(),
        EngineConfig {
            max_snapshots: 0,
            ..fast_config()
        },
    );

    let err = engine.apply_to_install("demo", "Claude", None).unwrap_err();

    let Error::RollbackFailed { rollback, .. } = &err else {
        panic!("expected a failed rollback, got {err}");
    };
    assert!(matches!(**rollback, Error::CliNotInSnapshot { .. }), "{rollback}");
    assert_eq!(err.kind(), ErrorKind::RollbackFailure);
    assert!(err.is_critical());
}

#[test]
fn restore_reproduces_snapshot_ignoring_rules() {
    let ws = single_cli(&["**"], &[("settings.json", "v1"), ("history.jsonl", "h")]);
    let engine = engine(&ws);
    let ts = engine.create_snapshot("demo", &[], Some("before")).unwrap();
    write_tree(&ws.install_dir("Claude"), &[("settings.json", "v2"), ("added.txt", "x")]);

    let report = engine.restore_from_snapshot("demo", &ts, None).unwrap();

    assert!(report.is_success());
    assert_eq!(report.restored, vec!["Claude".to_string()]);
    let tree = read_tree(&ws.install_dir("Claude"));
    assert_eq!(paths(&tree), vec!["history.jsonl", "settings.json"]);
    assert_eq!(tree["settings.json"], b"v1".to_vec());
}

#[test]
fn restore_puts_additional_files_back() {
    let ws = TestWorkspace::new();
    let external = ws.outside("home/.claude.json");
    write_tree(&ws.outside("home"), &[(".claude.json", "v1")]);
    ws.register_cli_with_extras("Claude", &[("a.txt", "a")], vec![AdditionalPath::new("json", &external)]);
    ws.create_project("demo", &["Claude"]);
    let engine = engine(&ws);
    let ts = engine.create_snapshot("demo", &[], None).unwrap();
    fs::write(&external, "v2").unwrap();

    engine.restore_from_snapshot("demo", &ts, Some("claude")).unwrap();

    assert_eq!(fs::read_to_string(&external).unwrap(), "v1");
    assert!(!ws.install_dir("Claude").join("_additionalFiles").exists());
}

#[test]
fn restore_keeps_install_content_named_like_the_extras_dir() {
    let ws = TestWorkspace::new();
    let external = ws.outside("home/.claude.json");
    write_tree(&ws.outside("home"), &[(".claude.json", "v1")]);
    ws.register_cli_with_extras(
        "Claude",
        &[("_additionalFiles/keep.txt", "mine"), ("a.txt", "a")],
        vec![AdditionalPath::new("json", &external)],
    );
    ws.create_project("demo", &["Claude"]);
    let engine = engine(&ws);
    let ts = engine.create_snapshot("demo", &[], None).unwrap();
    fs::remove_dir_all(ws.install_dir("Claude").join("_additionalFiles")).unwrap();
    fs::write(&external, "v2").unwrap();

    let report = engine.restore_from_snapshot("demo", &ts, None).unwrap();

    assert!(report.is_success());
    let tree = read_tree(&ws.install_dir("Claude"));
    assert_eq!(paths(&tree), vec!["_additionalFiles/keep.txt", "a.txt"]);
    assert_eq!(fs::read_to_string(&external).unwrap(), "v1");
}

#[test]
fn partial_snapshot_needs_a_cli_and_writes_nothing() {
    let ws = TestWorkspace::new();
    ws.register_cli("Claude", &[("a.txt", "a")]);
    ws.register_cli("Codex", &[("b.txt", "b")]);
    ws.create_project("demo", &["Claude", "Codex"]);
    let engine = engine(&ws);
    let ts = engine
        .create_snapshot("demo", &["Claude".to_string()], None)
        .unwrap();
    fs::write(ws.install_dir("Claude").join("a.txt"), "changed").unwrap();
    let before = tree_digest(&ws.install_dir("Claude"));

    let err = engine.restore_from_snapshot("demo", &ts, None).unwrap_err();

    assert!(matches!(err, Error::PartialRestore { .. }));
    assert_eq!(tree_digest(&ws.install_dir("Claude")), before);

    let report = engine.restore_from_snapshot("demo", &ts, Some("Claude")).unwrap();
    assert!(report.is_success());
    assert_eq!(fs::read_to_string(ws.install_dir("Claude").join("a.txt")).unwrap(), "a");
}

#[test]
fn full_restore_reports_each_cli_independently() {
    let ws = TestWorkspace::new();
    ws.register_cli("Claude", &[("a.txt", "a")]);
    ws.register_cli("Codex", &[("b.txt", "b")]);
    ws.create_project("demo", &["Claude", "Codex"]);
    let engine = engine(&ws);
    let ts = engine.create_snapshot("demo", &[], None).unwrap();

    // Claude's copy vanishes from the snapshot; Codex must still restore.
    fs::remove_dir_all(engine.snapshots().snapshot_path("demo", &ts).join("Claude")).unwrap();
    fs::write(ws.install_dir("Claude").join("a.txt"), "edited").unwrap();
    fs::write(ws.install_dir("Codex").join("b.txt"), "edited").unwrap();

    let report = engine.restore_from_snapshot("demo", &ts, None).unwrap();

    assert_eq!(report.restored, vec!["Codex".to_string()]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].cli, "Claude");
    assert_eq!(fs::read_to_string(ws.install_dir("Codex").join("b.txt")).unwrap(), "b");
    assert_eq!(
        fs::read_to_string(ws.install_dir("Claude").join("a.txt")).unwrap(),
        "edited",
        "a CLI missing from the snapshot is left alone"
    );
}

#[test]
fn restore_unknown_snapshot_is_not_found() {
    let ws = single_cli(&[], &[]);

    let err = engine(&ws)
        .restore_from_snapshot("demo", "20990101000000000", None)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn manual_backups_are_retained_five_deep() {
    let ws = single_cli(&[], &[("a.txt", "a")]);
    let engine = engine(&ws);

    let stamps: Vec<String> = (0..6)
        .map(|i| {
            let note = format!("#{i}");
            engine.create_snapshot("demo", &[], Some(note.as_str())).unwrap()
        })
        .collect();

    let listed = engine.list_snapshots("demo").unwrap();
    assert_eq!(listed.len(), 5);
    assert!(listed.iter().all(|m| m.timestamp != stamps[0]));
    assert_eq!(listed[0].notes, "#5");

    engine.delete_snapshot("demo", &stamps[5]).unwrap();
    assert_eq!(engine.list_snapshots("demo").unwrap().len(), 4);
}

#[test]
fn concurrent_operation_on_a_project_is_busy() {
    let ws = single_cli(&[], &[("a.txt", "a")]);
    let engine = engine(&ws);
    let _held = ProjectLock::acquire(ws.layout(), "demo").unwrap();

    let err = engine.import_from_install("demo", "Claude", false).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Busy);
    assert!(engine.create_snapshot("demo", &[], None).is_err());
}
