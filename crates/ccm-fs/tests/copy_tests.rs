//! Tests for the retrying single-file copy

use ccm_fs::{Error, RobustnessConfig, io};
use std::fs;
use std::time::{Duration, Instant};
use tempfile::tempdir;

fn quick_retries() -> RobustnessConfig {
    RobustnessConfig {
        max_attempts: 3,
        retry_delay: Duration::from_millis(20),
        enable_fsync: false,
    }
}

#[test]
fn copy_overwrites_existing_destination() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("settings.json");
    let dest = dir.path().join("install").join("settings.json");
    fs::write(&src, "new").unwrap();
    fs::create_dir_all(dest.parent().unwrap()).unwrap();
    fs::write(&dest, "old contents").unwrap();

    io::copy_file(&src, &dest, quick_retries()).unwrap();

    assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
}

#[test]
fn copy_onto_directory_is_fatal_and_immediate() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("a.txt");
    let dest = dir.path().join("dest");
    fs::write(&src, "x").unwrap();
    fs::create_dir_all(&dest).unwrap();

    let started = Instant::now();
    let err = io::copy_file(&src, &dest, quick_retries()).unwrap_err();

    match &err {
        Error::CopyFailed { src: s, dest: d, .. } => {
            assert_eq!(s, &src);
            assert_eq!(d, &dest);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("a.txt"), "error names the file: {err}");
    assert!(started.elapsed() < Duration::from_millis(500));
}

#[cfg(unix)]
mod unix_tests {
    use super::*;
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    fn is_root() -> bool {
        match std::process::Command::new("id").arg("-u").output() {
            Ok(output) => String::from_utf8_lossy(&output.stdout).trim() == "0",
            Err(_) => false,
        }
    }

    #[test]
    fn readonly_destination_is_cleared_on_retry() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("config.toml");
        let dest = dir.path().join("installed.toml");
        fs::write(&src, "fresh = true").unwrap();
        fs::write(&dest, "stale = true").unwrap();
        fs::set_permissions(&dest, Permissions::from_mode(0o444)).unwrap();

        io::copy_file(&src, &dest, quick_retries()).unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "fresh = true");
    }

    #[test]
    fn persistent_permission_error_exhausts_retries() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let dir = tempdir().unwrap();
        let src = dir.path().join("a.txt");
        fs::write(&src, "x").unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, Permissions::from_mode(0o555)).unwrap();

        let started = Instant::now();
        let result = io::copy_file(&src, &locked.join("a.txt"), quick_retries());

        fs::set_permissions(&locked, Permissions::from_mode(0o755)).unwrap();

        match result {
            Err(Error::CopyFailed { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("expected CopyFailed, got {other:?}"),
        }
        assert!(started.elapsed() >= Duration::from_millis(40), "two delays were observed");
    }
}
