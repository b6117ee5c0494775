//! tests/runner_tests.rs
//!
//! Check discovery, execution and the daemon's startup path.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use serial_test::serial;
use status_checker::config::{CheckConfig, Config};
use status_checker::ops::StatusMetrics;
use status_checker::runner::{discover_checks, run_check, run_status_checker};
use tempfile::TempDir;

fn write_script(path: &Path, body: &str, mode: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

fn mode_of(path: &Path) -> u32 {
    fs::metadata(path).unwrap().permissions().mode() & 0o777
}

#[test]
fn test_discovers_only_shebang_scripts() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_script(&root.join("block-height"), "#!/bin/sh\nexit 0\n", 0o755);
    write_script(&root.join("nested/disk.sh"), "#!/bin/sh\nexit 0\n", 0o755);
    write_script(&root.join("_helper.sh"), "#!/bin/sh\nexit 0\n", 0o755);
    write_script(&root.join("README.md"), "# not a check\n", 0o644);
    write_script(&root.join("empty"), "", 0o755);
    write_script(&root.join("_lib/inner.sh"), "#!/bin/sh\nexit 0\n", 0o755);

    let names: Vec<_> = discover_checks(root, false).into_iter().map(|c| c.name).collect();

    // underscore directories are still walked, only underscore files are skipped
    assert_eq!(names, vec!["_lib/inner.sh", "block-height", "nested/disk.sh"]);
}

#[test]
fn test_discovery_chmod_adds_exec_bits() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("check.sh");
    let notes = dir.path().join("notes.txt");
    write_script(&script, "#!/bin/sh\nexit 0\n", 0o644);
    write_script(&notes, "plain text\n", 0o600);

    let untouched = discover_checks(dir.path(), false);
    assert_eq!(untouched.len(), 1);
    assert_eq!(mode_of(&script), 0o644);

    let checks = discover_checks(dir.path(), true);
    assert_eq!(checks.len(), 1);
    assert_eq!(checks[0].path, script);
    assert_eq!(mode_of(&script), 0o755);
    assert_eq!(mode_of(&notes), 0o711);
}

#[test]
fn test_discovery_skips_files_without_complete_first_line() {
    let dir = TempDir::new().unwrap();
    let unterminated = dir.path().join("unterminated.sh");
    let terminated = dir.path().join("terminated.sh");
    write_script(&unterminated, "#!/bin/sh", 0o644);
    write_script(&terminated, "#!/bin/sh\n", 0o644);

    let names: Vec<_> = discover_checks(dir.path(), true).into_iter().map(|c| c.name).collect();

    assert_eq!(names, vec!["terminated.sh"]);
    assert_eq!(mode_of(&terminated), 0o755);
    assert_eq!(mode_of(&unterminated), 0o644);
}

#[test]
fn test_discovery_of_missing_dir_is_empty() {
    assert!(discover_checks(Path::new("/no/such/checks"), false).is_empty());
}

#[tokio::test]
#[serial]
async fn test_run_check_reports_exit_status() {
    let dir = TempDir::new().unwrap();
    let ok = dir.path().join("ok.sh");
    let failing = dir.path().join("failing.sh");
    write_script(&ok, "#!/bin/sh\necho all good\necho warn >&2\nexit 0\n", 0o755);
    write_script(&failing, "#!/bin/sh\necho block_number: 0\nexit 1\n", 0o755);

    assert!(run_check(&ok, "ok.sh").await);
    assert!(!run_check(&failing, "failing.sh").await);
}

#[tokio::test]
#[serial]
async fn test_run_check_spawn_failure_is_false() {
    let dir = TempDir::new().unwrap();
    let not_executable = dir.path().join("plain.sh");
    write_script(&not_executable, "#!/bin/sh\nexit 0\n", 0o644);

    assert!(!run_check(&not_executable, "plain.sh").await);
    assert!(!run_check(&dir.path().join("missing.sh"), "missing.sh").await);
}

#[tokio::test]
async fn test_run_status_checker_without_checks_returns() {
    let dir = TempDir::new().unwrap();
    let config = Config { checks_dir: dir.path().to_path_buf(), ..Config::default() };
    let metrics = StatusMetrics::new().unwrap();

    run_status_checker(&config, metrics.clone()).await.unwrap();
    assert!(!metrics.export_metrics().unwrap().contains("status_check{"));
}

#[tokio::test]
#[serial]
async fn test_run_status_checker_skips_disabled_checks() {
    let dir = TempDir::new().unwrap();
    write_script(&dir.path().join("check.sh"), "#!/bin/sh\nexit 0\n", 0o755);

    let mut config = Config { checks_dir: dir.path().to_path_buf(), ..Config::default() };
    config
        .checks
        .insert("check.sh".to_string(), CheckConfig { enabled: Some(false), interval: None });
    let metrics = StatusMetrics::new().unwrap();

    run_status_checker(&config, metrics.clone()).await.unwrap();
    assert_eq!(metrics.count("check.sh", true), 0);
}
