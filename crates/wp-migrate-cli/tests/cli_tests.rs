//! CLI integration tests for wp-migrate.
//!
//! These tests verify command-line argument parsing, help output,
//! and exit codes for pre-flight error conditions.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a command for the wp-migrate binary.
fn cmd() -> Command {
    Command::cargo_bin("wp-migrate").unwrap()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_dotted_keys() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--source.dir"))
        .stdout(predicate::str::contains("--target.url"))
        .stdout(predicate::str::contains("--target.ftp.host"))
        .stdout(predicate::str::contains("--target.ftp.user"))
        .stdout(predicate::str::contains("--target.ftp.password"))
        .stdout(predicate::str::contains("--target.ftp.dir"));
}

#[test]
fn test_help_shows_skip_flags() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--skip-content"))
        .stdout(predicate::str::contains("--skip-database"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wp-migrate"));
}

// =============================================================================
// Pre-flight Failure Tests
// =============================================================================

#[test]
fn test_invalid_source_installation_is_a_config_error() {
    cmd()
        .args([
            "--non-interactive",
            "--source.dir",
            "/definitely/not/a/wordpress/root",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid source WordPress installation"));
}

#[test]
fn test_unknown_flag_is_rejected() {
    cmd()
        .arg("--definitely-not-a-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// =============================================================================
// Scheme Normalization (observable through the config error path)
// =============================================================================

#[test]
fn test_source_dir_with_marker_file_passes_preflight() {
    // A directory that has the marker file but no reachable database: the
    // run must get past configuration and fail later, on the source
    // database connection.
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("wp-config.php"),
        "define('DB_NAME', 'wp');define('DB_USER', 'u');\
define('DB_PASSWORD', 'p');define('DB_HOST', '127.0.0.1:1');",
    )
    .unwrap();

    cmd()
        .args(["--non-interactive", "--source.dir"])
        .arg(dir.path())
        .args(["--target.url", "example.com", "--skip-content"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Connection error"));
}
