//! CLI integration tests for migrations-gen.
//!
//! These tests verify command-line argument parsing, help output,
//! and exit codes for configuration error conditions.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a command for the migrations-gen binary.
fn cmd() -> Command {
    Command::cargo_bin("migrations-gen").unwrap()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("health-check"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_generate_subcommand_help() {
    cmd()
        .args(["generate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--tables"))
        .stdout(predicate::str::contains("--ignore"))
        .stdout(predicate::str::contains("--squash"))
        .stdout(predicate::str::contains("--skip-views"))
        .stdout(predicate::str::contains("--default-index-names"))
        .stdout(predicate::str::contains("--default-fk-names"))
        .stdout(predicate::str::contains("--use-db-collation"))
        .stdout(predicate::str::contains("--table-filename"));
}

#[test]
fn test_init_subcommand_help() {
    cmd()
        .args(["init", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--force"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("migrations-gen"));
}

// =============================================================================
// Global Flags Tests
// =============================================================================

#[test]
fn test_output_json_flag_exists() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--output-json"));
}

#[test]
fn test_log_format_flag_exists() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--log-format"))
        .stdout(predicate::str::contains("[default: text]"));
}

#[test]
fn test_verbosity_flag_exists() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--verbosity"))
        .stdout(predicate::str::contains("[default: info]"));
}

// =============================================================================
// Exit Code Tests
// =============================================================================

#[test]
fn test_missing_config_file_exits_with_io_code() {
    cmd()
        .args(["--config", "/nonexistent/config.yaml", "generate"])
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_invalid_config_exits_with_config_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(
        &path,
        "connection:\n  type: sqlite\n  host: localhost\n  database: app\n  user: root\n",
    )
    .unwrap();

    cmd()
        .args(["--config", path.to_str().unwrap(), "generate"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Unknown database type"));
}

#[test]
fn test_unknown_subcommand_fails() {
    cmd().arg("frobnicate").assert().failure();
}
