//! End-to-end tests for CLI exit codes.
//!
//! - Exit code 0: success
//! - Exit code 1: any fatal run error (bad list, target conflicts, git)
//! - Exit code 2: invalid command-line usage (handled by clap)

use predicates::prelude::*;

mod common;

#[test]
fn test_exit_code_help() {
    let temp = assert_fs::TempDir::new().unwrap();
    common::monoweave(temp.path()).arg("--help").assert().code(0);
}

#[test]
fn test_exit_code_version() {
    let temp = assert_fs::TempDir::new().unwrap();
    common::monoweave(temp.path())
        .arg("--version")
        .assert()
        .code(0);
}

#[test]
fn test_exit_code_usage_unknown_flag() {
    let temp = assert_fs::TempDir::new().unwrap();
    common::monoweave(temp.path())
        .arg("--definitely-not-a-flag")
        .assert()
        .code(2);
}

#[test]
fn test_create_refuses_existing_target() {
    let temp = assert_fs::TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("mono")).unwrap();

    common::monoweave(temp.path())
        .args(["create", "--name", "mono"])
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_continue_refuses_missing_target() {
    let temp = assert_fs::TempDir::new().unwrap();

    common::monoweave(temp.path())
        .args(["create", "--continue", "--name", "mono"])
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nothing to continue"));
}

#[test]
fn test_invalid_name_aborts_before_any_remote_is_registered() {
    let temp = assert_fs::TempDir::new().unwrap();

    common::monoweave(temp.path())
        .args(["create", "--name", "mono"])
        .write_stdin("https://example.com/x.git bad/name\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("must not contain '/'"));

    // the working copy was initialized, but the bad entry never touched it
    let remotes = common::git(&temp.path().join("mono"), &["remote"]);
    assert_eq!(remotes.trim(), "");
}
