//! Shared helpers for end-to-end tests.
//!
//! Fixtures here build real throwaway git repositories and run the
//! `monoweave` binary against them, with a hermetic git environment so
//! results do not depend on the machine's user configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Environment applied to every git process in a test, ours or git's.
const GIT_ENV: &[(&str, &str)] = &[
    ("GIT_AUTHOR_NAME", "e2e"),
    ("GIT_AUTHOR_EMAIL", "e2e@example.invalid"),
    ("GIT_COMMITTER_NAME", "e2e"),
    ("GIT_COMMITTER_EMAIL", "e2e@example.invalid"),
    ("GIT_CONFIG_NOSYSTEM", "1"),
    ("GIT_CONFIG_GLOBAL", "/dev/null"),
];

/// Command for the monoweave binary, rooted in `dir`.
pub fn monoweave(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("monoweave").expect("binary builds");
    cmd.current_dir(dir);
    for (key, value) in GIT_ENV {
        cmd.env(key, value);
    }
    cmd
}

/// Run a git command in `repo`, panicking on failure (fixture setup and
/// assertions only). Returns stdout.
#[allow(dead_code)]
pub fn git(repo: &Path, args: &[&str]) -> String {
    let mut cmd = Command::new("git");
    cmd.args(args).current_dir(repo);
    for (key, value) in GIT_ENV {
        cmd.env(key, value);
    }
    let output = cmd.output().expect("git runs");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Create a source repository with an initial commit on `branch`.
#[allow(dead_code)]
pub fn init_source_repo(root: &Path, name: &str, branch: &str, files: &[(&str, &str)]) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).expect("fixture directory");
    git(&dir, &["init", "-q", "-b", branch]);
    commit_files(&dir, files, "initial");
    dir
}

/// Write `files` into `repo` and commit them.
#[allow(dead_code)]
pub fn commit_files(repo: &Path, files: &[(&str, &str)], message: &str) {
    for (path, content) in files {
        let target = repo.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).expect("fixture directory");
        }
        fs::write(target, content).expect("fixture file");
    }
    git(repo, &["add", "-A"]);
    git(repo, &["commit", "-q", "-m", message]);
}

/// Create an empty source repository: initialized, no commits.
#[allow(dead_code)]
pub fn init_empty_repo(root: &Path, name: &str, branch: &str) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).expect("fixture directory");
    git(&dir, &["init", "-q", "-b", branch]);
    dir
}
