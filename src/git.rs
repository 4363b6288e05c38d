//! Git subprocess backend.
//!
//! Drives the system `git` binary with the monorepo working copy as the
//! current directory. Using the installed git (rather than an embedded
//! library) means SSH keys, credential helpers, proxies, and anything
//! else configured in `~/.gitconfig` work without any code here.
//!
//! Failed commands surface as [`Error::VcsFailure`] carrying the command
//! line and captured stderr.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use log::debug;

use crate::error::{Error, Result};
use crate::vcs::{StagedTag, Vcs};

/// Ref namespace where fetched tags are parked until the final flatten.
///
/// Keyed by repository name: `refs/namespaced-tags/<name>/<tag>`.
const STAGING_NAMESPACE: &str = "refs/namespaced-tags";

/// Backend implementation running git as a subprocess.
#[derive(Debug)]
pub struct GitVcs {
    workdir: PathBuf,
    tmpdir: Option<PathBuf>,
}

impl GitVcs {
    /// Wrap an existing (or about-to-be-initialized) working copy.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            tmpdir: None,
        }
    }

    /// Hand `TMPDIR` to every spawned git process.
    pub fn with_tmpdir(mut self, tmpdir: Option<PathBuf>) -> Self {
        self.tmpdir = tmpdir;
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Initialize a fresh repository whose initial branch is `primary`.
    pub fn init(&mut self, primary: &str) -> Result<()> {
        self.run(&["init", "--quiet", "--initial-branch", primary])?;
        Ok(())
    }

    /// Spawn git and collect its output without judging the exit status.
    fn output(&self, args: &[&str]) -> Result<Output> {
        debug!("git {}", args.join(" "));
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(&self.workdir);
        if let Some(tmpdir) = &self.tmpdir {
            cmd.env("TMPDIR", tmpdir);
        }
        cmd.output().map_err(|e| Error::VcsFailure {
            command: args.join(" "),
            stderr: e.to_string(),
        })
    }

    /// Spawn git and fail on a non-zero exit.
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(Error::VcsFailure {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Resolve a fully-qualified ref to an object id.
    ///
    /// A ref that does not exist is `None`; rev-parse reports that only
    /// through its exit status.
    fn resolve(&self, refname: &str) -> Result<Option<String>> {
        let output = self.output(&["rev-parse", "--quiet", "--verify", refname])?;
        if output.status.success() {
            Ok(Some(
                String::from_utf8_lossy(&output.stdout).trim().to_string(),
            ))
        } else {
            Ok(None)
        }
    }
}

/// Split a `for-each-ref` line from the staging namespace into a tag.
///
/// Input shape: `refs/namespaced-tags/<repository>/<tag> <objectname>`,
/// where `<tag>` itself may contain `/`.
fn parse_staged_ref(line: &str) -> Option<StagedTag> {
    let (refname, target) = line.split_once(' ')?;
    let rest = refname.strip_prefix(STAGING_NAMESPACE)?.strip_prefix('/')?;
    let (repository, name) = rest.split_once('/')?;
    Some(StagedTag {
        repository: repository.to_string(),
        name: name.to_string(),
        target: target.to_string(),
    })
}

impl Vcs for GitVcs {
    fn register_remote(&mut self, remote: &str, location: &str) -> Result<()> {
        match self.run(&["remote", "add", remote, location]) {
            Ok(_) => Ok(()),
            // a resumed run finds the remote already registered
            Err(Error::VcsFailure { stderr, .. }) if stderr.contains("already exists") => {
                self.run(&["remote", "set-url", remote, location])?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn fetch(&mut self, remote: &str, tag_namespace: &str) -> Result<()> {
        let branches = format!("+refs/heads/*:refs/remotes/{}/*", remote);
        let tags = format!(
            "+refs/tags/*:{}/{}/*",
            STAGING_NAMESPACE, tag_namespace
        );
        self.run(&["fetch", "--quiet", "--no-tags", remote, &branches, &tags])?;
        Ok(())
    }

    fn remote_branches(&self, remote: &str) -> Result<Vec<String>> {
        let namespace = format!("refs/remotes/{}", remote);
        let output = self.run(&["for-each-ref", "--format=%(refname:lstrip=3)", &namespace])?;
        Ok(output
            .lines()
            .filter(|name| !name.is_empty() && *name != "HEAD")
            .map(str::to_string)
            .collect())
    }

    fn branch_exists(&self, branch: &str) -> Result<bool> {
        Ok(self.resolve(&format!("refs/heads/{}", branch))?.is_some())
    }

    fn checkout(&mut self, branch: &str) -> Result<()> {
        self.run(&["checkout", "--quiet", "--force", branch])?;
        Ok(())
    }

    fn reset_worktree(&mut self) -> Result<()> {
        self.run(&["reset", "--quiet", "--hard", "HEAD"])?;
        self.run(&["clean", "-ffdq"])?;
        Ok(())
    }

    fn create_orphan_branch(&mut self, branch: &str) -> Result<()> {
        self.run(&["checkout", "--quiet", "--orphan", branch])?;
        Ok(())
    }

    fn clear_branch_content(&mut self) -> Result<()> {
        // a branch that never had content makes git rm unhappy; that case
        // is fine, the branch is already clear
        let _ = self.output(&["rm", "-r", "-f", "-q", "--ignore-unmatch", "."])?;
        self.run(&["clean", "-ffdq"])?;
        Ok(())
    }

    fn merge_ours(&mut self, remote: &str, branch: &str) -> Result<()> {
        let source = format!("refs/remotes/{}/{}", remote, branch);
        self.run(&[
            "merge",
            "--quiet",
            "--no-commit",
            "-s",
            "ours",
            "--allow-unrelated-histories",
            &source,
        ])?;
        Ok(())
    }

    fn graft_tree(&mut self, folder: &str, remote: &str, branch: &str) -> Result<()> {
        let folder = folder.trim_end_matches('/');
        let source = format!("refs/remotes/{}/{}", remote, branch);
        // read-tree refuses to overwrite index entries, so an earlier
        // graft of the same prefix (a replayed run) is dropped first
        let _ = self.output(&[
            "rm", "-r", "-f", "-q", "--cached", "--ignore-unmatch", "--", folder,
        ])?;
        let prefix = format!("--prefix={}/", folder);
        self.run(&["read-tree", &prefix, &source])?;
        Ok(())
    }

    fn commit(&mut self, message: &str) -> Result<()> {
        self.run(&[
            "commit",
            "--quiet",
            "--no-verify",
            "--allow-empty",
            "-m",
            message,
        ])?;
        Ok(())
    }

    fn staged_tags(&self) -> Result<Vec<StagedTag>> {
        let output = self.run(&[
            "for-each-ref",
            "--format=%(refname) %(objectname)",
            STAGING_NAMESPACE,
        ])?;
        Ok(output.lines().filter_map(parse_staged_ref).collect())
    }

    fn tag_target(&self, tag: &str) -> Result<Option<String>> {
        self.resolve(&format!("refs/tags/{}", tag))
    }

    fn create_tag(&mut self, tag: &str, target: &str) -> Result<()> {
        self.run(&["update-ref", &format!("refs/tags/{}", tag), target])?;
        Ok(())
    }

    fn drop_staged_tags(&mut self) -> Result<()> {
        for tag in self.staged_tags()? {
            let refname = format!("{}/{}/{}", STAGING_NAMESPACE, tag.repository, tag.name);
            self.run(&["update-ref", "-d", &refname])?;
        }
        Ok(())
    }
}
