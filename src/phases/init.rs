//! Working-copy bootstrap and resume handling.
//!
//! Decides between a fresh initialization and re-entering an existing
//! working copy. Nothing here inspects how far a previous run progressed;
//! continuing is safe because every later step is replay-safe.

use std::fs;
use std::path::Path;

use log::info;

use crate::error::{Error, Result};
use crate::git::GitVcs;
use crate::vcs::Vcs;

/// Open the working copy at `target`.
///
/// Fresh mode refuses an existing directory; it initializes a repository
/// whose initial branch is `primary` and seals that branch with an empty
/// root commit, so the mainline has a commit before the first repository
/// is integrated. Resume mode refuses a missing directory and otherwise
/// takes the working copy as it stands.
pub fn prepare(
    target: &Path,
    primary: &str,
    resume: bool,
    tmpdir: Option<&Path>,
) -> Result<GitVcs> {
    let tmpdir = tmpdir.map(Path::to_path_buf);
    if resume {
        if !target.is_dir() {
            return Err(Error::TargetMissing {
                path: target.display().to_string(),
            });
        }
        info!("continuing in {}", target.display());
        Ok(GitVcs::new(target).with_tmpdir(tmpdir))
    } else {
        if target.exists() {
            return Err(Error::TargetExists {
                path: target.display().to_string(),
            });
        }
        info!("initializing monorepo in {}", target.display());
        fs::create_dir_all(target)?;
        let mut vcs = GitVcs::new(target).with_tmpdir(tmpdir);
        vcs.init(primary)?;
        vcs.commit(super::ROOT_COMMIT_MESSAGE)?;
        Ok(vcs)
    }
}
