//! Branch integration: the history-preserving subtree graft.
//!
//! For every branch a repository publishes, the engine ensures a
//! destination branch exists, merges the source tip into it with the
//! "ours" strategy (ancestry without content), grafts the source tree
//! under the repository's folder prefix, and commits. Every step
//! tolerates being replayed, which is what makes `--continue` work.

use log::{debug, info};

use crate::error::Result;
use crate::repolist::RepoSpec;
use crate::vcs::Vcs;

/// Branch that keeps its name in the destination unless overridden.
pub const DEFAULT_PRIMARY_BRANCH: &str = "main";

/// Destination branch for a source branch.
///
/// The primary branch is the monorepo's own mainline and keeps its name;
/// every other branch is namespaced by repository so two repositories
/// publishing `feature` never collide. Pure and stable across runs.
pub fn destination_branch(primary: &str, repository: &str, branch: &str) -> String {
    if branch == primary {
        branch.to_string()
    } else {
        format!("{}/{}", repository, branch)
    }
}

/// Integrate every branch of one repository. Returns the branch count.
pub fn repository(vcs: &mut dyn Vcs, spec: &RepoSpec, primary: &str) -> Result<usize> {
    let remote = spec.remote();
    info!("{}: fetching from {}", spec.name, spec.location);
    vcs.register_remote(&remote, &spec.location)?;
    vcs.fetch(&remote, &spec.name)?;

    let branches = vcs.remote_branches(&remote)?;
    for source in &branches {
        branch(vcs, spec, &remote, source, primary)?;
    }
    Ok(branches.len())
}

/// Integrate a single (repository, branch) pair. Safe to replay.
pub fn branch(
    vcs: &mut dyn Vcs,
    spec: &RepoSpec,
    remote: &str,
    source: &str,
    primary: &str,
) -> Result<()> {
    let dest = destination_branch(primary, &spec.name, source);
    debug!("{}: integrating branch {} into {}", spec.name, source, dest);

    let fresh = if vcs.branch_exists(&dest)? {
        // an interrupted run must not leave residue under the next graft
        vcs.checkout(&dest)?;
        vcs.reset_worktree()?;
        false
    } else {
        vcs.create_orphan_branch(&dest)?;
        vcs.clear_branch_content()?;
        if dest == primary {
            // the mainline needs a commit for later grafts to merge into
            vcs.commit(super::ROOT_COMMIT_MESSAGE)?;
        }
        true
    };

    vcs.merge_ours(remote, source)?;
    if fresh && dest != primary {
        // merging into a history-less branch adopted the source tree at
        // the root; drop it so the graft is the only content
        vcs.clear_branch_content()?;
    }
    vcs.graft_tree(&spec.folder, remote, source)?;
    vcs.commit(&format!("Merge {}/{}", spec.name, source))?;
    Ok(())
}
