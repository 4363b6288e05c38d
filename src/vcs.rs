//! Version-control backend interface.
//!
//! The integration pipeline never touches git directly; it drives a
//! backend through this narrow trait. The production backend
//! ([`crate::git::GitVcs`]) spawns the system git binary, and
//! [`crate::memory::MemoryVcs`] models the same semantics in memory so
//! the orchestration policy can be tested without a working copy.
//!
//! The methods map one-to-one onto the primitives the pipeline needs, in
//! the order it needs them: register and fetch a remote (tags land
//! directly in a per-repository staging namespace), enumerate its
//! branches, prepare a destination branch, merge/graft/commit, and
//! finally flatten the staged tags.

use crate::error::Result;

/// A tag parked in the staging namespace during fetch.
///
/// Lives under its owning repository's key until the final flatten moves
/// it into the global tag namespace under a collision-free name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedTag {
    /// Name of the repository the tag was fetched from.
    pub repository: String,
    /// Tag name exactly as published by the source repository.
    pub name: String,
    /// Object the tag points at, in backend-native form.
    pub target: String,
}

/// Capabilities the integration pipeline requires of a backend.
///
/// Every operation is synchronous and blocking; a failure is fatal for
/// the whole run (there is no retry protocol).
pub trait Vcs {
    /// Register `remote` as an alias for `location`.
    ///
    /// Re-registering an existing alias must be permitted (resumed runs
    /// replay this) and updates the location.
    fn register_remote(&mut self, remote: &str, location: &str) -> Result<()>;

    /// Fetch branches from `remote`.
    ///
    /// The remote's tags are placed directly into the staging namespace
    /// under `tag_namespace`, never into the global tag namespace.
    fn fetch(&mut self, remote: &str, tag_namespace: &str) -> Result<()>;

    /// Branch names a fetched remote published. Order carries no meaning.
    fn remote_branches(&self, remote: &str) -> Result<Vec<String>>;

    /// Does `branch` resolve to a commit?
    fn branch_exists(&self, branch: &str) -> Result<bool>;

    /// Check out an existing branch, discarding local differences.
    fn checkout(&mut self, branch: &str) -> Result<()>;

    /// Force the working tree and index to match the checked-out tip
    /// exactly, removing untracked content.
    fn reset_worktree(&mut self) -> Result<()>;

    /// Create `branch` with no history and switch to it.
    fn create_orphan_branch(&mut self, branch: &str) -> Result<()>;

    /// Empty the index and working tree, tolerating nothing-to-clear.
    fn clear_branch_content(&mut self) -> Result<()>;

    /// Merge the fetched tip of `remote`/`branch` with strategy "ours":
    /// no commit is created, existing content wins, unrelated histories
    /// are permitted. On a history-less branch the backend may instead
    /// adopt the source tip outright (merge into an unborn head).
    fn merge_ours(&mut self, remote: &str, branch: &str) -> Result<()>;

    /// Read the fetched tip's tree into the index under `folder/`,
    /// replacing whatever the index held beneath that prefix.
    fn graft_tree(&mut self, folder: &str, remote: &str, branch: &str) -> Result<()>;

    /// Commit the index on the current branch. Empty commits are allowed;
    /// a merge in progress contributes its second parent.
    fn commit(&mut self, message: &str) -> Result<()>;

    /// Every tag currently parked in the staging namespace.
    fn staged_tags(&self) -> Result<Vec<StagedTag>>;

    /// Object a global tag points at, if the tag exists.
    fn tag_target(&self, tag: &str) -> Result<Option<String>>;

    /// Create a global tag pointing at `target`.
    fn create_tag(&mut self, tag: &str, target: &str) -> Result<()>;

    /// Delete the staging namespace entirely.
    fn drop_staged_tags(&mut self) -> Result<()>;
}
