//! In-memory version-control backend.
//!
//! Models just enough of a repository (commits, branches, tags, an
//! index, a working tree, and the unborn-head states the integration
//! engine walks through) for the pipeline to run end to end without a
//! git binary. Tests and doctests build fixture "remote" repositories
//! with [`MemoryVcs::add_source`] and [`MemoryVcs::source_commit`], then
//! hand the backend to the orchestrator.
//!
//! Object ids are commit indices rendered as strings, so equality checks
//! behave like object-id comparisons in the real backend.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::vcs::{StagedTag, Vcs};

/// File tree snapshot: repository-relative path to blob content.
pub type Tree = BTreeMap<String, Vec<u8>>;

/// A commit in the in-memory object store.
#[derive(Debug, Clone)]
pub struct MemoryCommit {
    pub parents: Vec<usize>,
    pub tree: Tree,
    pub message: String,
}

/// Fixture standing in for a fetchable remote repository.
#[derive(Debug, Clone, Default)]
struct SourceRepo {
    branches: BTreeMap<String, usize>,
    tags: BTreeMap<String, usize>,
}

#[derive(Debug, Clone)]
struct Head {
    branch: String,
    born: bool,
}

/// In-memory implementation of the backend interface.
#[derive(Debug, Clone)]
pub struct MemoryVcs {
    commits: Vec<MemoryCommit>,
    sources: BTreeMap<String, SourceRepo>,
    remotes: BTreeMap<String, String>,
    fetched: BTreeMap<String, BTreeMap<String, usize>>,
    staged: BTreeMap<(String, String), usize>,
    branches: BTreeMap<String, usize>,
    tags: BTreeMap<String, usize>,
    head: Head,
    index: Tree,
    worktree: Tree,
    pending_merge: Option<usize>,
}

fn vcs_err(command: &str, stderr: impl Into<String>) -> Error {
    Error::VcsFailure {
        command: command.to_string(),
        stderr: stderr.into(),
    }
}

impl MemoryVcs {
    /// A fresh working copy whose initial branch is `primary`.
    ///
    /// The branch starts unborn, exactly like a just-initialized
    /// repository; commit once to seal it with a root commit.
    pub fn new(primary: &str) -> Self {
        Self {
            commits: Vec::new(),
            sources: BTreeMap::new(),
            remotes: BTreeMap::new(),
            fetched: BTreeMap::new(),
            staged: BTreeMap::new(),
            branches: BTreeMap::new(),
            tags: BTreeMap::new(),
            head: Head {
                branch: primary.to_string(),
                born: false,
            },
            index: Tree::new(),
            worktree: Tree::new(),
            pending_merge: None,
        }
    }

    /// Register a fixture repository reachable at `location`.
    pub fn add_source(&mut self, location: &str) {
        self.sources.entry(location.to_string()).or_default();
    }

    /// Advance `branch` of the fixture at `location` by one commit whose
    /// tree is exactly `files`. Returns the commit id.
    ///
    /// Panics if the fixture does not exist (test setup error).
    pub fn source_commit(
        &mut self,
        location: &str,
        branch: &str,
        files: &[(&str, &str)],
        message: &str,
    ) -> usize {
        let parent = self.sources[location].branches.get(branch).copied();
        let tree = files
            .iter()
            .map(|(path, content)| ((*path).to_string(), content.as_bytes().to_vec()))
            .collect();
        let id = self.push_commit(parent.into_iter().collect(), tree, message);
        self.sources
            .get_mut(location)
            .expect("fixture repository exists")
            .branches
            .insert(branch.to_string(), id);
        id
    }

    /// Tag `target` as `tag` in the fixture at `location`.
    pub fn source_tag(&mut self, location: &str, tag: &str, target: usize) {
        self.sources
            .get_mut(location)
            .expect("fixture repository exists")
            .tags
            .insert(tag.to_string(), target);
    }

    fn push_commit(&mut self, parents: Vec<usize>, tree: Tree, message: &str) -> usize {
        self.commits.push(MemoryCommit {
            parents,
            tree,
            message: message.to_string(),
        });
        self.commits.len() - 1
    }

    fn fetched_tip(&self, remote: &str, branch: &str) -> Result<usize> {
        self.fetched
            .get(remote)
            .and_then(|branches| branches.get(branch))
            .copied()
            .ok_or_else(|| vcs_err("merge", format!("unknown ref {}/{}", remote, branch)))
    }

    // --- inspection helpers for tests ---

    pub fn commit_by_id(&self, id: usize) -> &MemoryCommit {
        &self.commits[id]
    }

    pub fn branch_tip(&self, branch: &str) -> Option<usize> {
        self.branches.get(branch).copied()
    }

    pub fn branch_names(&self) -> Vec<String> {
        self.branches.keys().cloned().collect()
    }

    pub fn tag_names(&self) -> Vec<String> {
        self.tags.keys().cloned().collect()
    }

    pub fn tag_by_name(&self, tag: &str) -> Option<usize> {
        self.tags.get(tag).copied()
    }

    pub fn remote_names(&self) -> Vec<String> {
        self.remotes.keys().cloned().collect()
    }

    pub fn staging_is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Content of `path` at the tip of `branch`, if both exist.
    pub fn file_at(&self, branch: &str, path: &str) -> Option<&[u8]> {
        let tip = self.branch_tip(branch)?;
        self.commits[tip].tree.get(path).map(Vec::as_slice)
    }
}

impl Vcs for MemoryVcs {
    fn register_remote(&mut self, remote: &str, location: &str) -> Result<()> {
        // like the git backend, re-registering only updates the location
        self.remotes
            .insert(remote.to_string(), location.to_string());
        Ok(())
    }

    fn fetch(&mut self, remote: &str, tag_namespace: &str) -> Result<()> {
        let location = self
            .remotes
            .get(remote)
            .ok_or_else(|| vcs_err("fetch", format!("no such remote '{}'", remote)))?;
        let source = self
            .sources
            .get(location)
            .ok_or_else(|| vcs_err("fetch", format!("could not read from '{}'", location)))?;
        self.fetched
            .insert(remote.to_string(), source.branches.clone());
        for (tag, target) in source.tags.clone() {
            self.staged.insert((tag_namespace.to_string(), tag), target);
        }
        Ok(())
    }

    fn remote_branches(&self, remote: &str) -> Result<Vec<String>> {
        let branches = self
            .fetched
            .get(remote)
            .ok_or_else(|| vcs_err("for-each-ref", format!("remote '{}' not fetched", remote)))?;
        Ok(branches.keys().cloned().collect())
    }

    fn branch_exists(&self, branch: &str) -> Result<bool> {
        Ok(self.branches.contains_key(branch))
    }

    fn checkout(&mut self, branch: &str) -> Result<()> {
        let tip = self
            .branches
            .get(branch)
            .copied()
            .ok_or_else(|| vcs_err("checkout", format!("no such branch '{}'", branch)))?;
        self.head = Head {
            branch: branch.to_string(),
            born: true,
        };
        self.index = self.commits[tip].tree.clone();
        self.worktree = self.index.clone();
        self.pending_merge = None;
        Ok(())
    }

    fn reset_worktree(&mut self) -> Result<()> {
        if self.head.born {
            let tip = self.branches[&self.head.branch];
            self.index = self.commits[tip].tree.clone();
        } else {
            self.index.clear();
        }
        self.worktree = self.index.clone();
        Ok(())
    }

    fn create_orphan_branch(&mut self, branch: &str) -> Result<()> {
        // index and worktree deliberately survive, like `checkout --orphan`
        self.head = Head {
            branch: branch.to_string(),
            born: false,
        };
        self.pending_merge = None;
        Ok(())
    }

    fn clear_branch_content(&mut self) -> Result<()> {
        self.index.clear();
        self.worktree.clear();
        Ok(())
    }

    fn merge_ours(&mut self, remote: &str, branch: &str) -> Result<()> {
        let tip = self.fetched_tip(remote, branch)?;
        if self.head.born {
            // "ours": record the second parent, leave content untouched
            self.pending_merge = Some(tip);
        } else {
            // merge into an unborn head adopts the source tip outright
            self.branches.insert(self.head.branch.clone(), tip);
            self.head.born = true;
            self.index = self.commits[tip].tree.clone();
            self.worktree = self.index.clone();
        }
        Ok(())
    }

    fn graft_tree(&mut self, folder: &str, remote: &str, branch: &str) -> Result<()> {
        let tip = self.fetched_tip(remote, branch)?;
        let prefix = format!("{}/", folder.trim_end_matches('/'));
        self.index.retain(|path, _| !path.starts_with(&prefix));
        let tree = self.commits[tip].tree.clone();
        for (path, content) in tree {
            self.index.insert(format!("{}{}", prefix, path), content);
        }
        Ok(())
    }

    fn commit(&mut self, message: &str) -> Result<()> {
        let mut parents = Vec::new();
        if self.head.born {
            parents.push(self.branches[&self.head.branch]);
        }
        if let Some(merged) = self.pending_merge.take() {
            parents.push(merged);
        }
        let tree = self.index.clone();
        let id = self.push_commit(parents, tree, message);
        self.branches.insert(self.head.branch.clone(), id);
        self.head.born = true;
        Ok(())
    }

    fn staged_tags(&self) -> Result<Vec<StagedTag>> {
        Ok(self
            .staged
            .iter()
            .map(|((repository, name), target)| StagedTag {
                repository: repository.clone(),
                name: name.clone(),
                target: target.to_string(),
            })
            .collect())
    }

    fn tag_target(&self, tag: &str) -> Result<Option<String>> {
        Ok(self.tags.get(tag).map(usize::to_string))
    }

    fn create_tag(&mut self, tag: &str, target: &str) -> Result<()> {
        let id = target
            .parse()
            .map_err(|_| vcs_err("update-ref", format!("bad object id '{}'", target)))?;
        self.tags.insert(tag.to_string(), id);
        Ok(())
    }

    fn drop_staged_tags(&mut self) -> Result<()> {
        self.staged.clear();
        Ok(())
    }
}
