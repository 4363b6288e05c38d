//! Orchestrator for the complete integration run.
//!
//! Sequences the integrate and tags phases over an already-prepared
//! working copy: repositories strictly in list order, branches one at a
//! time, the tag flatten once at the end, and a final checkout of the
//! primary branch. Single-threaded throughout: one working tree, one
//! index, one set of refs.

use log::info;

use super::{integrate, tags};
use crate::error::Result;
use crate::repolist::RepoSpec;
use crate::vcs::Vcs;

/// Counts reported after a completed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub repositories: usize,
    pub branches: usize,
    pub tags: usize,
}

/// Execute the complete integration over `specs`.
///
/// Each spec is integrated as soon as it is parsed; a malformed line
/// therefore aborts before its entry causes any backend call, while
/// earlier entries remain integrated (recoverable with `--continue`
/// after fixing the list).
pub fn run<I>(vcs: &mut dyn Vcs, specs: I, primary: &str) -> Result<RunStats>
where
    I: IntoIterator<Item = Result<RepoSpec>>,
{
    let mut stats = RunStats::default();
    for spec in specs {
        let spec = spec?;
        stats.branches += integrate::repository(vcs, &spec, primary)?;
        stats.repositories += 1;
        info!("{}: integrated", spec.name);
    }

    stats.tags = tags::flatten(vcs)?;

    vcs.checkout(primary)?;
    vcs.reset_worktree()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::memory::MemoryVcs;
    use crate::phases::ROOT_COMMIT_MESSAGE;

    fn spec(location: &str, name: &str) -> Result<RepoSpec> {
        Ok(RepoSpec {
            location: location.to_string(),
            name: name.to_string(),
            folder: name.to_string(),
        })
    }

    fn two_repo_fixture() -> MemoryVcs {
        let mut vcs = MemoryVcs::new("main");
        vcs.commit(ROOT_COMMIT_MESSAGE).unwrap();

        vcs.add_source("a.git");
        let a_tip = vcs.source_commit("a.git", "main", &[("a.txt", "a")], "initial");
        vcs.source_commit("a.git", "dev", &[("dev.txt", "dev")], "initial");
        vcs.source_tag("a.git", "v1.2.3", a_tip);

        vcs.add_source("b.git");
        let b_tip = vcs.source_commit("b.git", "main", &[("b.txt", "b")], "initial");
        vcs.source_tag("b.git", "release-7", b_tip);
        vcs
    }

    #[test]
    fn test_full_run_over_two_repositories() {
        let mut vcs = two_repo_fixture();

        let stats = run(
            &mut vcs,
            vec![spec("a.git", "a"), spec("b.git", "b")],
            "main",
        )
        .unwrap();

        assert_eq!(
            stats,
            RunStats {
                repositories: 2,
                branches: 3,
                tags: 2,
            }
        );
        assert_eq!(
            vcs.branch_names(),
            vec!["a/dev".to_string(), "main".to_string()]
        );
        assert_eq!(vcs.file_at("main", "a/a.txt"), Some(b"a".as_ref()));
        assert_eq!(vcs.file_at("main", "b/b.txt"), Some(b"b".as_ref()));
        assert_eq!(vcs.file_at("a/dev", "a/dev.txt"), Some(b"dev".as_ref()));
        assert_eq!(
            vcs.tag_names(),
            vec!["a-1.2.3".to_string(), "b-release-7".to_string()]
        );
        assert!(vcs.staging_is_empty());
    }

    #[test]
    fn test_rerun_converges_on_identical_refs_and_trees() {
        let mut vcs = two_repo_fixture();
        let specs = || vec![spec("a.git", "a"), spec("b.git", "b")];

        run(&mut vcs, specs(), "main").unwrap();
        let branches = vcs.branch_names();
        let tags = vcs.tag_names();
        let main_tree = vcs
            .commit_by_id(vcs.branch_tip("main").unwrap())
            .tree
            .clone();

        run(&mut vcs, specs(), "main").unwrap();

        assert_eq!(vcs.branch_names(), branches);
        assert_eq!(vcs.tag_names(), tags);
        assert_eq!(
            vcs.commit_by_id(vcs.branch_tip("main").unwrap()).tree,
            main_tree
        );
        assert!(vcs.staging_is_empty());
    }

    #[test]
    fn test_invalid_spec_aborts_before_backend_calls() {
        let mut vcs = MemoryVcs::new("main");
        vcs.commit(ROOT_COMMIT_MESSAGE).unwrap();

        let bad: Result<RepoSpec> = Err(Error::InvalidSpec {
            line: 1,
            message: "repository name 'x/y' must not contain '/'".to_string(),
        });
        let err = run(&mut vcs, vec![bad], "main").unwrap_err();

        assert!(matches!(err, Error::InvalidSpec { .. }));
        assert!(vcs.remote_names().is_empty());
    }

    #[test]
    fn test_earlier_entries_survive_a_later_bad_line() {
        let mut vcs = two_repo_fixture();

        let bad: Result<RepoSpec> = Err(Error::InvalidSpec {
            line: 2,
            message: "missing repository name".to_string(),
        });
        let result = run(&mut vcs, vec![spec("a.git", "a"), bad], "main");

        assert!(result.is_err());
        assert_eq!(vcs.remote_names(), vec!["a-origin".to_string()]);
        assert!(vcs.branch_tip("a/dev").is_some());
    }
}
