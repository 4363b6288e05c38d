//! # Monoweave Library
//!
//! Core functionality for merging many independently-versioned git
//! repositories into a single monorepo while preserving full history:
//! every branch of every source repository becomes a branch in the
//! destination (namespaced by repository name, except the primary
//! branch), every commit's tree is relocated under a per-repository
//! folder, and tags are renamespaced to stay collision-free.
//!
//! ## Quick Example
//!
//! The pipeline is written against the [`vcs::Vcs`] backend interface,
//! so it can run against the in-memory model:
//!
//! ```
//! use monoweave::memory::MemoryVcs;
//! use monoweave::phases::orchestrator;
//! use monoweave::repolist::RepoSpec;
//! use monoweave::vcs::Vcs;
//!
//! let mut vcs = MemoryVcs::new("main");
//! vcs.add_source("https://example.com/libx.git");
//! vcs.source_commit(
//!     "https://example.com/libx.git",
//!     "main",
//!     &[("lib.rs", "pub fn x() {}")],
//!     "initial",
//! );
//!
//! // the mainline needs its root commit before the first merge
//! vcs.commit("Initialize monorepo").unwrap();
//!
//! let specs = vec![Ok(RepoSpec {
//!     location: "https://example.com/libx.git".to_string(),
//!     name: "libx".to_string(),
//!     folder: "libx".to_string(),
//! })];
//! let stats = orchestrator::run(&mut vcs, specs, "main").unwrap();
//!
//! assert_eq!(stats.repositories, 1);
//! assert!(vcs.file_at("main", "libx/lib.rs").is_some());
//! ```
//!
//! ## Core Concepts
//!
//! - **Repository list (`repolist`)**: the `location name [folder]` line
//!   format describing what to merge, parsed lazily in input order.
//! - **Backend interface (`vcs`)**: the narrow set of version-control
//!   primitives the pipeline drives, with a subprocess implementation
//!   (`git`) and an in-memory one (`memory`).
//! - **Phases (`phases`)**: init (bootstrap/resume), integrate (the
//!   branch engine), tags (the final flatten), and the orchestrator
//!   that sequences them.
//!
//! The binary in `src/main.rs` is a thin clap wrapper over this library.

pub mod error;
pub mod git;
pub mod memory;
pub mod output;
pub mod phases;
pub mod repolist;
pub mod vcs;

#[cfg(test)]
mod naming_proptest;
