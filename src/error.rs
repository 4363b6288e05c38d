//! # Error Handling
//!
//! Centralized error handling for `monoweave`, built on `thiserror`. Every
//! failure mode of a run is represented here, and all of them are fatal:
//! the tool never retries, and never reports partial success. The working
//! copy is left exactly as of the last completed git operation, which is
//! what makes `--continue` (replay with idempotent steps) the recovery
//! path instead of automatic retry.
//!
//! The `Result<T>` alias is used throughout the library.

use thiserror::Error;

/// Main error type for monoweave operations
#[derive(Error, Debug)]
pub enum Error {
    /// A malformed line in the repository list.
    ///
    /// Carries the 1-based line number. Repository names double as remote
    /// aliases and tag-namespace prefixes, so a bad one poisons every
    /// later step and the whole run aborts.
    #[error("Invalid repository line {line}: {message}")]
    InvalidSpec { line: usize, message: String },

    /// A fresh run was requested but the destination directory exists.
    #[error("Target directory already exists: {path} (use --continue to resume)")]
    TargetExists { path: String },

    /// A resumed run was requested but there is nothing to resume.
    #[error("Target directory not found: {path} (nothing to continue)")]
    TargetMissing { path: String },

    /// An underlying version-control operation returned non-success.
    #[error("Git command failed: git {command} - {stderr}")]
    VcsFailure { command: String, stderr: String },

    /// Two staged tags normalized to the same final name but point at
    /// different objects.
    #[error("Tag collision: {tag} already points at {existing}, refusing to repoint it at {incoming}")]
    TagCollision {
        tag: String,
        existing: String,
        incoming: String,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
