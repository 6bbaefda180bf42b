//! Typed domain errors.
//!
//! Most operations in this crate propagate failures as `anyhow::Result`,
//! matching the rest of the command layer. `RitError` exists for the
//! handful of conditions callers need to match on rather than just print
//! (missing objects, merge conflicts, precondition failures) and is raised
//! via `anyhow::Error::from` / `?` like any other error source.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RitError {
    #[error("fatal: not a rit repository (or any of the parent directories): .rit")]
    NotARepository,

    #[error("fatal: not a valid object name: '{0}'")]
    ObjectNotFound(String),

    #[error("error: branch '{0}' not found")]
    BranchNotFound(String),

    #[error("fatal: a branch named '{0}' already exists")]
    BranchAlreadyExists(String),

    #[error("fatal: no branch is currently checked out")]
    DetachedHead,

    #[error("fatal: cannot checkout '{0}': already on that branch")]
    AlreadyOnBranch(String),

    #[error("error: your local changes would be overwritten; commit or stash them first")]
    DirtyWorkingTree,

    #[error("merge conflict in: {}", .0.join(", "))]
    MergeConflict(Vec<String>),

    #[error("fatal: branch '{0}' has no commits")]
    EmptyBranch(String),
}
