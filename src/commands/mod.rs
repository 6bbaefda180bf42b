//! # Command Implementations
//!
//! One module per CLI sub-command from spec.md §6. Each `run` function
//! takes an already-resolved [`crate::Repository`] handle (never the
//! process's current directory implicitly) and returns the value the CLI
//! prints, so the core stays callable from tests without going through
//! `main`.
//!
//! - `init`: create the repository layout
//! - `add`: stage files into the index
//! - `cat-file`: decompress and print an object, or dump the raw index
//! - `commit`: record a tree from the index
//! - `diff`: the three pairwise diffs plus branch/commit comparison
//! - `branch`: create a branch at the current commit
//! - `checkout`: switch the working copy/index to another branch
//! - `current_branch` / `latest_commit`: print resolved refs
//! - `merge`: three-way merge with fast-forward recognition

pub mod add;
pub mod branch;
pub mod cat_file;
pub mod checkout;
pub mod commit;
pub mod current_branch;
pub mod diff;
pub mod init;
pub mod latest_commit;
pub mod merge;
