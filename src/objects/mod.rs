//! # Object Types
//!
//! The three object kinds stored in the content-addressed object database.
//!
//! ### Blob
//! `blob\0<size>\0<raw file contents>`
//!
//! ### Tree
//! Newline-separated `<mode>\0<kind>\0<hash>\0<name>` entries, `kind` being
//! `tree` or `blob`. Hashes are hex text, not raw bytes.
//!
//! ### Commit
//! `tree\0<tree-hash>\n` followed by 0-2 `parent\0<hash>\n` lines, then a
//! single-quoted message. No author/committer/timestamp fields.

pub mod blob;
pub mod commit;
pub mod tree;

pub use blob::Blob;
pub use commit::Commit;
pub use tree::{DirTree, Tree, TreeEntry};
