//! Commit Graph (component F): creating commits and walking ancestry.
//!
//! The ancestry walk returns an explicit tree rather than relying on a
//! mutable default argument to accumulate visited commits across calls
//! (the original source's pattern, re-architected per spec §9): the
//! `visited` set is always supplied fresh by the caller.

use std::collections::HashSet;

use anyhow::Result;

use crate::objects::Commit;
use crate::objectstore::ObjectStore;
use crate::refs::Refs;
use crate::Repository;

/// A node in the ancestry DAG: the commit itself plus its resolved
/// parents, first-parent and second-parent (merge parent) as siblings in
/// traversal order. Unresolvable or already-visited parents are omitted.
#[derive(Debug, Clone)]
pub struct Ancestry {
    pub commit: String,
    pub parents: Vec<Ancestry>,
}

/// Persist a commit object for the current branch: `root_tree_hash` as the
/// tree, the current branch's latest commit as the first parent (if any),
/// and `second_parent` (used for merges). Advances the current branch to
/// the new commit.
pub fn write_commit(
    repo: &Repository,
    root_tree_hash: &str,
    message: &str,
    second_parent: Option<&str>,
) -> Result<String> {
    let refs = Refs::new(repo);
    let store = ObjectStore::new(repo);

    let mut parents = Vec::new();
    let first_parent = refs.latest_commit_of_current_branch()?;
    if !first_parent.is_empty() {
        parents.push(first_parent);
    }
    if let Some(second) = second_parent {
        parents.push(second.to_string());
    }

    let commit = Commit::new(root_tree_hash.to_string(), parents, message.to_string());
    let hash = store.put_raw(&commit.serialize())?;
    refs.set_latest_of_current_branch(&hash)?;
    Ok(hash)
}

/// Walk `commit_hash`'s ancestry depth-first, first-parent before
/// second-parent, short-circuiting on anything already in `visited`.
/// Returns `None` for an empty hash, an unresolvable commit, or a commit
/// already visited.
pub fn ancestors(repo: &Repository, commit_hash: &str, visited: &mut HashSet<String>) -> Option<Ancestry> {
    if commit_hash.is_empty() || visited.contains(commit_hash) {
        return None;
    }
    visited.insert(commit_hash.to_string());

    let store = ObjectStore::new(repo);
    let payload = store.get(commit_hash).ok()?;
    let commit = Commit::parse(&payload).ok()?;

    let parents = commit
        .parents
        .iter()
        .filter_map(|p| ancestors(repo, p, visited))
        .collect();

    Some(Ancestry {
        commit: commit_hash.to_string(),
        parents,
    })
}

fn flatten_into(ancestry: &Ancestry, out: &mut Vec<String>) {
    out.push(ancestry.commit.clone());
    for parent in &ancestry.parents {
        flatten_into(parent, out);
    }
}

/// The de-duplicated, traversal-ordered set of `commit_hash`'s ancestors,
/// including `commit_hash` itself. Order matters: the common ancestor of a
/// merge is defined as the first element of the target's ancestor order
/// that also appears in the current branch's ancestor order.
pub fn ancestor_order(repo: &Repository, commit_hash: &str) -> Vec<String> {
    let mut visited = HashSet::new();
    let mut out = Vec::new();
    if let Some(tree) = ancestors(repo, commit_hash, &mut visited) {
        flatten_into(&tree, &mut out);
    }
    out
}
