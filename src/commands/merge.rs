//! `merge branch_name <name>` (component I): classify the merge as a
//! no-op, fast-forward, or three-way reconciliation, and apply it.

use std::collections::{HashMap, HashSet};

use anyhow::Result;

use crate::commands::checkout;
use crate::commit_graph;
use crate::diff;
use crate::error::RitError;
use crate::index::{Index, IndexEntry};
use crate::objects::{blob, tree};
use crate::objectstore::{io, ObjectStore};
use crate::refs::Refs;
use crate::Repository;

/// How a merge resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Target is already an ancestor of current (or they're the same commit).
    NoOp,
    /// Current was an ancestor of target; the branch ref was advanced.
    FastForward,
    /// A merge commit was created.
    ThreeWay { commit: String },
    /// Reconciliation hit at least one conflicting path; nothing was
    /// written or committed.
    Conflict(Vec<String>),
}

pub fn run(repo: &Repository, target_branch: &str) -> Result<MergeOutcome> {
    let refs = Refs::new(repo);

    if refs.current_branch_name()?.as_deref() == Some(target_branch) {
        anyhow::bail!(RitError::AlreadyOnBranch(target_branch.to_string()));
    }
    if !refs.branch_exists(target_branch) {
        anyhow::bail!(RitError::BranchNotFound(target_branch.to_string()));
    }
    if !diff::index_vs_workdir(repo)?.is_empty() || !diff::head_vs_index(repo)?.is_empty() {
        anyhow::bail!(RitError::DirtyWorkingTree);
    }

    let target_commit = refs.latest_commit_of_branch(target_branch)?;
    let current_commit = refs.latest_commit_of_current_branch()?;

    if target_commit.is_empty() {
        anyhow::bail!(RitError::EmptyBranch(target_branch.to_string()));
    }

    if current_commit.is_empty() || target_commit == current_commit {
        if current_commit.is_empty() {
            refs.set_latest_of_current_branch(&target_commit)?;
            checkout::apply_tree_swap(repo, "", &target_commit)?;
            println!("Fast-forward to {target_commit}");
            return Ok(MergeOutcome::FastForward);
        }
        println!("Already up to date.");
        return Ok(MergeOutcome::NoOp);
    }

    let current_ancestors: HashSet<String> = commit_graph::ancestor_order(repo, &current_commit)
        .into_iter()
        .collect();
    if current_ancestors.contains(&target_commit) {
        println!("Already up to date.");
        return Ok(MergeOutcome::NoOp);
    }

    let target_ancestor_order = commit_graph::ancestor_order(repo, &target_commit);
    if target_ancestor_order.contains(&current_commit) {
        refs.set_latest_of_current_branch(&target_commit)?;
        checkout::apply_tree_swap(repo, &current_commit, &target_commit)?;
        println!("Fast-forward to {target_commit}");
        return Ok(MergeOutcome::FastForward);
    }

    // The common ancestor is the first element of the target's ancestor
    // traversal order that also appears in current's ancestor set.
    // Traversal order matters here: it's what makes the choice
    // deterministic when the DAG branches more than once.
    let common_ancestor = target_ancestor_order
        .into_iter()
        .find(|c| current_ancestors.contains(c))
        .unwrap_or_default();

    let ti = diff::tree_map_for_commit(repo, &target_commit)?;
    let ci = diff::tree_map_for_commit(repo, &current_commit)?;
    let ai = diff::tree_map_for_commit(repo, &common_ancestor)?;

    let (resolved, deletions, conflicts) = reconcile(&ti, &ci, &ai);

    if !conflicts.is_empty() {
        println!("{}", RitError::MergeConflict(conflicts.clone()));
        return Ok(MergeOutcome::Conflict(conflicts));
    }

    let mut index = Index::load(&repo.index_path())?;

    for path in &deletions {
        io::delete_if_exists(&repo.root.join(path))?;
        index.remove(path);
    }

    for (path, hash) in &resolved {
        let content = blob::read_content(repo, hash)?;
        let full_path = repo.root.join(path);
        io::write_bytes(&full_path, &content)?;
        let mtime = io::mtime_of_path(&full_path)?;
        index.upsert(IndexEntry::new(path.clone(), hash.clone(), mtime));
    }

    index.save(&repo.index_path())?;

    let store = ObjectStore::new(repo);
    let root_tree_hash = tree::build_root_tree(&store, &repo.root_name(), &index)?;

    let message = format!("Merge commit from {target_branch} to current branch");
    let hash = commit_graph::write_commit(repo, &root_tree_hash, &message, Some(&target_commit))?;

    println!("[{}] {}", &hash[..7.min(hash.len())], message);
    Ok(MergeOutcome::ThreeWay { commit: hash })
}

/// The three-way reconciliation table from spec.md §4.I, applied per path
/// over the union of `ti`, `ci`, `ai` keys. Returns (resolved additions
/// and updates, deletions, conflicts).
fn reconcile(
    ti: &HashMap<String, String>,
    ci: &HashMap<String, String>,
    ai: &HashMap<String, String>,
) -> (HashMap<String, String>, Vec<String>, Vec<String>) {
    let mut paths: Vec<&String> = ti.keys().chain(ci.keys()).chain(ai.keys()).collect();
    paths.sort();
    paths.dedup();

    let mut resolved = HashMap::new();
    let mut deletions = Vec::new();
    let mut conflicts = Vec::new();

    for path in paths {
        let a = ai.get(path);
        let t = ti.get(path);
        let c = ci.get(path);

        match (a, t, c) {
            (Some(_), None, None) => deletions.push(path.clone()),
            (Some(a), Some(t), None) => {
                if t == a {
                    deletions.push(path.clone());
                } else {
                    conflicts.push(path.clone());
                }
            }
            (Some(a), None, Some(c)) => {
                if c == a {
                    deletions.push(path.clone());
                } else {
                    conflicts.push(path.clone());
                }
            }
            (Some(a), Some(t), Some(c)) => {
                if t == c && t != a {
                    resolved.insert(path.clone(), t.clone());
                } else if a == t {
                    resolved.insert(path.clone(), c.clone());
                } else if a == c {
                    resolved.insert(path.clone(), t.clone());
                } else {
                    conflicts.push(path.clone());
                }
            }
            (None, _, Some(c)) => match t {
                None => {
                    resolved.insert(path.clone(), c.clone());
                }
                Some(t) if t == c => {
                    resolved.insert(path.clone(), c.clone());
                }
                Some(_) => conflicts.push(path.clone()),
            },
            (None, Some(t), None) => {
                resolved.insert(path.clone(), t.clone());
            }
            (None, None, None) => {}
        }
    }

    conflicts.sort();
    (resolved, deletions, conflicts)
}
