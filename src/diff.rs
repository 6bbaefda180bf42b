//! Diff Engine (component G): three pairwise diffs over working copy,
//! index, and the committed tree, plus a commit-to-commit comparison used
//! by `diff -b`/`diff -c`.

use std::collections::HashMap;

use anyhow::Result;

use crate::index::Index;
use crate::objects::{tree, Commit};
use crate::objectstore::io;
use crate::objectstore::ObjectStore;
use crate::pathutil;
use crate::refs::Refs;
use crate::Repository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Added,
    Modified,
    Deleted,
}

impl Status {
    fn label(&self) -> &'static str {
        match self {
            Status::Added => "Added",
            Status::Modified => "Modified",
            Status::Deleted => "Deleted",
        }
    }
}

fn line(path: &str, status: Status) -> String {
    format!("{}: {}", pathutil::to_disk(path), status.label())
}

/// The committed tree's `path -> blob hash` map for `commit_hash`. Empty if
/// `commit_hash` is empty (no commits yet).
pub fn tree_map_for_commit(repo: &Repository, commit_hash: &str) -> Result<HashMap<String, String>> {
    if commit_hash.is_empty() {
        return Ok(HashMap::new());
    }
    let store = ObjectStore::new(repo);
    let commit = Commit::parse(&store.get(commit_hash)?)?;
    let dir_tree = tree::parse_tree(&store, &commit.tree, &repo.root_name())?;
    Ok(tree::flatten(&dir_tree))
}

/// §4.G-1: index vs. working copy. Untracked files are not reported.
pub fn index_vs_workdir(repo: &Repository) -> Result<Vec<String>> {
    let index = Index::load(&repo.index_path())?;
    let mut out = Vec::new();

    for entry in index.entries() {
        let full_path = repo.root.join(&entry.path);
        if !full_path.exists() {
            out.push(line(&entry.path, Status::Deleted));
            continue;
        }
        let current_mtime = io::mtime_of_path(&full_path)?;
        if current_mtime != entry.mtime {
            let content = std::fs::read(&full_path)?;
            let mut payload = format!("blob\0{}\0", content.len()).into_bytes();
            payload.extend_from_slice(&content);
            let current_hash = io::sha1_hex(&payload);
            if current_hash != entry.hash {
                out.push(line(&entry.path, Status::Modified));
            }
        }
    }

    Ok(out)
}

fn classify_maps(base: &HashMap<String, String>, other: &HashMap<String, String>) -> Vec<String> {
    let mut paths: Vec<&String> = base.keys().chain(other.keys()).collect();
    paths.sort();
    paths.dedup();

    let mut out = Vec::new();
    for path in paths {
        match (base.get(path), other.get(path)) {
            (None, Some(_)) => out.push(line(path, Status::Added)),
            (Some(_), None) => out.push(line(path, Status::Deleted)),
            (Some(a), Some(b)) if a != b => out.push(line(path, Status::Modified)),
            _ => {}
        }
    }
    out
}

/// §4.G-2: `HEAD` (committed tree) vs. index.
pub fn head_vs_index(repo: &Repository) -> Result<Vec<String>> {
    let refs = Refs::new(repo);
    let latest = refs.latest_commit_of_current_branch()?;
    let commit_map = tree_map_for_commit(repo, &latest)?;
    let index_map = Index::load(&repo.index_path())?.to_hash_map();
    Ok(classify_maps(&commit_map, &index_map))
}

/// §4.G-3: `HEAD` (committed tree) vs. working copy, restricted to tracked
/// (indexed) paths.
pub fn head_vs_workdir(repo: &Repository) -> Result<Vec<String>> {
    let refs = Refs::new(repo);
    let latest = refs.latest_commit_of_current_branch()?;
    let commit_map = tree_map_for_commit(repo, &latest)?;
    let index = Index::load(&repo.index_path())?;

    let mut out = Vec::new();
    for entry in index.entries() {
        let full_path = repo.root.join(&entry.path);
        if !full_path.exists() {
            out.push(line(&entry.path, Status::Deleted));
            continue;
        }
        let content = std::fs::read(&full_path)?;
        let mut payload = format!("blob\0{}\0", content.len()).into_bytes();
        payload.extend_from_slice(&content);
        let current_hash = io::sha1_hex(&payload);

        match commit_map.get(&entry.path) {
            None => out.push(line(&entry.path, Status::Added)),
            Some(committed) if committed != &current_hash => {
                out.push(line(&entry.path, Status::Modified))
            }
            _ => {}
        }
    }
    Ok(out)
}

/// Comparison between two commits' trees, used by `diff -b <branch>` and
/// `diff -c <commit>`: additions/deletions/modifications from `base` to
/// `other`.
pub fn commit_vs_commit(repo: &Repository, base: &str, other: &str) -> Result<Vec<String>> {
    let base_map = tree_map_for_commit(repo, base)?;
    let other_map = tree_map_for_commit(repo, other)?;
    Ok(classify_maps(&base_map, &other_map))
}
