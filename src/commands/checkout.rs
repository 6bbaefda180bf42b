//! `checkout <branch>` (component H): swap the working copy and index from
//! the current commit's tree to a target branch's tree.

use std::path::Path;

use anyhow::{Context, Result};

use crate::diff;
use crate::error::RitError;
use crate::index::{Index, IndexEntry};
use crate::objects::tree::{self, DirTree};
use crate::objectstore::{io, ObjectStore};
use crate::refs::Refs;
use crate::Repository;

pub fn run(repo: &Repository, branch_name: &str) -> Result<()> {
    let refs = Refs::new(repo);

    if !refs.branch_exists(branch_name) {
        anyhow::bail!(RitError::BranchNotFound(branch_name.to_string()));
    }
    if refs.current_branch_name()?.as_deref() == Some(branch_name) {
        anyhow::bail!(RitError::AlreadyOnBranch(branch_name.to_string()));
    }
    if !diff::index_vs_workdir(repo)?.is_empty() || !diff::head_vs_index(repo)?.is_empty() {
        anyhow::bail!(RitError::DirtyWorkingTree);
    }

    let old_commit = refs.latest_commit_of_current_branch()?;
    let new_commit = refs.latest_commit_of_branch(branch_name)?;

    apply_tree_swap(repo, &old_commit, &new_commit)?;
    refs.set_head_to_branch(branch_name)?;

    println!("Switched to branch '{branch_name}'");
    Ok(())
}

/// Swap the working copy and index from `old_commit`'s tree to
/// `new_commit`'s tree: delete every file in the old tree (pruning
/// now-empty directories), write every blob in the new tree, then rewrite
/// the index as the flat projection of the new tree. Shared by `checkout`
/// and `merge`'s fast-forward path. Does not touch refs/HEAD.
pub fn apply_tree_swap(repo: &Repository, old_commit: &str, new_commit: &str) -> Result<()> {
    let store = ObjectStore::new(repo);

    if !old_commit.is_empty() {
        let old_commit_obj = crate::objects::Commit::parse(&store.get(old_commit)?)?;
        let old_tree = tree::parse_tree(&store, &old_commit_obj.tree, &repo.root_name())?;
        delete_dirtree(repo, &old_tree)?;
    }

    let mut index = Index::new();

    if !new_commit.is_empty() {
        let new_commit_obj = crate::objects::Commit::parse(&store.get(new_commit)?)?;
        let new_tree = tree::parse_tree(&store, &new_commit_obj.tree, &repo.root_name())?;
        write_dirtree(repo, &store, &new_tree, &mut index)?;
    }

    index.save(&repo.index_path())
}

/// Delete every file the old tree names, then remove now-empty directories
/// bottom-up (post-order, matching the original's cleanup behavior).
fn delete_dirtree(repo: &Repository, dir_tree: &DirTree) -> Result<()> {
    delete_dirtree_at(repo, dir_tree, Path::new(""))
}

fn delete_dirtree_at(repo: &Repository, dir_tree: &DirTree, rel_dir: &Path) -> Result<()> {
    for sub in &dir_tree.subdirs {
        delete_dirtree_at(repo, sub, &rel_dir.join(&sub.name))?;
    }
    for name in dir_tree.file_hashes.keys() {
        let full_path = repo.root.join(rel_dir).join(name);
        io::delete_if_exists(&full_path)?;
    }
    for sub in &dir_tree.subdirs {
        let full_dir = repo.root.join(rel_dir).join(&sub.name);
        if full_dir.is_dir() && full_dir.read_dir().map(|mut d| d.next().is_none()).unwrap_or(false) {
            std::fs::remove_dir(&full_dir)
                .with_context(|| format!("failed to remove empty directory {}", full_dir.display()))?;
        }
    }
    Ok(())
}

/// Write every blob named by the new tree to the working copy, recording
/// each as a staged index entry (hash plus the post-write mtime).
fn write_dirtree(
    repo: &Repository,
    store: &ObjectStore,
    dir_tree: &DirTree,
    index: &mut Index,
) -> Result<()> {
    write_dirtree_at(repo, store, dir_tree, Path::new(""), index)
}

fn write_dirtree_at(
    repo: &Repository,
    store: &ObjectStore,
    dir_tree: &DirTree,
    rel_dir: &Path,
    index: &mut Index,
) -> Result<()> {
    for (name, hash) in &dir_tree.file_hashes {
        let full_path = repo.root.join(rel_dir).join(name);
        let content = crate::objects::blob::strip_header(&store.get(hash)?)
            .with_context(|| format!("object {hash} is not a well-formed blob"))?;
        io::write_bytes(&full_path, &content)?;
        let mtime = io::mtime_of_path(&full_path)?;
        let rel_path = rel_dir.join(name).to_string_lossy().replace('\\', "/");
        index.upsert(IndexEntry::new(rel_path, hash.clone(), mtime));
    }
    for sub in &dir_tree.subdirs {
        write_dirtree_at(repo, store, sub, &rel_dir.join(&sub.name), index)?;
    }
    Ok(())
}
