//! `commit`, `commit -m <msg>`, `commit -a`.

use anyhow::Result;

use crate::commands::add;
use crate::commit_graph;
use crate::diff;
use crate::index::Index;
use crate::objects::tree;
use crate::objectstore::ObjectStore;
use crate::Repository;

/// Record a commit from the current index. `auto_add` first re-stages
/// every already-tracked path (the `-a` flag). Returns the new commit hash,
/// or `Ok(None)` if there is nothing to commit.
pub fn run(repo: &Repository, message: &str, auto_add: bool) -> Result<Option<String>> {
    if auto_add {
        add::run(repo, ".")?;
    }

    if diff::head_vs_index(repo)?.is_empty() {
        println!("nothing to commit, working tree clean");
        return Ok(None);
    }

    let store = ObjectStore::new(repo);
    let index = Index::load(&repo.index_path())?;
    let root_tree_hash = tree::build_root_tree(&store, &repo.root_name(), &index)?;
    let hash = commit_graph::write_commit(repo, &root_tree_hash, message, None)?;

    println!("[{}] {}", &hash[..7.min(hash.len())], message);
    Ok(Some(hash))
}
