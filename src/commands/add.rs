//! `add <path>` / `add .`: stage files under a path into the index.

use std::path::Path;

use anyhow::{Context, Result};

use crate::index::{Index, IndexEntry};
use crate::objectstore::{io, ObjectStore};
use crate::Repository;

pub fn run(repo: &Repository, path_str: &str) -> Result<()> {
    let mut index = Index::load(&repo.index_path())?;
    let store = ObjectStore::new(repo);

    let (target, prune_prefix) = if path_str == "." {
        (repo.root.clone(), String::new())
    } else {
        (repo.root.join(path_str), to_internal_path(path_str))
    };

    if !target.exists() {
        anyhow::bail!("fatal: pathspec '{path_str}' did not match any files");
    }

    let files = if target.is_dir() {
        io::walk_directory(&target)?
    } else {
        vec![target.clone()]
    };

    for file in &files {
        stage_file(repo, &store, &mut index, file)?;
    }

    index.prune(&prune_prefix, &repo.root);
    index.save(&repo.index_path())
}

fn stage_file(
    repo: &Repository,
    store: &ObjectStore,
    index: &mut Index,
    file: &Path,
) -> Result<()> {
    let content = std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let hash = store.put_blob(&content)?;
    let mtime = io::mtime_of_path(file)?;
    let rel_path = file
        .strip_prefix(&repo.root)
        .unwrap_or(file)
        .to_string_lossy()
        .replace('\\', "/");
    index.upsert(IndexEntry::new(rel_path, hash, mtime));
    Ok(())
}

fn to_internal_path(path_str: &str) -> String {
    path_str.replace('\\', "/").trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn add_dot_stages_all_files_recursively() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        std::fs::create_dir_all(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/b.txt"), b"world").unwrap();

        run(&repo, ".").unwrap();

        let index = Index::load(&repo.index_path()).unwrap();
        assert!(index.get("a.txt").is_some());
        assert!(index.get("sub/b.txt").is_some());
    }

    #[test]
    fn add_is_idempotent() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();

        run(&repo, ".").unwrap();
        run(&repo, ".").unwrap();

        let index = Index::load(&repo.index_path()).unwrap();
        assert_eq!(index.entries().len(), 1);
    }

    #[test]
    fn add_single_file_path() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();

        run(&repo, "a.txt").unwrap();

        let index = Index::load(&repo.index_path()).unwrap();
        assert_eq!(index.entries().len(), 1);
        assert!(index.get("a.txt").is_some());
    }

    #[test]
    fn add_prunes_deleted_files_under_path() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        run(&repo, ".").unwrap();

        std::fs::remove_file(dir.path().join("a.txt")).unwrap();
        std::fs::write(dir.path().join("b.txt"), b"world").unwrap();
        run(&repo, ".").unwrap();

        let index = Index::load(&repo.index_path()).unwrap();
        assert!(index.get("a.txt").is_none());
        assert!(index.get("b.txt").is_some());
    }

    #[test]
    fn add_missing_path_errors() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        assert!(run(&repo, "nope.txt").is_err());
    }
}
