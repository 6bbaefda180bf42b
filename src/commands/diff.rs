//! `diff`, `diff --cached`, `diff HEAD`, `diff -b <branch>`, `diff -c <commit>`.
//!
//! A thin CLI-facing wrapper: all the actual comparison logic lives in
//! [`crate::diff`] (component G). This module only resolves which of the
//! three pairwise perspectives (or branch/commit comparison) the caller
//! asked for and prints the resulting status lines.

use anyhow::Result;

use crate::diff as engine;
use crate::refs::Refs;
use crate::Repository;

/// What to compare, resolved from the CLI forms in spec.md §6.
pub enum Target {
    /// `diff`: index vs. working copy.
    WorkdirVsIndex,
    /// `diff --cached`: HEAD vs. index.
    Cached,
    /// `diff HEAD`: HEAD vs. working copy.
    Head,
    /// `diff -b <branch>`: current HEAD's tree vs. the named branch's tree.
    Branch(String),
    /// `diff -c <commit>`: current HEAD's tree vs. an arbitrary commit.
    Commit(String),
}

pub fn run(repo: &Repository, target: Target) -> Result<Vec<String>> {
    let lines = match target {
        Target::WorkdirVsIndex => engine::index_vs_workdir(repo)?,
        Target::Cached => engine::head_vs_index(repo)?,
        Target::Head => engine::head_vs_workdir(repo)?,
        Target::Branch(branch) => {
            let refs = Refs::new(repo);
            let current = refs.latest_commit_of_current_branch()?;
            let other = refs.latest_commit_of_branch(&branch)?;
            engine::commit_vs_commit(repo, &current, &other)?
        }
        Target::Commit(commit) => {
            let refs = Refs::new(repo);
            let current = refs.latest_commit_of_current_branch()?;
            engine::commit_vs_commit(repo, &current, &commit)?
        }
    };

    for line in &lines {
        println!("{line}");
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{add, branch, commit};
    use crate::index::{Index, IndexEntry};
    use tempfile::tempdir;

    #[test]
    fn workdir_vs_index_reports_modification() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();

        // A stale recorded mtime forces the engine to re-hash and notice
        // the mismatch, independent of wall-clock timing.
        let mut index = Index::new();
        index.upsert(IndexEntry::new("a.txt", "deadbeef".repeat(5), "0"));
        index.save(&repo.index_path()).unwrap();

        let lines = run(&repo, Target::WorkdirVsIndex).unwrap();
        assert_eq!(lines, vec!["a.txt: Modified".to_string()]);
    }

    #[test]
    fn cached_is_empty_right_after_commit() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        add::run(&repo, ".").unwrap();
        commit::run(&repo, "first", false).unwrap();

        assert!(run(&repo, Target::Cached).unwrap().is_empty());
    }

    #[test]
    fn head_reports_deleted_file() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        std::fs::create_dir_all(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/b.txt"), b"world").unwrap();
        add::run(&repo, ".").unwrap();
        commit::run(&repo, "first", false).unwrap();

        std::fs::remove_file(dir.path().join("sub/b.txt")).unwrap();

        let lines = run(&repo, Target::Head).unwrap();
        assert_eq!(lines, vec!["sub\\b.txt: Deleted".to_string()]);
    }

    #[test]
    fn branch_diff_compares_two_branch_tips() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        add::run(&repo, ".").unwrap();
        commit::run(&repo, "first", false).unwrap();

        branch::run(&repo, "feat").unwrap();
        let refs = Refs::new(&repo);
        refs.set_head_to_branch("feat").unwrap();
        std::fs::write(dir.path().join("c.txt"), b"on feat").unwrap();
        add::run(&repo, ".").unwrap();
        commit::run(&repo, "on feat", false).unwrap();
        refs.set_head_to_branch("master").unwrap();

        let lines = run(&repo, Target::Branch("feat".to_string())).unwrap();
        assert_eq!(lines, vec!["c.txt: Added".to_string()]);
    }
}
