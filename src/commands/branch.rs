//! `branch <name>`: create a branch at the current commit.

use anyhow::Result;

use crate::refs::Refs;
use crate::Repository;

pub fn run(repo: &Repository, branch_name: &str) -> Result<()> {
    let refs = Refs::new(repo);
    refs.create_branch(branch_name)?;
    println!("Created branch '{branch_name}'");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{add, commit};
    use tempfile::tempdir;

    #[test]
    fn branch_creates_ref_at_current_commit() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        add::run(&repo, ".").unwrap();
        let hash = commit::run(&repo, "first", false).unwrap().unwrap();

        run(&repo, "feat").unwrap();

        let refs = Refs::new(&repo);
        assert_eq!(refs.latest_commit_of_branch("feat").unwrap(), hash);
    }

    #[test]
    fn branch_fails_without_any_commits() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        assert!(run(&repo, "feat").is_err());
    }

    #[test]
    fn branch_fails_if_already_exists() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        add::run(&repo, ".").unwrap();
        commit::run(&repo, "first", false).unwrap();

        run(&repo, "feat").unwrap();
        assert!(run(&repo, "feat").is_err());
    }
}
