//! `latest_commit`, `latest_commit branch_name <name>`: print a commit hash.

use anyhow::Result;

use crate::refs::Refs;
use crate::Repository;

pub fn run(repo: &Repository, branch_name: Option<&str>) -> Result<String> {
    let refs = Refs::new(repo);
    let hash = match branch_name {
        Some(name) => refs.latest_commit_of_branch(name)?,
        None => refs.latest_commit_of_current_branch()?,
    };
    println!("{hash}");
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{add, commit};
    use tempfile::tempdir;

    #[test]
    fn prints_current_branch_head() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        add::run(&repo, ".").unwrap();
        let hash = commit::run(&repo, "first", false).unwrap().unwrap();

        assert_eq!(run(&repo, None).unwrap(), hash);
    }

    #[test]
    fn prints_named_branch_head() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        add::run(&repo, ".").unwrap();
        let hash = commit::run(&repo, "first", false).unwrap().unwrap();

        let refs = Refs::new(&repo);
        refs.create_branch("feat").unwrap();

        assert_eq!(run(&repo, Some("feat")).unwrap(), hash);
    }
}
