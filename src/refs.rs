//! Refs & HEAD (component E).
//!
//! `HEAD` holds either a symbolic ref (`ref: refs\heads\<branch>`) or a
//! detached commit hash. Branch files under `refs\heads\<name>` each hold
//! one commit hash. On-disk paths embedded in `HEAD` use `\` literally,
//! matching the original layout; internal string handling otherwise treats
//! the ref path as an opaque token.

use std::fs;

use anyhow::{Context, Result};

use crate::error::RitError;
use crate::Repository;

const REF_PREFIX: &str = "ref: ";

pub struct Refs<'a> {
    repo: &'a Repository,
}

impl<'a> Refs<'a> {
    pub fn new(repo: &'a Repository) -> Self {
        Self { repo }
    }

    fn head_raw(&self) -> Result<String> {
        if !self.repo.head_path().exists() {
            anyhow::bail!(RitError::NotARepository);
        }
        let content = fs::read_to_string(self.repo.head_path()).context("failed to read HEAD")?;
        Ok(content.trim().to_string())
    }

    /// The branch ref path `HEAD` points at (e.g. `refs\heads\master`), or
    /// `None` if `HEAD` is detached (a raw commit hash).
    pub fn head_branch_ref(&self) -> Result<Option<String>> {
        let raw = self.head_raw()?;
        Ok(raw.strip_prefix(REF_PREFIX).map(|s| s.trim().to_string()))
    }

    /// The current branch's name (e.g. `master`), or `None` if detached.
    pub fn current_branch_name(&self) -> Result<Option<String>> {
        Ok(self
            .head_branch_ref()?
            .and_then(|r| r.rsplit('\\').next().map(|s| s.to_string())))
    }

    /// Per spec 4.E: the resolved ref string (`refs\heads\<branch>`) if
    /// `HEAD` is symbolic, otherwise the raw detached commit hash.
    pub fn current_branch(&self) -> Result<String> {
        let raw = self.head_raw()?;
        match raw.strip_prefix(REF_PREFIX) {
            Some(r) => Ok(r.trim().to_string()),
            None => Ok(raw),
        }
    }

    pub fn branch_exists(&self, name: &str) -> bool {
        self.repo.branch_path(name).is_file()
    }

    /// The latest commit hash for the branch `HEAD` currently points at,
    /// or `""` if that branch has no commits yet. If `HEAD` is detached,
    /// returns the detached commit hash itself.
    pub fn latest_commit_of_current_branch(&self) -> Result<String> {
        match self.head_branch_ref()? {
            None => Ok(self.head_raw()?),
            Some(branch_ref) => {
                let path = self.repo.rit_dir.join(branch_ref.replace('\\', "/"));
                if !path.is_file() {
                    return Ok(String::new());
                }
                Ok(fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?
                    .trim()
                    .to_string())
            }
        }
    }

    /// The latest commit hash for an arbitrary branch by name.
    pub fn latest_commit_of_branch(&self, name: &str) -> Result<String> {
        let path = self.repo.branch_path(name);
        if !path.is_file() {
            anyhow::bail!(RitError::BranchNotFound(name.to_string()));
        }
        Ok(fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?
            .trim()
            .to_string())
    }

    /// Advance the branch `HEAD` currently points at (or, if detached,
    /// `HEAD` itself) to `hash`.
    pub fn set_latest_of_current_branch(&self, hash: &str) -> Result<()> {
        match self.head_branch_ref()? {
            None => {
                fs::write(self.repo.head_path(), hash).context("failed to update HEAD")?;
            }
            Some(branch_ref) => {
                let path = self.repo.rit_dir.join(branch_ref.replace('\\', "/"));
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, hash)
                    .with_context(|| format!("failed to update {}", path.display()))?;
            }
        }
        Ok(())
    }

    /// Create branch `name` pointing at the current branch's latest
    /// commit. Fails if `name` already exists or no branch is checked out.
    pub fn create_branch(&self, name: &str) -> Result<()> {
        if self.branch_exists(name) {
            anyhow::bail!(RitError::BranchAlreadyExists(name.to_string()));
        }
        if self.head_branch_ref()?.is_none() {
            anyhow::bail!(RitError::DetachedHead);
        }
        let current = self.latest_commit_of_current_branch()?;
        if current.is_empty() {
            anyhow::bail!(RitError::DetachedHead);
        }
        let path = self.repo.branch_path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &current).with_context(|| format!("failed to create {}", path.display()))
    }

    /// Rewrite `HEAD` to point at branch `name`.
    pub fn set_head_to_branch(&self, name: &str) -> Result<()> {
        fs::write(
            self.repo.head_path(),
            format!("ref: refs\\heads\\{name}"),
        )
        .context("failed to update HEAD")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn current_branch_defaults_to_master() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let refs = Refs::new(&repo);
        assert_eq!(refs.current_branch().unwrap(), "refs\\heads\\master");
        assert_eq!(refs.current_branch_name().unwrap(), Some("master".to_string()));
    }

    #[test]
    fn latest_commit_of_current_branch_is_empty_before_any_commit() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let refs = Refs::new(&repo);
        assert_eq!(refs.latest_commit_of_current_branch().unwrap(), "");
    }

    #[test]
    fn set_then_read_latest_commit_round_trips() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let refs = Refs::new(&repo);
        let hash = "a".repeat(40);
        refs.set_latest_of_current_branch(&hash).unwrap();
        assert_eq!(refs.latest_commit_of_current_branch().unwrap(), hash);
        assert_eq!(refs.latest_commit_of_branch("master").unwrap(), hash);
    }

    #[test]
    fn create_branch_copies_current_commit() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let refs = Refs::new(&repo);
        let hash = "b".repeat(40);
        refs.set_latest_of_current_branch(&hash).unwrap();
        refs.create_branch("feature").unwrap();
        assert_eq!(refs.latest_commit_of_branch("feature").unwrap(), hash);
    }

    #[test]
    fn create_branch_fails_if_exists() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let refs = Refs::new(&repo);
        refs.set_latest_of_current_branch(&"c".repeat(40)).unwrap();
        refs.create_branch("feature").unwrap();
        assert!(refs.create_branch("feature").is_err());
    }

    #[test]
    fn create_branch_fails_with_no_commits() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let refs = Refs::new(&repo);
        assert!(refs.create_branch("feature").is_err());
    }

    #[test]
    fn set_head_to_branch_switches_current_branch_name() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let refs = Refs::new(&repo);
        refs.set_latest_of_current_branch(&"d".repeat(40)).unwrap();
        refs.create_branch("feature").unwrap();
        refs.set_head_to_branch("feature").unwrap();
        assert_eq!(refs.current_branch_name().unwrap(), Some("feature".to_string()));
    }
}
