//! `init` / `init --bare`.

use anyhow::Result;

use crate::Repository;

pub fn run(bare: bool) -> Result<Repository> {
    let cwd = std::env::current_dir()?;
    if bare {
        Repository::init_bare(&cwd)
    } else {
        Repository::init(&cwd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_creates_layout_in_current_dir() {
        let dir = tempfile::tempdir().unwrap();
        let prev = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let result = run(false);
        std::env::set_current_dir(prev).unwrap();

        let repo = result.unwrap();
        assert!(repo.head_path().exists());
    }
}
