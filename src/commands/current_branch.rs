//! `current_branch`: print the resolved ref `HEAD` points at.

use anyhow::Result;

use crate::refs::Refs;
use crate::Repository;

pub fn run(repo: &Repository) -> Result<String> {
    let refs = Refs::new(repo);
    let current = refs.current_branch()?;
    println!("{current}");
    Ok(current)
}
