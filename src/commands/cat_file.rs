//! `cat-file <hash>`, `cat-file <hash> -p`, `cat-file index`.

use anyhow::{Context, Result};

use crate::objectstore::ObjectStore;
use crate::Repository;

pub fn run(repo: &Repository, object: &str, pretty_print: bool) -> Result<Vec<u8>> {
    if object == "index" {
        let content = std::fs::read(repo.index_path()).context("failed to read index file")?;
        print_bytes(&content);
        return Ok(content);
    }

    let store = ObjectStore::new(repo);
    let hash = resolve_hash(&store, object)?;
    let payload = store.get(&hash)?;

    let output = if pretty_print {
        strip_header(&payload)
    } else {
        payload
    };

    print_bytes(&output);
    Ok(output)
}

fn resolve_hash(store: &ObjectStore, object: &str) -> Result<String> {
    if object.len() == 40 {
        return Ok(object.to_string());
    }
    store
        .prefix_lookup(object)?
        .with_context(|| format!("fatal: not a valid object name: '{object}'"))
}

/// Strip the `<kind>\0<len>\0` header, per spec.md's literal `-p` wording.
fn strip_header(payload: &[u8]) -> Vec<u8> {
    let mut nuls = payload.iter().enumerate().filter(|(_, &b)| b == 0);
    match (nuls.next(), nuls.next()) {
        (Some(_), Some((second, _))) => payload[second + 1..].to_vec(),
        _ => payload.to_vec(),
    }
}

fn print_bytes(bytes: &[u8]) {
    use std::io::Write;
    let _ = std::io::stdout().write_all(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{add, commit};
    use crate::objectstore::ObjectStore;
    use tempfile::tempdir;

    #[test]
    fn cat_file_full_hash_returns_raw_payload() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let store = ObjectStore::new(&repo);
        let hash = store.put_blob(b"hello").unwrap();

        let out = run(&repo, &hash, false).unwrap();
        assert_eq!(out, b"blob\x005\x00hello");
    }

    #[test]
    fn cat_file_pretty_print_strips_header() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let store = ObjectStore::new(&repo);
        let hash = store.put_blob(b"hello").unwrap();

        let out = run(&repo, &hash, true).unwrap();
        assert_eq!(out, b"hello");
    }

    #[test]
    fn cat_file_resolves_abbreviated_hash() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let store = ObjectStore::new(&repo);
        let hash = store.put_blob(b"abbreviated").unwrap();

        let out = run(&repo, &hash[..8], true).unwrap();
        assert_eq!(out, b"abbreviated");
    }

    #[test]
    fn cat_file_index_dumps_raw_index_content() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        add::run(&repo, ".").unwrap();
        commit::run(&repo, "first", false).unwrap();

        let out = run(&repo, "index", false).unwrap();
        let raw = std::fs::read(repo.index_path()).unwrap();
        assert_eq!(out, raw);
    }

    #[test]
    fn cat_file_missing_hash_errors() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        assert!(run(&repo, &"a".repeat(40), false).is_err());
    }
}
