//! Object Store (component B): content-addressed persistence for blobs,
//! trees and commits, keyed by 40-char hex SHA-1 digest.

pub mod io;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::error::RitError;
use crate::Repository;

/// The tag each object payload opens with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
        }
    }
}

pub struct ObjectStore<'a> {
    repo: &'a Repository,
}

impl<'a> ObjectStore<'a> {
    pub fn new(repo: &'a Repository) -> Self {
        Self { repo }
    }

    fn object_path(&self, hash: &str) -> PathBuf {
        self.repo
            .objects_dir()
            .join(&hash[..2])
            .join(&hash[2..])
    }

    /// Persist `payload` (the full tagged byte sequence per §3) and return
    /// its hash. A no-op if the object already exists.
    pub fn put_raw(&self, payload: &[u8]) -> Result<String> {
        let hash = io::sha1_hex(payload);
        let path = self.object_path(&hash);
        if !path.exists() {
            let compressed = io::deflate(payload)?;
            io::write_bytes(&path, &compressed)?;
        }
        Ok(hash)
    }

    /// Convenience wrapper that builds the `<kind>\0<len>\0<body>` header
    /// for blobs, or passes tree/commit payloads through unchanged (those
    /// callers build the full payload themselves, since their framing
    /// isn't a uniform `<kind>\0<len>\0` header).
    pub fn put_blob(&self, content: &[u8]) -> Result<String> {
        let mut payload = format!("blob\0{}\0", content.len()).into_bytes();
        payload.extend_from_slice(content);
        self.put_raw(&payload)
    }

    /// Read and inflate the object at `hash`. Fails with `NotFound` if the
    /// file is absent.
    pub fn get(&self, hash: &str) -> Result<Vec<u8>> {
        let path = self.object_path(hash);
        if !path.exists() {
            bail!(RitError::ObjectNotFound(hash.to_string()));
        }
        let compressed = io::read_bytes(&path)
            .with_context(|| format!("failed to read object {hash}"))?;
        Ok(io::inflate_or_empty(&compressed))
    }

    /// Within `objects/<prefix[:2]>`, return the first entry whose filename
    /// starts with `prefix[2:]`. Used by `cat-file` to resolve abbreviated
    /// hashes.
    pub fn prefix_lookup(&self, prefix: &str) -> Result<Option<String>> {
        if prefix.len() < 3 {
            return Ok(None);
        }
        let dir = self.repo.objects_dir().join(&prefix[..2]);
        if !dir.is_dir() {
            return Ok(None);
        }
        let rest = &prefix[2..];
        for entry in std::fs::read_dir(&dir)
            .with_context(|| format!("failed to read {}", dir.display()))?
        {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(rest) {
                return Ok(Some(format!("{}{}", &prefix[..2], name)));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn put_get_blob_round_trips() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let store = ObjectStore::new(&repo);
        let hash = store.put_blob(b"hello").unwrap();
        let payload = store.get(&hash).unwrap();
        assert_eq!(payload, b"blob\x005\x00hello");
    }

    #[test]
    fn put_is_idempotent() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let store = ObjectStore::new(&repo);
        let h1 = store.put_blob(b"same content").unwrap();
        let h2 = store.put_blob(b"same content").unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn get_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let store = ObjectStore::new(&repo);
        assert!(store.get(&"a".repeat(40)).is_err());
    }

    #[test]
    fn prefix_lookup_resolves_abbreviation() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let store = ObjectStore::new(&repo);
        let hash = store.put_blob(b"abbreviation target").unwrap();
        let found = store.prefix_lookup(&hash[..6]).unwrap();
        assert_eq!(found, Some(hash));
    }
}
