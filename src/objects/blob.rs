//! # Blob Object
//!
//! A blob stores file contents. It contains no filename or permissions —
//! just raw bytes.
//!
//! ## Format
//!
//! ```text
//! blob\0<size>\0<content>
//! ```

use anyhow::{Context, Result};

use crate::objectstore::ObjectStore;
use crate::Repository;

/// Represents a blob object.
#[derive(Debug, Clone)]
pub struct Blob {
    pub content: Vec<u8>,
}

impl Blob {
    pub fn new(content: Vec<u8>) -> Self {
        Self { content }
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Self::new(content))
    }

    /// The hash this blob would have once stored, without storing it.
    pub fn hash(&self) -> String {
        let payload = Self::payload(&self.content);
        crate::objectstore::io::sha1_hex(&payload)
    }

    /// Store this blob in the repository's object database.
    pub fn store(&self, repo: &Repository) -> Result<String> {
        let store = ObjectStore::new(repo);
        store.put_blob(&self.content)
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    fn payload(content: &[u8]) -> Vec<u8> {
        let mut payload = format!("blob\0{}\0", content.len()).into_bytes();
        payload.extend_from_slice(content);
        payload
    }
}

/// Read a blob's raw content (header stripped) by hash.
pub fn read_content(repo: &Repository, hash: &str) -> Result<Vec<u8>> {
    let store = ObjectStore::new(repo);
    strip_header(&store.get(hash)?)
        .with_context(|| format!("object {hash} is not a well-formed blob"))
}

/// Strip the `blob\0<len>\0` header from a raw blob payload.
pub fn strip_header(payload: &[u8]) -> Result<Vec<u8>> {
    let first_nul = payload
        .iter()
        .position(|&b| b == 0)
        .context("blob payload missing header")?;
    let rest = &payload[first_nul + 1..];
    let second_nul = rest
        .iter()
        .position(|&b| b == 0)
        .context("blob payload missing length separator")?;
    Ok(rest[second_nul + 1..].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn hash_matches_spec_payload() {
        let blob = Blob::new(b"hello".to_vec());
        let expected = crate::objectstore::io::sha1_hex(b"blob\x005\x00hello");
        assert_eq!(blob.hash(), expected);
    }

    #[test]
    fn store_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let blob = Blob::new(b"world".to_vec());
        let hash = blob.store(&repo).unwrap();
        assert_eq!(read_content(&repo, &hash).unwrap(), b"world");
    }
}
