//! # Commit Object
//!
//! A commit is a snapshot: a root tree, zero/one/two parents, and a
//! message. No author/committer/timestamp fields — this format tracks the
//! original project's commit object, not upstream Git's.
//!
//! ## Format
//!
//! ```text
//! tree\0<tree-hash>\n
//! parent\0<parent-hash>\n     # 0, 1 or 2 parent lines
//! '<message>'
//! ```

use anyhow::{Context, Result};

/// Represents a commit object.
#[derive(Debug, Clone)]
pub struct Commit {
    pub tree: String,
    pub parents: Vec<String>,
    pub message: String,
}

impl Commit {
    pub fn new(tree: String, parents: Vec<String>, message: String) -> Self {
        Self { tree, parents, message }
    }

    /// Serialize to the on-disk payload (no object-kind header; a commit is
    /// structurally identified by starting with `tree\0`).
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = format!("tree\0{}\n", self.tree);
        for parent in &self.parents {
            out.push_str(&format!("parent\0{parent}\n"));
        }
        out.push('\'');
        out.push_str(&self.message);
        out.push('\'');
        out.into_bytes()
    }

    /// Parse a commit payload. The message is read permissively: everything
    /// between the first and last single quote, so this crate's own
    /// writer/reader pair round-trips any message even though the on-disk
    /// framing has no escaping (spec Open Question 3).
    pub fn parse(content: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(content);
        let mut tree = String::new();
        let mut parents = Vec::new();

        let first_quote = text.find('\'');
        let header = match first_quote {
            Some(idx) => &text[..idx],
            None => text.as_ref(),
        };

        for line in header.lines() {
            if let Some(hash) = line.strip_prefix("tree\0") {
                tree = hash.to_string();
            } else if let Some(hash) = line.strip_prefix("parent\0") {
                parents.push(hash.to_string());
            }
        }

        if tree.is_empty() {
            anyhow::bail!("commit payload missing tree line");
        }

        let message = match (text.find('\''), text.rfind('\'')) {
            (Some(first), Some(last)) if last > first => text[first + 1..last].to_string(),
            _ => String::new(),
        };

        Ok(Self { tree, parents, message })
    }

    pub fn is_initial(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() >= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_round_trips_with_no_parents() {
        let commit = Commit::new("a".repeat(40), vec![], "first".to_string());
        let parsed = Commit::parse(&commit.serialize()).unwrap();
        assert_eq!(parsed.tree, "a".repeat(40));
        assert!(parsed.parents.is_empty());
        assert_eq!(parsed.message, "first");
    }

    #[test]
    fn commit_round_trips_with_two_parents() {
        let commit = Commit::new(
            "a".repeat(40),
            vec!["b".repeat(40), "c".repeat(40)],
            "merge commit from x to current branch".to_string(),
        );
        let parsed = Commit::parse(&commit.serialize()).unwrap();
        assert_eq!(parsed.parents, vec!["b".repeat(40), "c".repeat(40)]);
        assert!(parsed.is_merge());
    }

    #[test]
    fn matches_literal_spec_payload_shape() {
        let commit = Commit::new("deadbeef".to_string(), vec![], "hello".to_string());
        assert_eq!(commit.serialize(), b"tree\0deadbeef\n'hello'".to_vec());
    }

    #[test]
    fn message_containing_a_quote_still_round_trips_through_this_reader() {
        let commit = Commit::new("a".repeat(40), vec![], "it's fine".to_string());
        let parsed = Commit::parse(&commit.serialize()).unwrap();
        assert_eq!(parsed.message, "it's fine");
    }
}
