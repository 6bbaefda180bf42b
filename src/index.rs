//! # Index (Staging Area)
//!
//! A flat text manifest of what's staged for the next commit. One line per
//! entry: `<mode>\0blob\0<hash>\0<stage>\0<relative-path>\0<mtime>`, the
//! path using `\`-separators on disk. The whole file terminates with
//! `\0\n`.
//!
//! The index is authoritative for "what is staged"; the object store holds
//! the actual bytes.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::pathutil;

pub const DEFAULT_MODE: &str = "100644";
pub const DEFAULT_STAGE: &str = "0";

/// A single staged entry.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub mode: String,
    pub hash: String,
    pub stage: String,
    /// Repository-root-relative path, internal `/`-separated form.
    pub path: String,
    pub mtime: String,
}

impl IndexEntry {
    pub fn new(path: impl Into<String>, hash: impl Into<String>, mtime: impl Into<String>) -> Self {
        Self {
            mode: DEFAULT_MODE.to_string(),
            hash: hash.into(),
            stage: DEFAULT_STAGE.to_string(),
            path: path.into(),
            mtime: mtime.into(),
        }
    }

    fn serialize_line(&self) -> String {
        format!(
            "{}\0blob\0{}\0{}\0{}\0{}",
            self.mode,
            self.hash,
            self.stage,
            pathutil::to_disk(&self.path),
            self.mtime
        )
    }

    fn parse_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.splitn(6, '\0').collect();
        if fields.len() < 6 {
            return None;
        }
        Some(Self {
            mode: fields[0].to_string(),
            hash: fields[2].to_string(),
            stage: fields[3].to_string(),
            path: pathutil::from_disk(fields[4]),
            // The final field may carry a trailing terminator byte from the
            // file's closing `\0\n`; trim it off.
            mtime: fields[5].trim_end_matches(['\0', '\n']).to_string(),
        })
    }
}

/// The staging manifest.
#[derive(Debug, Clone, Default)]
pub struct Index {
    entries: Vec<IndexEntry>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the index file; a missing file yields an empty index.
    pub fn load(index_path: &Path) -> Result<Self> {
        if !index_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(index_path).context("failed to read index file")?;
        let mut lines: Vec<&str> = content.split('\n').collect();
        // The serialized form always ends with an extra `\0\n`, which after
        // splitting on `\n` leaves a trailing empty element.
        if lines.last() == Some(&"") {
            lines.pop();
        }

        let mut entries = Vec::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            if let Some(entry) = IndexEntry::parse_line(line) {
                entries.push(entry);
            }
        }
        Ok(Self { entries })
    }

    /// Write the index back out, always terminating with `\0\n`.
    pub fn save(&self, index_path: &Path) -> Result<()> {
        let mut content = self
            .entries
            .iter()
            .map(IndexEntry::serialize_line)
            .collect::<Vec<_>>()
            .join("\n");
        content.push_str("\0\n");
        if let Some(parent) = index_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(index_path, content).context("failed to write index file")
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn get(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// If an entry with the same path exists, replace it; otherwise
    /// append. A replacement that leaves the serialized line byte-identical
    /// to what was already there is a true no-op (this is what keeps
    /// `add(p); add(p)` idempotent — see DESIGN.md for the resolution of
    /// an ambiguity between this and the literal source behavior).
    pub fn upsert(&mut self, entry: IndexEntry) {
        let new_line = entry.serialize_line();
        if let Some(existing) = self.entries.iter().position(|e| e.path == entry.path) {
            if self.entries[existing].serialize_line() == new_line {
                return;
            }
            self.entries[existing] = entry;
        } else {
            self.entries.push(entry);
        }
    }

    /// Remove entries whose path lies under `prefix_path` and whose
    /// working-copy file no longer exists.
    pub fn prune(&mut self, prefix_path: &str, repo_root: &Path) {
        self.entries.retain(|e| {
            let under_prefix = prefix_path.is_empty()
                || e.path == prefix_path
                || e.path.starts_with(&format!("{prefix_path}/"));
            if !under_prefix {
                return true;
            }
            repo_root.join(&e.path).exists()
        });
    }

    /// Remove a single path outright (used by checkout/merge to drop
    /// entries for deleted files without requiring the file to still be
    /// present on disk to judge deletion, unlike `prune`).
    pub fn remove(&mut self, path: &str) {
        self.entries.retain(|e| e.path != path);
    }

    pub fn to_hash_map(&self) -> HashMap<String, String> {
        self.entries
            .iter()
            .map(|e| (e.path.clone(), e.hash.clone()))
            .collect()
    }

    pub fn to_hash_mtime_map(&self) -> HashMap<String, (String, String)> {
        self.entries
            .iter()
            .map(|e| (e.path.clone(), (e.hash.clone(), e.mtime.clone())))
            .collect()
    }

    pub fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }
}
