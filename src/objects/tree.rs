//! # Tree Object
//!
//! A tree object represents a directory. It maps names to blob or subtree
//! hashes.
//!
//! ## Format
//!
//! Newline-separated entries, each `<mode>\0<kind>\0<hash>\0<name>` where
//! `kind` is `tree` or `blob`. Hashes are stored as 40-char hex text, not
//! raw bytes. Entries are kept in insertion order; nothing sorts them, but
//! a tree must round-trip through parse/serialize unchanged.

use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};

use crate::objectstore::ObjectStore;

pub const MODE_FILE: &str = "100644";
pub const MODE_DIR: &str = "40000";

pub const KIND_BLOB: &str = "blob";
pub const KIND_TREE: &str = "tree";

/// Trees whose payload is this small or smaller are not persisted; their
/// hash is left empty. In practice this only happens for empty directories.
const MIN_PERSISTED_LEN: usize = 2;

/// A single entry in a tree object.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEntry {
    pub mode: String,
    pub kind: String,
    pub hash: String,
    pub name: String,
}

impl TreeEntry {
    pub fn file(name: String, hash: String) -> Self {
        Self {
            mode: MODE_FILE.to_string(),
            kind: KIND_BLOB.to_string(),
            hash,
            name,
        }
    }

    pub fn directory(name: String, hash: String) -> Self {
        Self {
            mode: MODE_DIR.to_string(),
            kind: KIND_TREE.to_string(),
            hash,
            name,
        }
    }

    pub fn is_tree(&self) -> bool {
        self.kind == KIND_TREE
    }

    pub fn is_blob(&self) -> bool {
        self.kind == KIND_BLOB
    }

    fn serialize(&self) -> String {
        format!("{}\0{}\0{}\0{}", self.mode, self.kind, self.hash, self.name)
    }

    fn parse(line: &str) -> Result<Self> {
        let mut parts = line.splitn(4, '\0');
        let mode = parts.next().context("tree entry missing mode")?.to_string();
        let kind = parts.next().context("tree entry missing kind")?.to_string();
        let hash = parts.next().context("tree entry missing hash")?.to_string();
        let name = parts.next().context("tree entry missing name")?.to_string();
        Ok(Self { mode, kind, hash, name })
    }
}

/// An in-memory tree object: an ordered list of entries.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, entry: TreeEntry) {
        self.entries.push(entry);
    }

    pub fn serialize(&self) -> Vec<u8> {
        self.entries
            .iter()
            .map(TreeEntry::serialize)
            .collect::<Vec<_>>()
            .join("\n")
            .into_bytes()
    }

    pub fn parse(content: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(content);
        let mut entries = Vec::new();
        for line in text.split('\n').filter(|l| !l.is_empty()) {
            entries.push(TreeEntry::parse(line)?);
        }
        Ok(Self { entries })
    }

    /// Persist this tree via the object store, honoring the "too small to
    /// persist" rule. Returns an empty hash when skipped.
    pub fn store(&self, store: &ObjectStore) -> Result<String> {
        let payload = self.serialize();
        if payload.len() <= MIN_PERSISTED_LEN {
            return Ok(String::new());
        }
        store.put_raw(&payload)
    }
}

/// The in-memory result of recursively parsing a tree hash (component D,
/// parser half).
#[derive(Debug, Clone)]
pub struct DirTree {
    pub name: String,
    pub hash: String,
    pub subdirs: Vec<DirTree>,
    pub file_hashes: HashMap<String, String>,
}

/// Recursively read `hash` as a tree, producing an in-memory directory
/// tree. `name` is the label to give the root node (callers typically pass
/// the repository root directory name).
pub fn parse_tree(store: &ObjectStore, hash: &str, name: &str) -> Result<DirTree> {
    let mut subdirs = Vec::new();
    let mut file_hashes = HashMap::new();

    if !hash.is_empty() {
        let content = store.get(hash)?;
        let tree = Tree::parse(&content)?;
        for entry in &tree.entries {
            if entry.is_tree() {
                subdirs.push(parse_tree(store, &entry.hash, &entry.name)?);
            } else {
                file_hashes.insert(entry.name.clone(), entry.hash.clone());
            }
        }
    }

    Ok(DirTree {
        name: name.to_string(),
        hash: hash.to_string(),
        subdirs,
        file_hashes,
    })
}

/// Flatten a [`DirTree`] into a `relative-path -> blob-hash` map, with
/// paths joined by `/` relative to the tree's own root (the root's `name`
/// is not included in the paths).
pub fn flatten(tree: &DirTree) -> HashMap<String, String> {
    let mut out = HashMap::new();
    flatten_into(tree, "", &mut out);
    out
}

fn flatten_into(tree: &DirTree, prefix: &str, out: &mut HashMap<String, String>) {
    for (name, hash) in &tree.file_hashes {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}/{name}")
        };
        out.insert(path, hash.clone());
    }
    for sub in &tree.subdirs {
        let sub_prefix = if prefix.is_empty() {
            sub.name.clone()
        } else {
            format!("{prefix}/{}", sub.name)
        };
        flatten_into(sub, &sub_prefix, out);
    }
}

/// Build a tree object from a flat ordered sequence of relative paths (each
/// prefixed by the repository root directory name, e.g. `myrepo/a.txt`)
/// and a resolver from path to blob hash. Implements spec component D's
/// builder algorithm: strip the common root prefix, partition into direct
/// files vs. subdirectory-prefixed entries, group the latter by top-level
/// directory name, recurse, and emit/store the resulting payload.
pub fn build_from_index(
    store: &ObjectStore,
    root_prefixed_paths: &[String],
    resolve: &dyn Fn(&str) -> Option<String>,
) -> Result<String> {
    if root_prefixed_paths.is_empty() {
        return Ok(String::new());
    }
    // All entries share the same first path segment: the repository root
    // directory name. The recursion below grows `prefix` one directory at
    // a time and always strips it back off before classifying an entry.
    let root_name = root_prefixed_paths[0]
        .split('/')
        .next()
        .unwrap_or_default();
    build_tree_for_prefix(store, root_name, root_prefixed_paths, resolve)
}

fn build_tree_for_prefix(
    store: &ObjectStore,
    prefix: &str,
    paths: &[String],
    resolve: &dyn Fn(&str) -> Option<String>,
) -> Result<String> {
    let lead = format!("{prefix}/");
    let mut direct_files: Vec<(String, String)> = Vec::new(); // (name, full path)
    let mut subdir_order: Vec<String> = Vec::new();
    let mut subdir_groups: HashMap<String, Vec<String>> = HashMap::new(); // top dir -> full paths

    for path in paths {
        let rel = path.strip_prefix(lead.as_str()).unwrap_or(path.as_str());
        match rel.find('/') {
            None => direct_files.push((rel.to_string(), path.clone())),
            Some(idx) => {
                let top = rel[..idx].to_string();
                if !subdir_groups.contains_key(&top) {
                    subdir_order.push(top.clone());
                }
                subdir_groups.entry(top).or_default().push(path.clone());
            }
        }
    }

    let mut tree = Tree::new();

    for (name, path) in &direct_files {
        let hash = resolve(path)
            .ok_or_else(|| anyhow!("no staged blob hash found for path '{path}'"))?;
        tree.add_entry(TreeEntry::file(name.clone(), hash));
    }

    for dir_name in &subdir_order {
        let child_paths = &subdir_groups[dir_name];
        let child_prefix = format!("{prefix}/{dir_name}");
        let child_hash = build_tree_for_prefix(store, &child_prefix, child_paths, resolve)?;
        if !child_hash.is_empty() {
            tree.add_entry(TreeEntry::directory(dir_name.clone(), child_hash));
        }
    }

    tree.store(store)
}

/// Build the root tree for the current index contents: the index's
/// internal `/`-separated paths are prefixed with `root_name` and handed
/// to [`build_from_index`]. Returns an empty hash for an empty index.
pub fn build_root_tree(
    store: &ObjectStore,
    root_name: &str,
    index: &crate::index::Index,
) -> Result<String> {
    if index.entries().is_empty() {
        return Ok(String::new());
    }
    let lead = format!("{root_name}/");
    // Walk the index's own entry order (insertion order), not a HashMap's,
    // so sibling order within a tree — and therefore the tree/commit hash
    // — is reproducible across runs (spec §3, §9).
    let root_prefixed: Vec<String> = index
        .entries()
        .iter()
        .map(|e| format!("{lead}{}", e.path))
        .collect();
    let hash_map = index.to_hash_map();
    build_from_index(store, &root_prefixed, &|full_path: &str| {
        let rel = full_path.strip_prefix(lead.as_str()).unwrap_or(full_path);
        hash_map.get(rel).cloned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Repository;
    use tempfile::tempdir;

    #[test]
    fn entry_round_trips_through_serialize_parse() {
        let mut tree = Tree::new();
        tree.add_entry(TreeEntry::file("a.txt".to_string(), "a".repeat(40)));
        tree.add_entry(TreeEntry::directory("sub".to_string(), "b".repeat(40)));

        let payload = tree.serialize();
        let parsed = Tree::parse(&payload).unwrap();
        assert_eq!(parsed.entries, tree.entries);
    }

    #[test]
    fn build_and_parse_round_trips_leaf_hashes() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let store = ObjectStore::new(&repo);

        let a_hash = store.put_blob(b"hello").unwrap();
        let b_hash = store.put_blob(b"world").unwrap();

        let mut hashes = HashMap::new();
        hashes.insert("repo/a.txt".to_string(), a_hash.clone());
        hashes.insert("repo/sub/b.txt".to_string(), b_hash.clone());

        let paths = vec!["repo/a.txt".to_string(), "repo/sub/b.txt".to_string()];
        let root_hash =
            build_from_index(&store, &paths, &|p| hashes.get(p).cloned()).unwrap();
        assert!(!root_hash.is_empty());

        let dir_tree = parse_tree(&store, &root_hash, "repo").unwrap();
        let flat = flatten(&dir_tree);
        assert_eq!(flat.get("a.txt"), Some(&a_hash));
        assert_eq!(flat.get("sub/b.txt"), Some(&b_hash));
    }

    #[test]
    fn empty_tree_is_not_persisted() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let store = ObjectStore::new(&repo);
        let tree = Tree::new();
        assert_eq!(tree.store(&store).unwrap(), "");
    }

    #[test]
    fn build_root_tree_from_index_round_trips() {
        use crate::index::{Index, IndexEntry};

        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let store = ObjectStore::new(&repo);

        let a_hash = store.put_blob(b"hello").unwrap();
        let b_hash = store.put_blob(b"world").unwrap();

        let mut index = Index::new();
        index.upsert(IndexEntry::new("a.txt", a_hash.clone(), "1"));
        index.upsert(IndexEntry::new("sub/b.txt", b_hash.clone(), "2"));

        let root_hash = build_root_tree(&store, "repo", &index).unwrap();
        assert!(!root_hash.is_empty());

        let dir_tree = parse_tree(&store, &root_hash, "repo").unwrap();
        let flat = flatten(&dir_tree);
        assert_eq!(flat.get("a.txt"), Some(&a_hash));
        assert_eq!(flat.get("sub/b.txt"), Some(&b_hash));
    }

    #[test]
    fn build_root_tree_empty_index_yields_empty_hash() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let store = ObjectStore::new(&repo);
        let index = crate::index::Index::new();
        assert_eq!(build_root_tree(&store, "repo", &index).unwrap(), "");
    }
}
