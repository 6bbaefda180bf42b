//! # Rit - a minimal Git-style version control core
//!
//! Rit is a content-addressed object store layered with a working-copy,
//! index and branch abstraction: `init -> add -> commit -> branch ->
//! checkout -> merge` against a local filesystem.
//!
//! ## Architecture Overview
//!
//! Every piece of data is stored as an "object" identified by its SHA-1
//! hash. Object kinds:
//!
//! - **Blob**: raw file contents
//! - **Tree**: a directory listing, mapping names to blob/tree hashes
//! - **Commit**: a root tree, zero/one/two parent commits, a message
//!
//! ## Repository Structure
//!
//! ```text
//! .rit/
//! ├── HEAD            # "ref: refs\heads\<branch>" or a raw commit hash
//! ├── config           # fixed content, see Repository::CONFIG_CONTENT
//! ├── description
//! ├── branches/  hooks/  info/  logs/
//! ├── objects/
//! │   ├── info/  pack/
//! │   └── ab/cdef...   # 2-char fan-out, zlib compressed
//! ├── refs/
//! │   ├── heads/<branch>   # contains a commit hash
//! │   └── tags/
//! └── index            # staging area, line-oriented text format
//! ```
//!
//! A bare repository places the same children directly at the working
//! directory root (no `.rit` prefix) and skips `objects/info` and
//! `objects/pack`.

pub mod commands;
pub mod commit_graph;
pub mod diff;
pub mod error;
pub mod index;
pub mod objects;
pub mod objectstore;
pub mod pathutil;
pub mod refs;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use error::RitError;

/// The name of the rit metadata directory (like `.git`).
pub const RIT_DIR: &str = ".rit";

/// The branch `init` points `HEAD` at.
pub const DEFAULT_BRANCH: &str = "master";

const CONFIG_CONTENT: &str = "[core]\n\trepositoryformatversion = 0\n\tfilemode = false\n\tbare = false\n\tlogallrefupdates = true\n\tsymlinks = false\n\tignorecase = true\n\thideDotFiles = dotGitOnly\n";

const DESCRIPTION_CONTENT: &str =
    "Unnamed repository; edit this file 'description' to name the repository.\n";

const EXCLUDE_CONTENT: &str = "# rit ls-files --others --exclude-from=.rit/info/exclude\n# Lines that start with '#' are comments.\n# For a project mostly in C, the following would be a good set of\n# exclude patterns (uncomment them if you want to use them):\n# *.[oa]\n# *~\n";

/// Represents a rit repository: the working copy root plus the metadata
/// directory (`.rit`, or the root itself for a bare repository).
#[derive(Debug, Clone)]
pub struct Repository {
    /// The root directory of the repository (where `.rit` lives, or the
    /// bare repository root).
    pub root: PathBuf,
    /// The metadata directory path.
    pub rit_dir: PathBuf,
}

impl Repository {
    /// Find the repository root by walking up from the current directory.
    pub fn find() -> Result<Self> {
        let current_dir = std::env::current_dir()?;
        Self::find_from(&current_dir)
    }

    /// Find repository starting from a specific path.
    pub fn find_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            let rit_dir = current.join(RIT_DIR);
            if rit_dir.is_dir() {
                return Ok(Self {
                    root: current,
                    rit_dir,
                });
            }

            if !current.pop() {
                anyhow::bail!(RitError::NotARepository);
            }
        }
    }

    /// Initialize a non-bare repository at `path`. A no-op (beyond a
    /// message) if one already exists there.
    pub fn init(path: &Path) -> Result<Self> {
        let root = path.to_path_buf();
        let rit_dir = root.join(RIT_DIR);

        if rit_dir.join("HEAD").exists() {
            println!("Reinitialized existing rit repository in {}", rit_dir.display());
        } else {
            create_layout(&rit_dir, false)?;
            println!("Initialized empty rit repository in {}", rit_dir.display());
        }

        Ok(Self { root, rit_dir })
    }

    /// Initialize a bare repository at `path`: the same children land
    /// directly at `path` with no `.rit` prefix, and `objects/info` /
    /// `objects/pack` are not created.
    pub fn init_bare(path: &Path) -> Result<Self> {
        let root = path.to_path_buf();

        if root.join("HEAD").exists() {
            println!("Reinitialized existing bare rit repository in {}", root.display());
        } else {
            create_layout(&root, true)?;
            println!("Initialized empty bare rit repository in {}", root.display());
        }

        Ok(Self {
            root: root.clone(),
            rit_dir: root,
        })
    }

    /// The base name of the working-copy root directory, used as the
    /// synthetic root prefix tree-building expects.
    pub fn root_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "repo".to_string())
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.rit_dir.join("objects")
    }

    pub fn refs_dir(&self) -> PathBuf {
        self.rit_dir.join("refs")
    }

    pub fn heads_dir(&self) -> PathBuf {
        self.refs_dir().join("heads")
    }

    pub fn tags_dir(&self) -> PathBuf {
        self.refs_dir().join("tags")
    }

    pub fn head_path(&self) -> PathBuf {
        self.rit_dir.join("HEAD")
    }

    pub fn index_path(&self) -> PathBuf {
        self.rit_dir.join("index")
    }

    pub fn config_path(&self) -> PathBuf {
        self.rit_dir.join("config")
    }

    pub fn branch_path(&self, name: &str) -> PathBuf {
        self.heads_dir().join(name)
    }
}

fn create_layout(meta_dir: &Path, bare: bool) -> Result<()> {
    let mut dirs = vec![
        meta_dir.join("branches"),
        meta_dir.join("hooks"),
        meta_dir.join("info"),
        meta_dir.join("logs"),
        meta_dir.join("refs").join("heads"),
        meta_dir.join("refs").join("tags"),
    ];
    if bare {
        dirs.push(meta_dir.join("objects"));
    } else {
        dirs.push(meta_dir.join("objects").join("info"));
        dirs.push(meta_dir.join("objects").join("pack"));
    }

    for dir in &dirs {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }

    fs::write(meta_dir.join("config"), CONFIG_CONTENT).context("failed to write config")?;
    fs::write(meta_dir.join("description"), DESCRIPTION_CONTENT)
        .context("failed to write description")?;
    fs::write(
        meta_dir.join("HEAD"),
        format!("ref: refs\\heads\\{DEFAULT_BRANCH}"),
    )
    .context("failed to write HEAD")?;
    fs::write(meta_dir.join("info").join("exclude"), EXCLUDE_CONTENT)
        .context("failed to write info/exclude")?;

    Ok(())
}
