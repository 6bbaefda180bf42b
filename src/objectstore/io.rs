//! Byte I/O & Compression (component A).
//!
//! Atomic-ish file read/write, directory walking, hashing and the
//! deflate/inflate pair everything else in the object store sits on.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use sha1::{Digest, Sha1};

use crate::RIT_DIR;

/// Write `bytes` to `path`, creating parent directories as needed.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

/// Read the full contents of `path`.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Remove `path` if it exists; a no-op otherwise.
pub fn delete_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
    }
}

/// Walk `root` recursively, skipping the repository metadata directory,
/// yielding file paths only (no directories).
pub fn walk_directory(root: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.file_name() != RIT_DIR)
    {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if entry.file_type().is_file() {
            out.push(entry.path().to_path_buf());
        }
    }
    Ok(out)
}

/// The filesystem modification time of `path`, as the string form used in
/// index entries (seconds since epoch).
pub fn mtime_of_path(path: &Path) -> Result<String> {
    let meta = fs::metadata(path).with_context(|| format!("failed to stat {}", path.display()))?;
    let modified = meta
        .modified()
        .with_context(|| format!("no mtime available for {}", path.display()))?;
    let since_epoch = modified
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    Ok(since_epoch.as_secs().to_string())
}

/// Hex-encoded SHA-1 digest of `bytes`.
pub fn sha1_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Deflate-compress `bytes`.
pub fn deflate(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).context("deflate write failed")?;
    encoder.finish().context("deflate finish failed")
}

/// The outcome of the triple-fallback decompression state machine.
///
/// The original persisted some blobs through a non-binary write path, so a
/// single `inflate` over the raw bytes doesn't always succeed. Rather than
/// hiding that behind a catch-all, each attempt is modeled explicitly.
#[derive(Debug, PartialEq, Eq)]
pub enum InflateOutcome {
    /// Raw bytes inflated successfully.
    Binary(Vec<u8>),
    /// Bytes only inflated after normalizing CRLF to LF first.
    TextCrlfNormalized(Vec<u8>),
    /// Every attempt failed; caller gets empty content back.
    GaveUp,
}

/// Inflate `compressed`, trying a raw binary read first and falling back to
/// a CRLF-normalized re-attempt before giving up.
pub fn inflate(compressed: &[u8]) -> InflateOutcome {
    if let Some(bytes) = try_inflate(compressed) {
        return InflateOutcome::Binary(bytes);
    }

    let normalized = normalize_crlf(compressed);
    if let Some(bytes) = try_inflate(&normalized) {
        return InflateOutcome::TextCrlfNormalized(bytes);
    }

    InflateOutcome::GaveUp
}

fn try_inflate(compressed: &[u8]) -> Option<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(compressed);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).ok()?;
    Some(out)
}

fn normalize_crlf(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\r' && i + 1 < bytes.len() && bytes[i + 1] == b'\n' {
            i += 1;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

/// Unwrap an [`InflateOutcome`] into plain bytes, per §7: a corrupt/partial
/// read is reported as empty content rather than propagated as an error.
pub fn inflate_or_empty(compressed: &[u8]) -> Vec<u8> {
    match inflate(compressed) {
        InflateOutcome::Binary(b) | InflateOutcome::TextCrlfNormalized(b) => b,
        InflateOutcome::GaveUp => Vec::new(),
    }
}
