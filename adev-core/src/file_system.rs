//! File system helpers for the development workspace.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::Result;

/// Create a directory (and parents) unless it already exists.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        debug!("Creating directory {}", path.display());
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Remove a directory tree. Returns `false` when there was nothing to remove.
pub fn remove_dir_if_exists(path: &Path) -> Result<bool> {
    if !path.is_dir() {
        return Ok(false);
    }
    debug!("Removing directory {}", path.display());
    fs::remove_dir_all(path)?;
    Ok(true)
}

/// Remove a file. Returns `false` when there was nothing to remove.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Hex-encoded SHA-256 of a file's contents.
pub fn file_hash(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Regular files under `root`, relative to it and sorted, skipping any entry
/// whose name is in `ignore` (and everything beneath an ignored directory).
pub fn scan_files(root: &Path, ignore: &[&str]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        entry.depth() == 0
            || !ignore
                .iter()
                .any(|name| entry.file_name().to_string_lossy() == *name)
    });

    for entry in walker {
        let entry = entry.map_err(|e| io::Error::other(e.to_string()))?;
        if entry.file_type().is_file() {
            if let Ok(relative) = entry.path().strip_prefix(root) {
                files.push(relative.to_path_buf());
            }
        }
    }

    files.sort();
    Ok(files)
}
