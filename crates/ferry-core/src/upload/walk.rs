//! Recursive enumeration of regular files under a folder.

use crate::error::TransferError;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Returns every regular file below `root`, recursing into subdirectories.
///
/// Order is whatever `read_dir` yields. Symlinks to files are included,
/// symlinks to directories are not descended into (no cycles), dangling
/// links are ignored.
pub fn walk_files(root: &Path) -> Result<Vec<PathBuf>, TransferError> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir).map_err(TransferError::io("read directory", &dir))?;
        for entry in entries {
            let entry = entry.map_err(TransferError::io("read directory", &dir))?;
            let path = entry.path();
            let meta = match fs::metadata(&path) {
                Ok(m) => m,
                Err(e) => {
                    tracing::debug!(path = %path.display(), "skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let is_link = entry.file_type().map(|t| t.is_symlink()).unwrap_or(false);
            if meta.is_dir() {
                if is_link {
                    tracing::debug!(path = %path.display(), "not following directory symlink");
                    continue;
                }
                pending.push(path);
            } else if meta.is_file() {
                files.push(path);
            }
        }
    }
    Ok(files)
}

/// `path` relative to `root`, joined with `/` whatever the platform separator.
///
/// Returns `None` when `path` is not below `root`.
pub fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
