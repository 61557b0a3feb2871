// ABOUTME: Recursive copy that always starts from an empty destination.
// ABOUTME: Stale files from a previous copy never survive into the new one.

use std::fs;
use std::path::{Path, PathBuf};

use super::{WorkspaceError, remove_existing, walk};

/// What a fresh copy did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopySummary {
    /// A previous destination existed and was removed first.
    pub replaced: bool,
    pub files: usize,
}

/// Replace `destination` with a copy of the `source` tree.
///
/// A missing destination is fine. A missing source is an error and leaves the
/// destination untouched.
pub fn copy_fresh(source: &Path, destination: &Path) -> Result<CopySummary, WorkspaceError> {
    if !source.is_dir() {
        return Err(WorkspaceError::Missing(source.to_path_buf()));
    }

    if overlaps(source, destination) {
        return Err(WorkspaceError::Overlap {
            source_dir: source.to_path_buf(),
            destination: destination.to_path_buf(),
        });
    }

    // List before touching the destination so a failing source leaves it alone.
    let entries = walk(source)?;

    let replaced = remove_existing(destination)?;
    fs::create_dir_all(destination)
        .map_err(WorkspaceError::io("failed to create", destination))?;

    let mut files = 0;
    for entry in entries {
        let from = source.join(&entry.relative);
        let to = destination.join(&entry.relative);
        if entry.is_dir {
            fs::create_dir_all(&to).map_err(WorkspaceError::io("failed to create", &to))?;
        } else {
            fs::copy(&from, &to).map_err(WorkspaceError::io("failed to copy", &from))?;
            files += 1;
        }
    }

    tracing::debug!(
        "Copied {} files from {} to {}",
        files,
        source.display(),
        destination.display()
    );

    Ok(CopySummary { replaced, files })
}

/// True when one tree contains the other, after resolving what exists on disk.
fn overlaps(source: &Path, destination: &Path) -> bool {
    let source = resolve(source);
    let destination = resolve(destination);
    destination.starts_with(&source) || source.starts_with(&destination)
}

/// Canonical form of the longest existing ancestor, with the missing tail re-attached.
fn resolve(path: &Path) -> PathBuf {
    let mut missing = Vec::new();
    let mut current = path;
    loop {
        let candidate = if current.as_os_str().is_empty() {
            Path::new(".")
        } else {
            current
        };
        if let Ok(found) = fs::canonicalize(candidate) {
            return missing.iter().rev().fold(found, |acc, part| acc.join(part));
        }
        match (current.parent(), current.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                current = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}
