// ABOUTME: Local filesystem collaborators for preparing the release build.
// ABOUTME: Fresh copy from the share, restricted-library stripping, and fresh archiving.

mod archive;
mod copy;
mod restricted;

pub use archive::{ArchiveSummary, archive_fresh};
pub use copy::{CopySummary, copy_fresh};
pub use restricted::{ImportSite, find_unguarded_imports, strip_library};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from local workspace operations.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("directory not found: {0}")]
    Missing(PathBuf),

    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error("failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("{destination} overlaps {source_dir}; refusing to replace it")]
    Overlap {
        source_dir: PathBuf,
        destination: PathBuf,
    },

    #[error("invalid library name for import scan: {0}")]
    Pattern(#[from] regex::Error),
}

impl WorkspaceError {
    fn io<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> Self + 'a {
        move |source| WorkspaceError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// One entry below a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    relative: PathBuf,
    is_dir: bool,
}

/// Every file and directory below `root`, depth first, sorted by name.
fn walk(root: &Path) -> Result<Vec<Entry>, WorkspaceError> {
    let mut entries = Vec::new();
    walk_into(root, Path::new(""), &mut entries)?;
    Ok(entries)
}

fn walk_into(root: &Path, relative: &Path, out: &mut Vec<Entry>) -> Result<(), WorkspaceError> {
    let dir = root.join(relative);
    let mut children = fs::read_dir(&dir)
        .map_err(WorkspaceError::io("failed to read", &dir))?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<io::Result<Vec<_>>>()
        .map_err(WorkspaceError::io("failed to read", &dir))?;
    children.sort();

    for name in children {
        let child = relative.join(&name);
        let full = root.join(&child);
        let is_dir = fs::metadata(&full)
            .map_err(WorkspaceError::io("failed to inspect", &full))?
            .is_dir();
        out.push(Entry {
            relative: child.clone(),
            is_dir,
        });
        if is_dir {
            walk_into(root, &child, out)?;
        }
    }
    Ok(())
}

/// Remove a file or directory tree if it exists. Returns whether anything was removed.
fn remove_existing(path: &Path) -> Result<bool, WorkspaceError> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path)
            .map(|_| true)
            .map_err(WorkspaceError::io("failed to remove", path)),
        Ok(_) => fs::remove_file(path)
            .map(|_| true)
            .map_err(WorkspaceError::io("failed to remove", path)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(WorkspaceError::Io {
            action: "failed to inspect",
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
