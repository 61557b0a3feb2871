// ABOUTME: Deterministic zip packaging of a directory tree.
// ABOUTME: Writes to a partial file and renames it, so exactly one fresh archive remains.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use super::{WorkspaceError, remove_existing, walk};

/// What an archive run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    /// A previous archive existed and was replaced.
    pub replaced: bool,
    pub files: usize,
}

/// Package the contents of `directory` into a new zip at `archive`.
///
/// Entry names are relative to `directory` with `/` separators, sorted, and
/// carry a fixed timestamp, so the same tree always yields the same entries.
pub fn archive_fresh(directory: &Path, archive: &Path) -> Result<ArchiveSummary, WorkspaceError> {
    if !directory.is_dir() {
        return Err(WorkspaceError::Missing(directory.to_path_buf()));
    }

    let entries = walk(directory)?;
    let partial = partial_path(archive);
    remove_existing(&partial)?;

    let files = match write_zip(directory, &entries, &partial) {
        Ok(files) => files,
        Err(e) => {
            let _ = fs::remove_file(&partial);
            return Err(e);
        }
    };

    let replaced = remove_existing(archive)?;
    fs::rename(&partial, archive).map_err(WorkspaceError::io("failed to move", &partial))?;

    tracing::debug!("Archived {} files into {}", files, archive.display());

    Ok(ArchiveSummary {
        path: archive.to_path_buf(),
        replaced,
        files,
    })
}

fn write_zip(
    directory: &Path,
    entries: &[super::Entry],
    target: &Path,
) -> Result<usize, WorkspaceError> {
    let file = File::create(target).map_err(WorkspaceError::io("failed to create", target))?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let mut files = 0;
    for entry in entries {
        let name = entry_name(&entry.relative);
        if entry.is_dir {
            zip.add_directory(format!("{name}/"), options)?;
            continue;
        }

        let source = directory.join(&entry.relative);
        let mut input =
            File::open(&source).map_err(WorkspaceError::io("failed to open", &source))?;
        zip.start_file(name, options)?;
        io::copy(&mut input, &mut zip).map_err(WorkspaceError::io("failed to read", &source))?;
        files += 1;
    }

    zip.finish()?;
    Ok(files)
}

fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn partial_path(archive: &Path) -> PathBuf {
    let mut name = archive
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    archive.with_file_name(name)
}
