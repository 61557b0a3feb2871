// ABOUTME: Removal of the restricted library and a scan for imports that would break without it.
// ABOUTME: An import is safe only when some enclosing block is a `try:`.

use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::{WorkspaceError, remove_existing, walk};

/// A source line importing the restricted library outside any `try:` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSite {
    /// Path relative to the scanned root.
    pub path: PathBuf,
    /// 1-based line number.
    pub line: usize,
    pub text: String,
}

impl fmt::Display for ImportSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.path.display(), self.line, self.text)
    }
}

/// Delete `root/<library>`. Returns false when it was not there.
pub fn strip_library(root: &Path, library: &str) -> Result<bool, WorkspaceError> {
    if !root.is_dir() {
        return Err(WorkspaceError::Missing(root.to_path_buf()));
    }
    remove_existing(&root.join(library))
}

/// Find every import of `library` in the `*.py` files below `root` that is not
/// inside a `try:` block.
pub fn find_unguarded_imports(
    root: &Path,
    library: &str,
) -> Result<Vec<ImportSite>, WorkspaceError> {
    if !root.is_dir() {
        return Err(WorkspaceError::Missing(root.to_path_buf()));
    }

    let pattern = import_pattern(library)?;
    let mut sites = Vec::new();

    for entry in walk(root)? {
        if entry.is_dir || entry.relative.extension().is_none_or(|ext| ext != "py") {
            continue;
        }
        let path = root.join(&entry.relative);
        let bytes = fs::read(&path).map_err(WorkspaceError::io("failed to read", &path))?;
        let source = String::from_utf8_lossy(&bytes);

        sites.extend(
            unguarded_lines(&source, &pattern)
                .into_iter()
                .map(|(line, text)| ImportSite {
                    path: entry.relative.clone(),
                    line,
                    text,
                }),
        );
    }

    Ok(sites)
}

fn import_pattern(library: &str) -> Result<Regex, regex::Error> {
    let lib = regex::escape(library);
    Regex::new(&format!(
        r"^\s*(?:import\s+(?:[\w.]+\s*,\s*)*{lib}\b|from\s+{lib}(?:\.[\w.]+)?\s+import\b)"
    ))
}

/// (line number, trimmed text) of each matching line with no enclosing `try:`.
fn unguarded_lines(source: &str, pattern: &Regex) -> Vec<(usize, String)> {
    let lines: Vec<&str> = source.lines().collect();
    let mut found = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        if pattern.is_match(line) && !inside_try(&lines[..index], indent(line)) {
            found.push((index + 1, line.trim().to_string()));
        }
    }

    found
}

/// Walk outwards through the enclosing blocks of a line at `depth`.
fn inside_try(preceding: &[&str], depth: usize) -> bool {
    let mut depth = depth;
    for line in preceding.iter().rev() {
        if depth == 0 {
            break;
        }
        let code = line.trim();
        if code.is_empty() || code.starts_with('#') {
            continue;
        }
        let level = indent(line);
        if level < depth {
            if is_try_header(code) {
                return true;
            }
            depth = level;
        }
    }
    false
}

fn is_try_header(code: &str) -> bool {
    let code = code.split('#').next().unwrap_or("").trim_end();
    code == "try:"
}

fn indent(line: &str) -> usize {
    line.len() - line.trim_start().len()
}
