use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::{Error, Result};

/// Leading marker on a list entry that excludes it from comparison.
pub const SKIP_MARKER: char = '#';

/// A file to compare, and where each loader should read it from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    /// The entry as found, skip marker included. Used to label the report.
    pub label: String,

    pub reference: PathBuf,
    pub candidate: PathBuf,

    /// Explicitly excluded. The file is still sized, but never loaded.
    pub skip: bool,
}

impl Target {
    /// Both loaders read the same file.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        Self {
            label: path.display().to_string(),
            candidate: path.clone(),
            reference: path,
            skip: false,
        }
    }

    /// Point the candidate loader at the same relative location under a different tree.
    pub fn relocate(mut self, base: &Path, candidate_root: &Path) -> Result<Self> {
        let relative = self
            .reference
            .strip_prefix(base)
            .map_err(|_| Error::NotUnderBase(self.reference.clone(), base.to_path_buf()))?;
        self.candidate = candidate_root.join(relative);

        Ok(self)
    }
}

/// Every file under `base`, in sorted order.
///
/// Symbolic links to directories are followed. A directory reached twice through links is only
/// walked once.
///
pub fn walk(base: &Path) -> Result<Vec<PathBuf>> {
    let mut files = vec![];
    let mut seen = HashSet::new();
    walk_into(base, &mut files, &mut seen)?;
    files.sort();

    Ok(files)
}

fn walk_into(dir: &Path, files: &mut Vec<PathBuf>, seen: &mut HashSet<PathBuf>) -> Result<()> {
    let canonical = fs::canonicalize(dir).map_err(|err| Error::io(dir, err))?;
    if !seen.insert(canonical) {
        debug!(dir = %dir.display(), "already walked");
        return Ok(());
    }

    let entries = fs::read_dir(dir).map_err(|err| Error::io(dir, err))?;
    for entry in entries {
        let path = entry.map_err(|err| Error::io(dir, err))?.path();
        // fs::metadata follows links, so linked directories are descended into.
        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => walk_into(&path, files, seen)?,
            Ok(_) => files.push(path),
            Err(err) => warn!(path = %path.display(), %err, "dangling link"),
        }
    }

    Ok(())
}

/// Files under `base`, optionally only those with the given extension.
pub fn find_targets(base: &Path, extension: Option<&str>) -> Result<Vec<Target>> {
    let targets = walk(base)?
        .into_iter()
        .filter(|path| match extension {
            Some(wanted) => path.extension().map_or(false, |ext| ext == wanted),
            None => true,
        })
        .map(Target::new)
        .collect();

    Ok(targets)
}

/// Parse a list of files, one per line.
///
/// Blank lines are dropped and surrounding whitespace is trimmed. An entry starting with
/// `SKIP_MARKER` is kept, for the report, but flagged as skipped. Relative entries are resolved
/// against `base`.
///
pub fn parse_list(text: &str, base: &Path) -> Vec<Target> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (path, skip) = match line.strip_prefix(SKIP_MARKER) {
                Some(rest) => (rest.trim(), true),
                None => (line, false),
            };
            let path = base.join(path);
            Target {
                label: line.to_string(),
                candidate: path.clone(),
                reference: path,
                skip,
            }
        })
        .collect()
}

/// Read a list file. Relative entries are relative to the directory holding the list.
pub fn read_list(path: &Path) -> Result<Vec<Target>> {
    let text = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));

    Ok(parse_list(&text, base))
}
