//! Discovery: find spreadsheet files below the input directory.
//!
//! The walk is lazy: [`Discovery`] wraps a `walkdir` iterator and yields
//! matching files one at a time. Each item carries its subdirectory relative
//! to the input root so the driver can mirror the layout in the output tree.
//!
//! Entries are visited in file-name order within each directory, which keeps
//! batch output (and log order) identical between runs on the same tree.

use crate::error::BatchError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Prefix of the lock files Excel / LibreOffice leave next to open workbooks.
const LOCK_FILE_PREFIX: &str = "~$";

/// A spreadsheet found during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Path of the file (the input root joined with its relative location).
    pub path: PathBuf,
    /// Directory of the file relative to the input root; empty at the root.
    pub relative_dir: PathBuf,
}

impl DiscoveredFile {
    fn new(root: &Path, path: PathBuf) -> Self {
        let relative_dir = path
            .parent()
            .and_then(|parent| parent.strip_prefix(root).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self { path, relative_dir }
    }

    /// File name without its extension, used as the base of output names.
    pub fn base_name(&self) -> String {
        base_name(&self.path)
    }
}

/// Lazy iterator over the spreadsheet files under a root directory.
pub struct Discovery {
    root: PathBuf,
    extensions: Vec<String>,
    inner: walkdir::IntoIter,
}

impl Iterator for Discovery {
    type Item = DiscoveredFile;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", self.root.display(), e);
                    continue;
                }
            };

            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }

            let path = entry.path();
            if is_lock_file(path) {
                debug!("Ignoring editor lock file {}", path.display());
                continue;
            }
            if !has_extension(path, &self.extensions) {
                continue;
            }

            return Some(DiscoveredFile::new(&self.root, entry.into_path()));
        }
    }
}

/// Start discovering spreadsheet files under `root`.
///
/// # Arguments
/// * `root`       — input directory
/// * `recursive`  — descend into subdirectories; otherwise direct children only
/// * `extensions` — accepted extensions without the dot, compared case-insensitively
///
/// # Errors
/// [`BatchError::InputDirNotFound`] when `root` is missing or not a directory.
/// Nothing is read before this check.
pub fn discover(
    root: &Path,
    recursive: bool,
    extensions: &[String],
) -> Result<Discovery, BatchError> {
    if !root.is_dir() {
        return Err(BatchError::InputDirNotFound {
            path: root.to_path_buf(),
        });
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let inner = WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    Ok(Discovery {
        root: root.to_path_buf(),
        extensions: extensions.to_vec(),
        inner,
    })
}

/// Case-insensitive extension check.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

/// File stem as a (lossy) string.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_lock_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(LOCK_FILE_PREFIX))
}
