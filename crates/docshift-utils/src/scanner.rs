use std::path::{Path, PathBuf};

use log::trace;
use walkdir::WalkDir;

use crate::error::UtilsError;

/// Recursively collect every regular file below `root`.
///
/// Directories are descended into but never returned. Entries are visited in
/// file name order so repeated runs log in the same order. Symbolic links are
/// followed.
///
/// # Errors
///
/// Returns an error if `root` is not a directory or any entry below it cannot
/// be read. A partial listing is never returned.
pub fn scan_files(root: &Path) -> Result<Vec<PathBuf>, UtilsError> {
  if !root.is_dir() {
    return Err(UtilsError::NotADirectory(root.to_path_buf()));
  }

  let mut files = Vec::with_capacity(100);

  for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
    let entry = entry.map_err(|source| {
      UtilsError::Scan {
        path: source
          .path()
          .map_or_else(|| root.to_path_buf(), Path::to_path_buf),
        source,
      }
    })?;

    if entry.file_type().is_file() {
      files.push(entry.into_path());
    }
  }

  trace!("Found {} files under {}", files.len(), root.display());
  Ok(files)
}

/// Whether `path` should be migrated. Matches anywhere in the path, so with
/// the default `.md` marker both `guide.md` and `guide.mdx` qualify.
#[must_use]
pub fn is_markdown(path: &Path, marker: &str) -> bool {
  path.to_string_lossy().contains(marker)
}
