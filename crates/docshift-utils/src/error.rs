use std::{io, path::PathBuf};

use thiserror::Error;

/// Error type for docshift-utils operations. Every variant names the path
/// involved.
#[derive(Debug, Error)]
pub enum UtilsError {
  #[error("Source directory does not exist or is not a directory: {}", .0.display())]
  NotADirectory(PathBuf),

  #[error("Failed to scan {}: {source}", path.display())]
  Scan {
    path:   PathBuf,
    source: walkdir::Error,
  },

  #[error("Failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("Failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },

  #[error("Failed to prepare output directory {}: {source}", path.display())]
  Output { path: PathBuf, source: io::Error },

  #[error("{} is not inside {}", path.display(), root.display())]
  Mirror { path: PathBuf, root: PathBuf },
}
