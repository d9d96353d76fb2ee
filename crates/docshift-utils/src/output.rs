use std::{
  fs,
  io,
  path::{Path, PathBuf},
};

use log::{debug, info, warn};

use crate::error::UtilsError;

/// A freshly recreated output directory that is removed again unless the run
/// that owns it calls [`OutputDir::commit`].
///
/// Dropping an uncommitted guard, whether through an early `?` return or a
/// panic unwinding past it, deletes the directory so a failed run never
/// leaves a partial tree behind.
#[derive(Debug)]
pub struct OutputDir {
  path:      PathBuf,
  committed: bool,
}

impl OutputDir {
  /// Delete anything at `path` and create it again as an empty directory.
  ///
  /// # Errors
  ///
  /// Returns an error if the previous contents cannot be removed or the
  /// directory cannot be created.
  pub fn prepare(path: &Path) -> Result<Self, UtilsError> {
    if path.exists() {
      fs_extra::dir::remove(path).map_err(|e| {
        UtilsError::Output {
          path:   path.to_path_buf(),
          source: io::Error::other(e.to_string()),
        }
      })?;
      info!("Removed previous output directory: {}", path.display());
    }

    fs::create_dir_all(path).map_err(|source| {
      UtilsError::Output {
        path: path.to_path_buf(),
        source,
      }
    })?;

    Ok(Self {
      path:      path.to_path_buf(),
      committed: false,
    })
  }

  #[must_use]
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Keep the directory and its contents.
  pub fn commit(mut self) -> PathBuf {
    self.committed = true;
    self.path.clone()
  }
}

impl Drop for OutputDir {
  fn drop(&mut self) {
    if self.committed {
      return;
    }

    match fs::remove_dir_all(&self.path) {
      Ok(()) => {
        debug!("Removed incomplete output directory: {}", self.path.display());
      },
      Err(e) if e.kind() == io::ErrorKind::NotFound => {},
      Err(e) => {
        warn!(
          "Failed to remove incomplete output directory {}: {e}",
          self.path.display()
        );
      },
    }
  }
}
