use std::{
  fs,
  path::{Path, PathBuf},
};

use docshift_rewrite::{LineEnding, join_lines, split_lines};

use crate::error::UtilsError;

/// Read a file and split it into lines.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub fn load_lines(path: &Path) -> Result<Vec<String>, UtilsError> {
  let text = fs::read_to_string(path).map_err(|source| {
    UtilsError::Read {
      path: path.to_path_buf(),
      source,
    }
  })?;
  Ok(split_lines(&text))
}

/// Join `lines` with `ending` and write them to `destination`, creating
/// parent directories and replacing any existing file.
///
/// # Errors
///
/// Returns an error if a parent directory cannot be created or the file
/// cannot be written.
pub fn write_lines<S: AsRef<str>>(
  lines: &[S],
  destination: &Path,
  ending: LineEnding,
) -> Result<(), UtilsError> {
  if let Some(parent) = destination.parent() {
    fs::create_dir_all(parent).map_err(|source| {
      UtilsError::Write {
        path: parent.to_path_buf(),
        source,
      }
    })?;
  }

  fs::write(destination, join_lines(lines, ending)).map_err(|source| {
    UtilsError::Write {
      path: destination.to_path_buf(),
      source,
    }
  })
}

/// Map `source` from under `strip_root` to the same relative location under
/// `output_root`.
///
/// # Errors
///
/// Returns [`UtilsError::Mirror`] if `source` is not inside `strip_root`.
pub fn mirror_path(
  source: &Path,
  strip_root: &Path,
  output_root: &Path,
) -> Result<PathBuf, UtilsError> {
  source
    .strip_prefix(strip_root)
    .map(|rel| output_root.join(rel))
    .map_err(|_| {
      UtilsError::Mirror {
        path: source.to_path_buf(),
        root: strip_root.to_path_buf(),
      }
    })
}
