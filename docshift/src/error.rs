use std::path::PathBuf;

use docshift_config::ConfigError;
use docshift_rewrite::RewriteError;
use docshift_utils::UtilsError;
use thiserror::Error;

/// Top-level error type for a migration run.
#[derive(Debug, Error)]
pub enum MigrateError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  /// Preparing the output directory or scanning the source tree failed.
  #[error(transparent)]
  Setup(#[from] UtilsError),

  /// Reading or writing one source file failed.
  #[error("Failed to migrate {}: {source}", path.display())]
  File { path: PathBuf, source: UtilsError },

  #[error("Failed to rewrite {}: {source}", path.display())]
  Rewrite { path: PathBuf, source: RewriteError },
}

impl MigrateError {
  /// The source file being processed when the error occurred, if any.
  #[must_use]
  pub fn source_file(&self) -> Option<&std::path::Path> {
    match self {
      Self::File { path, .. } | Self::Rewrite { path, .. } => Some(path),
      Self::Config(_) | Self::Setup(_) => None,
    }
  }
}
