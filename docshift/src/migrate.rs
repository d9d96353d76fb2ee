use std::path::{Path, PathBuf};

use docshift_config::Config;
use docshift_rewrite::{AdmonitionRewriter, LineEnding};
use docshift_utils::{
  OutputDir,
  is_markdown,
  load_lines,
  mirror_path,
  scan_files,
  write_lines,
};
use log::{debug, info, trace, warn};

use crate::error::MigrateError;

/// Counts collected over one migration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationSummary {
  /// Files found below the source directory.
  pub scanned: usize,

  /// Markdown files rewritten (and written, unless dry-running).
  pub migrated: usize,

  /// Files skipped for not being markdown.
  pub skipped: usize,

  /// Admonition blocks rewritten across all files.
  pub blocks: usize,

  /// Markdown files that contained at least one admonition.
  pub changed: usize,
}

/// Migrate every markdown file under the configured source directory into a
/// freshly recreated output directory.
///
/// The output directory is deleted before anything is scanned. Files are
/// processed one at a time and the first failure aborts the run, in which
/// case the output directory is removed again.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the output directory
/// cannot be prepared, the source tree cannot be scanned, or any markdown
/// file cannot be read, rewritten or written.
pub fn migrate(config: &Config) -> Result<MigrationSummary, MigrateError> {
  config.validate()?;

  let source_root = config.source_root()?;
  let output_root = config.output_root()?;
  let strip_root = strip_root(config)?;

  let rewriter = config.rewriter();
  if rewriter.table().is_empty() {
    warn!("Marker table is empty, markdown files will be copied unchanged");
  }

  info!("Source directory: {}", source_root.display());
  info!("Output directory: {}", output_root.display());

  let output = if config.dry_run {
    info!("Dry run, nothing will be written");
    None
  } else {
    Some(OutputDir::prepare(&output_root)?)
  };

  let files = scan_files(&source_root)?;
  info!("Found {} files", files.len());

  let mut summary = MigrationSummary {
    scanned: files.len(),
    ..MigrationSummary::default()
  };

  for path in &files {
    if !is_markdown(path, &config.markdown_marker) {
      trace!("Skipping non-markdown file: {}", path.display());
      summary.skipped += 1;
      continue;
    }

    let destination =
      mirror_path(path, &strip_root, &output_root).map_err(|source| {
        MigrateError::File {
          path: path.clone(),
          source,
        }
      })?;

    let blocks = migrate_file(
      path,
      &rewriter,
      output.as_ref().map(|_| destination.as_path()),
      config.line_ending,
    )?;

    summary.migrated += 1;
    summary.blocks += blocks;
    if blocks > 0 {
      summary.changed += 1;
    }
  }

  if let Some(output) = output {
    output.commit();
  }

  info!(
    "Migrated {} markdown files ({} with admonitions, {} blocks), skipped {} \
     other files",
    summary.migrated, summary.changed, summary.blocks, summary.skipped
  );

  Ok(summary)
}

/// Load, rewrite and (when `destination` is set) write one file. Returns the
/// number of blocks rewritten.
fn migrate_file(
  path: &Path,
  rewriter: &AdmonitionRewriter,
  destination: Option<&Path>,
  ending: LineEnding,
) -> Result<usize, MigrateError> {
  let file_error = |source| {
    MigrateError::File {
      path: path.to_path_buf(),
      source,
    }
  };

  let lines = load_lines(path).map_err(file_error)?;
  let rewrite = rewriter.rewrite(&lines).map_err(|source| {
    MigrateError::Rewrite {
      path: path.to_path_buf(),
      source,
    }
  })?;

  if let Some(destination) = destination {
    write_lines(&rewrite.lines, destination, ending).map_err(file_error)?;
    debug!(
      "Migrated {} -> {} ({} blocks)",
      path.display(),
      destination.display(),
      rewrite.blocks
    );
  } else {
    debug!("Checked {} ({} blocks)", path.display(), rewrite.blocks);
  }

  Ok(rewrite.blocks)
}

/// Prefix removed from source paths before they are re-rooted under the
/// output directory: the base directory, or the source directory itself when
/// it lies outside the base directory.
///
/// # Errors
///
/// Returns an error if the configured directories cannot be resolved.
pub fn strip_root(config: &Config) -> Result<PathBuf, MigrateError> {
  let base_dir = config.base_dir()?;
  let source_root = config.source_root()?;

  if source_root.starts_with(&base_dir) {
    Ok(base_dir)
  } else {
    warn!(
      "Source directory {} is outside {}, mirroring paths relative to the \
       source directory",
      source_root.display(),
      base_dir.display()
    );
    Ok(source_root)
  }
}
