use std::{
  env,
  fs,
  path::{Component, Path, PathBuf},
};

use docshift_rewrite::{
  AdmonitionRewriter,
  LineEnding,
  MarkerTable,
  NestingPolicy,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File names searched for in the working directory when no config file is
/// given explicitly.
pub const CONFIG_FILENAMES: &[&str] = &[
  "docshift.toml",
  "docshift.json",
  ".docshift.toml",
  ".docshift.json",
  ".config/docshift.toml",
  ".config/docshift.json",
];

/// Configuration for a docshift migration run.
///
/// [`Config`] describes where sources are read from, where the migrated tree
/// is written and how admonitions are rewritten. Fields are typically loaded
/// from a TOML or JSON config file, then adjusted with `KEY=VALUE` overrides
/// and CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Directory containing the markdown sources, relative to `base_dir`.
  pub source_dir: PathBuf,

  /// Directory the migrated tree is written to, relative to `base_dir`.
  /// Deleted and recreated on every run.
  pub output_dir: PathBuf,

  /// Prefix stripped from source paths to build output paths. Defaults to
  /// the working directory.
  pub base_dir: Option<PathBuf>,

  /// Files are migrated only if their path contains this text.
  pub markdown_marker: String,

  /// Line ending for migrated files.
  pub line_ending: LineEnding,

  /// Handling of admonition openers nested in another admonition.
  pub nesting: NestingPolicy,

  /// Rewrite and report without writing output.
  pub dry_run: bool,

  /// Admonition openers. `None` selects the built-in table.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub markers: Option<MarkerTable>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      source_dir:      PathBuf::from("11ty/docs"),
      output_dir:      PathBuf::from("temp"),
      base_dir:        None,
      markdown_marker: ".md".to_string(),
      line_ending:     LineEnding::default(),
      nesting:         NestingPolicy::default(),
      dry_run:         false,
      markers:         None,
    }
  }
}

impl Config {
  /// Read a config file, picking the parser from its extension (`.toml` or
  /// `.json`, in any case).
  ///
  /// # Errors
  ///
  /// Returns an error naming `path` if the extension is not supported, the
  /// file cannot be read, or its contents are not a valid configuration.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let extension = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_ascii_lowercase);

    let parse: fn(&str) -> Result<Self, ConfigError> = match extension
      .as_deref()
    {
      Some("toml") => |text| toml::from_str(text).map_err(ConfigError::from),
      Some("json") => {
        |text| serde_json::from_str(text).map_err(ConfigError::from)
      },
      _ => {
        return Err(ConfigError::Config(format!(
          "Unsupported config file {}: expected a .toml or .json extension",
          path.display()
        )));
      },
    };

    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!("Failed to read {}: {e}", path.display()))
    })?;
    parse(&content).map_err(|e| {
      ConfigError::Config(format!("Invalid config in {}: {e}", path.display()))
    })
  }

  /// Build the configuration for a run.
  ///
  /// Explicit config files are merged in order, later files winning. With
  /// none given, the first of [`CONFIG_FILENAMES`] found in the working
  /// directory is used, or the defaults if there is none. Overrides are
  /// applied last.
  ///
  /// # Errors
  ///
  /// Returns an error if a config file cannot be loaded or an override is
  /// malformed.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = match config_files {
      [] => {
        match Self::find_config_file() {
          Some(path) => {
            log::info!("Using config file: {}", path.display());
            Self::from_file(&path)?
          },
          None => Self::default(),
        }
      },
      [first, rest @ ..] => {
        let mut config = Self::from_file(first)?;
        for path in rest {
          config.merge(Self::from_file(path)?);
        }
        log::debug!("Merged {} config files", config_files.len());
        config
      },
    };

    config.apply_overrides(config_overrides)?;
    Ok(config)
  }

  /// Apply a list of `KEY=VALUE` overrides in order.
  ///
  /// # Errors
  ///
  /// Returns an error if an override is not in `KEY=VALUE` form, names an
  /// unknown key, or carries a value that cannot be parsed.
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single override.
  ///
  /// # Errors
  ///
  /// Returns an error for unknown keys and unparsable values.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "source_dir" => self.source_dir = PathBuf::from(value),
      "output_dir" => self.output_dir = PathBuf::from(value),
      "base_dir" => {
        self.base_dir = if value.is_empty() {
          None
        } else {
          Some(PathBuf::from(value))
        };
      },
      "markdown_marker" => {
        if value.is_empty() {
          return Err(ConfigError::Config(
            "Invalid value for 'markdown_marker': must not be empty"
              .to_string(),
          ));
        }
        self.markdown_marker = value.to_string();
      },
      "line_ending" => self.line_ending = value.parse()?,
      "nesting" => self.nesting = value.parse()?,
      "dry_run" => self.dry_run = parse_bool(key, value)?,
      "markers" => {
        return Err(ConfigError::Config(
          "'markers' cannot be overridden from the command line, set it in a \
           config file"
            .to_string(),
        ));
      },
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown config key: '{key}'"
        )));
      },
    }

    Ok(())
  }

  /// Merge another config into this one, with the other config's values taking
  /// precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: Other's [`Some`] value replaces this config's
  ///   value
  /// - Plain fields (paths, strings, enums, bools): Other's value always
  ///   replaces
  pub fn merge(&mut self, other: Self) {
    self.source_dir = other.source_dir;
    self.output_dir = other.output_dir;
    if other.base_dir.is_some() {
      self.base_dir = other.base_dir;
    }
    self.markdown_marker = other.markdown_marker;
    self.line_ending = other.line_ending;
    self.nesting = other.nesting;
    self.dry_run = other.dry_run;
    if other.markers.is_some() {
      self.markers = other.markers;
    }
  }

  /// Search the working directory for a config file.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = env::current_dir().ok()?;
    Self::find_config_file_in(&current_dir)
  }

  /// Search `dir` for the first of [`CONFIG_FILENAMES`] that exists.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|filename| dir.join(filename))
      .find(|path| path.is_file())
  }

  /// The directory stripped from source paths, falling back to the working
  /// directory.
  ///
  /// # Errors
  ///
  /// Returns an error if no base directory is configured and the working
  /// directory cannot be determined.
  pub fn base_dir(&self) -> Result<PathBuf, ConfigError> {
    match &self.base_dir {
      Some(dir) => Ok(dir.clone()),
      None => {
        env::current_dir().map_err(|e| {
          ConfigError::Config(format!(
            "Failed to determine working directory: {e}"
          ))
        })
      },
    }
  }

  /// Absolute (or base-relative) path of the source tree.
  ///
  /// # Errors
  ///
  /// See [`Config::base_dir`].
  pub fn source_root(&self) -> Result<PathBuf, ConfigError> {
    Ok(self.base_dir()?.join(&self.source_dir))
  }

  /// Absolute (or base-relative) path of the output tree.
  ///
  /// # Errors
  ///
  /// See [`Config::base_dir`].
  pub fn output_root(&self) -> Result<PathBuf, ConfigError> {
    Ok(self.base_dir()?.join(&self.output_dir))
  }

  /// The marker table in effect.
  #[must_use]
  pub fn marker_table(&self) -> MarkerTable {
    self.markers.clone().unwrap_or_default()
  }

  /// Build the admonition rewriter described by this configuration.
  #[must_use]
  pub fn rewriter(&self) -> AdmonitionRewriter {
    AdmonitionRewriter::new(self.marker_table()).with_nesting(self.nesting)
  }

  /// Check that the configuration describes a safe run.
  ///
  /// The output tree is deleted at the start of every run, so it must not
  /// be, or contain, the base or source directory. Paths are compared after
  /// resolving symlinks, and an `output_dir` with `..` components is
  /// refused outright.
  ///
  /// # Errors
  ///
  /// Returns an error listing every problem found.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if self.markdown_marker.is_empty() {
      errors.push("markdown_marker must not be empty".to_string());
    }

    if self
      .output_dir
      .components()
      .any(|component| component == Component::ParentDir)
    {
      errors.push(format!(
        "output_dir {} must not contain '..'",
        self.output_dir.display()
      ));
    }

    let base_dir = resolve_path(&self.base_dir()?);
    let source_root = resolve_path(&self.source_root()?);
    let output_root = resolve_path(&self.output_root()?);
    if base_dir.starts_with(&output_root) {
      errors.push(format!(
        "output directory {} contains the base directory {}",
        output_root.display(),
        base_dir.display()
      ));
    } else if source_root.starts_with(&output_root) {
      errors.push(format!(
        "output directory {} contains the source directory {}",
        output_root.display(),
        source_root.display()
      ));
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(ConfigError::Config(format!(
        "Invalid configuration:\n  - {}",
        errors.join("\n  - ")
      )))
    }
  }

  /// Write a default configuration file in the given format.
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = crate::templates::get_template(format)
      .map_err(|e| ConfigError::Template(e.to_string()))?;

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

/// Canonicalize the longest existing ancestor of `path` and append the rest,
/// so symlinks are resolved even when the leaf does not exist yet.
fn resolve_path(path: &Path) -> PathBuf {
  let path = normalize_path(path);

  for ancestor in path.ancestors() {
    if let (Ok(real), Ok(rest)) =
      (fs::canonicalize(ancestor), path.strip_prefix(ancestor))
    {
      return real.join(rest);
    }
  }

  path
}

/// Drop `.` components and fold `..` into its parent.
fn normalize_path(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {},
      Component::ParentDir => {
        if !normalized.pop() {
          normalized.push(component);
        }
      },
      other => normalized.push(other),
    }
  }
  normalized
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" => Ok(true),
    "false" | "no" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, or 1/0"
      )))
    },
  }
}
