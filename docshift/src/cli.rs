use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use docshift_config::{Config, ConfigError};
use docshift_rewrite::{LineEnding, NestingPolicy};

/// Command line interface for docshift
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "Migrate blockquote admonitions in a Markdown tree to fenced \
           directives"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`]). Defaults to `migrate`.
  #[command(subcommand)]
  pub command: Option<Commands>,

  #[command(flatten)]
  pub verbose: Verbosity<InfoLevel>,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(
    short = 'c',
    long = "config-file",
    global = true,
    action = clap::ArgAction::Append
  )]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the docshift CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Rewrite every markdown file under the source directory into a fresh
  /// output tree.
  Migrate(MigrateArgs),

  /// Initialize a new docshift configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "docshift.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Print the active admonition marker table.
  Markers,
}

/// Arguments of the `migrate` command. Anything left unset keeps the value
/// from the loaded configuration.
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrateArgs {
  /// Directory containing the markdown sources.
  #[arg(short = 'i', long = "source-dir")]
  pub source_dir: Option<PathBuf>,

  /// Directory to write the migrated tree to. Deleted on every run.
  #[arg(short, long = "output-dir")]
  pub output_dir: Option<PathBuf>,

  /// Prefix stripped from source paths when mirroring them into the output
  /// directory.
  #[arg(long = "base-dir")]
  pub base_dir: Option<PathBuf>,

  /// Line ending for migrated files (crlf, lf or cr).
  #[arg(long = "line-ending")]
  pub line_ending: Option<LineEnding>,

  /// How to treat an admonition opened inside another one (flatten or
  /// reject).
  #[arg(long)]
  pub nesting: Option<NestingPolicy>,

  /// Rewrite and report without touching the output directory.
  #[arg(short = 'n', long = "dry-run")]
  pub dry_run: bool,
}

impl MigrateArgs {
  /// Apply the arguments on top of a loaded configuration.
  ///
  /// # Errors
  ///
  /// Returns an error if the resulting configuration is invalid.
  pub fn apply(&self, config: &mut Config) -> Result<(), ConfigError> {
    if let Some(source_dir) = &self.source_dir {
      config.source_dir.clone_from(source_dir);
    }
    if let Some(output_dir) = &self.output_dir {
      config.output_dir.clone_from(output_dir);
    }
    if let Some(base_dir) = &self.base_dir {
      config.base_dir = Some(base_dir.clone());
    }
    if let Some(line_ending) = self.line_ending {
      config.line_ending = line_ending;
    }
    if let Some(nesting) = self.nesting {
      config.nesting = nesting;
    }
    if self.dry_run {
      config.dry_run = true;
    }

    config.validate()
  }
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::panic, reason = "Fine in tests")]
  use super::*;

  fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("docshift").chain(args.iter().copied()))
      .unwrap()
  }

  #[test]
  fn test_no_subcommand_means_migrate() {
    let cli = parse(&[]);
    assert!(cli.command.is_none());
    assert!(cli.config_files.is_empty());
  }

  #[test]
  fn test_migrate_args() {
    let cli = parse(&[
      "migrate",
      "-i",
      "docs",
      "-o",
      "out",
      "--line-ending",
      "lf",
      "--nesting",
      "reject",
      "--dry-run",
    ]);

    let Some(Commands::Migrate(args)) = cli.command else {
      panic!("expected migrate command");
    };
    assert_eq!(args.source_dir, Some(PathBuf::from("docs")));
    assert_eq!(args.output_dir, Some(PathBuf::from("out")));
    assert_eq!(args.line_ending, Some(LineEnding::Lf));
    assert_eq!(args.nesting, Some(NestingPolicy::Reject));
    assert!(args.dry_run);
  }

  #[test]
  fn test_unknown_line_ending_rejected() {
    let result =
      Cli::try_parse_from(["docshift", "migrate", "--line-ending", "unix"]);
    assert!(result.is_err());
  }

  #[test]
  fn test_global_config_flags_after_subcommand() {
    let cli = parse(&[
      "migrate",
      "-c",
      "a.toml",
      "-c",
      "b.json",
      "--config",
      "dry_run=yes",
    ]);
    assert_eq!(cli.config_files, vec![
      PathBuf::from("a.toml"),
      PathBuf::from("b.json")
    ]);
    assert_eq!(cli.config_overrides, vec!["dry_run=yes"]);
  }

  #[test]
  fn test_init_defaults() {
    let cli = parse(&["init"]);
    let Some(Commands::Init {
      output,
      format,
      force,
    }) = cli.command
    else {
      panic!("expected init command");
    };
    assert_eq!(output, PathBuf::from("docshift.toml"));
    assert_eq!(format, "toml");
    assert!(!force);
  }

  #[test]
  fn test_init_rejects_unknown_format() {
    assert!(Cli::try_parse_from(["docshift", "init", "-F", "yaml"]).is_err());
  }

  #[test]
  fn test_verbosity_flags() {
    assert_eq!(parse(&[]).verbose.log_level_filter(), log::LevelFilter::Info);
    assert_eq!(
      parse(&["-v"]).verbose.log_level_filter(),
      log::LevelFilter::Debug
    );
    assert_eq!(
      parse(&["-q"]).verbose.log_level_filter(),
      log::LevelFilter::Warn
    );
  }

  #[test]
  fn test_apply_overrides_only_set_fields() {
    let mut config = Config {
      output_dir: PathBuf::from("build"),
      ..Config::default()
    };
    let args = MigrateArgs {
      source_dir: Some(PathBuf::from("docs")),
      line_ending: Some(LineEnding::Lf),
      ..MigrateArgs::default()
    };

    args.apply(&mut config).unwrap();

    assert_eq!(config.source_dir, PathBuf::from("docs"));
    assert_eq!(config.output_dir, PathBuf::from("build"));
    assert_eq!(config.line_ending, LineEnding::Lf);
    assert!(!config.dry_run);
  }

  #[test]
  fn test_apply_rejects_output_containing_source() {
    let mut config = Config::default();
    let args = MigrateArgs {
      source_dir: Some(PathBuf::from("temp/docs")),
      ..MigrateArgs::default()
    };
    assert!(args.apply(&mut config).is_err());
  }
}
