use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate_to};
use clap_mangen::Man;

const BIN_NAME: &str = "docshift";

#[derive(Parser)]
#[command(author, version, about)]
struct Xtask {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate shell completions and the manpage for the docshift CLI
  Dist {
    /// Output directory for generated files.
    #[arg(short, long, default_value = "dist")]
    output_dir: PathBuf,
  },

  /// Generate shell completions only
  Completions {
    /// Output directory, completions land in `<dir>/completions`.
    #[arg(short, long, default_value = "dist")]
    output_dir: PathBuf,

    /// Shells to generate for. All supported shells when omitted.
    #[arg(short, long, value_enum, action = clap::ArgAction::Append)]
    shell: Vec<Shell>,
  },

  /// Generate the manpage only
  Manpage {
    /// Output directory, the manpage lands in `<dir>/man`.
    #[arg(short, long, default_value = "dist")]
    output_dir: PathBuf,
  },
}

const DEFAULT_SHELLS: [Shell; 4] =
  [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell];

fn main() -> Result<()> {
  match Xtask::parse().command {
    Commands::Dist { output_dir } => {
      generate_completions(&output_dir, &DEFAULT_SHELLS)?;
      generate_manpage(&output_dir)?;
    },
    Commands::Completions { output_dir, shell } => {
      let shells = if shell.is_empty() {
        DEFAULT_SHELLS.to_vec()
      } else {
        shell
      };
      generate_completions(&output_dir, &shells)?;
    },
    Commands::Manpage { output_dir } => generate_manpage(&output_dir)?,
  }

  Ok(())
}

#[allow(clippy::print_stdout, reason = "Task progress output")]
fn generate_completions(output_dir: &Path, shells: &[Shell]) -> Result<()> {
  let completions_dir = output_dir.join("completions");
  fs::create_dir_all(&completions_dir).with_context(|| {
    format!("Failed to create {}", completions_dir.display())
  })?;

  let mut cmd = docshift::cli::Cli::command();
  for shell in shells {
    let path = generate_to(*shell, &mut cmd, BIN_NAME, &completions_dir)
      .with_context(|| format!("Failed to generate {shell} completions"))?;
    println!("Generated {}", path.display());
  }
  Ok(())
}

#[allow(clippy::print_stdout, reason = "Task progress output")]
fn generate_manpage(output_dir: &Path) -> Result<()> {
  let man_dir = output_dir.join("man");
  fs::create_dir_all(&man_dir)
    .with_context(|| format!("Failed to create {}", man_dir.display()))?;

  let file_path = man_dir.join(format!("{BIN_NAME}.1"));
  let mut file = fs::File::create(&file_path).with_context(|| {
    format!("Failed to create manpage file at {}", file_path.display())
  })?;
  Man::new(docshift::cli::Cli::command())
    .render(&mut file)
    .with_context(|| format!("Failed to render {BIN_NAME} manpage"))?;

  println!("Generated {}", file_path.display());
  Ok(())
}
