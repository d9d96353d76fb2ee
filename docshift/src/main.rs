use std::{fs, path::Path};

use color_eyre::eyre::{Context, Result, bail};
use docshift::{
  cli::{Cli, Commands, MigrateArgs},
  migrate,
};
use docshift_config::Config;
use log::info;

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(cli.verbose.log_level_filter())
    .write_style(env_logger::WriteStyle::Always)
    .init();

  let args = match &cli.command {
    Some(Commands::Init {
      output,
      format,
      force,
    }) => return init(output, format, *force),
    Some(Commands::Markers) => return print_markers(&cli),
    Some(Commands::Migrate(args)) => args.clone(),
    None => MigrateArgs::default(),
  };

  let mut config = Config::load(&cli.config_files, &cli.config_overrides)?;
  args
    .apply(&mut config)
    .wrap_err("Invalid migration settings")?;

  let summary = migrate(&config).wrap_err("Migration failed")?;
  if config.dry_run && summary.changed > 0 {
    info!("Dry run finished, {} files would change", summary.changed);
  }

  Ok(())
}

fn init(output: &Path, format: &str, force: bool) -> Result<()> {
  // Check if file already exists and that we're not forcing overwrite
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  if let Some(parent) = output.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
    info!("Created directory: {}", parent.display());
  }

  Config::generate_default_config(format, output).wrap_err_with(|| {
    format!("Failed to generate configuration file: {}", output.display())
  })?;

  info!(
    "Configuration file created successfully. Edit it to customize the \
     migration."
  );
  Ok(())
}

#[allow(clippy::print_stdout, reason = "Marker listing is command output")]
fn print_markers(cli: &Cli) -> Result<()> {
  let config = Config::load(&cli.config_files, &cli.config_overrides)?;
  let table = config.marker_table();

  if table.is_empty() {
    println!("No markers configured");
  }
  for marker in &table {
    println!("{marker}");
  }

  Ok(())
}
