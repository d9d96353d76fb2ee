use thiserror::Error;

/// Error returned by [`get_template`].
#[derive(Debug, Error)]
pub enum TemplateError {
  #[error("Unsupported config format '{0}', expected toml or json")]
  UnsupportedFormat(String),
}

/// Default configuration template in TOML, with each field explained.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# docshift configuration file

# Directory containing the markdown sources, relative to base_dir
source_dir = "11ty/docs"

# Directory the migrated tree is written to, relative to base_dir.
# It is deleted and recreated on every run.
output_dir = "temp"

# Directory stripped from source paths to build output paths
# (defaults to the current working directory)
# base_dir = "."

# Files are migrated only if their path contains this text
markdown_marker = ".md"

# Line ending for migrated files: "crlf", "lf" or "cr"
line_ending = "crlf"

# What to do with an admonition opener inside another admonition:
# "flatten" rewrites it as a nested block, "reject" aborts the run
nesting = "flatten"

# Rewrite and report without writing any output
dry_run = false

# Admonition openers, checked in order against the start of each line.
# Leaving this out uses the built-in table shown here.
# [[markers]]
# prefix = "> 📘"
# directive = ":::info"
#
# [[markers]]
# prefix = "> 👍"
# directive = ":::okay"
#
# [[markers]]
# prefix = "> 🚧"
# directive = ":::warn"
#
# [[markers]]
# prefix = "> ❗️"
# directive = ":::error"
#
# [[markers]]
# prefix = "> 🚰 "
# directive = ":::faucet"
"#;

/// Default configuration template in JSON format.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "source_dir": "11ty/docs",
  "output_dir": "temp",
  "markdown_marker": ".md",
  "line_ending": "crlf",
  "nesting": "flatten",
  "dry_run": false
}
"#;

/// Get the correct configuration template based on the requested format.
///
/// # Errors
///
/// Returns an error if the requested format is not supported.
pub fn get_template(format: &str) -> Result<&'static str, TemplateError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(TemplateError::UnsupportedFormat(format.to_string())),
  }
}
