pub mod error;
pub mod files;
pub mod output;
pub mod scanner;

pub use crate::{
  error::UtilsError,
  files::{load_lines, mirror_path, write_lines},
  output::OutputDir,
  scanner::{is_markdown, scan_files},
};
