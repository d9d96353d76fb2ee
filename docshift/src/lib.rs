//! Migrate blockquote admonitions in a Markdown tree to fenced directives.
//!
//! The binary is a thin wrapper around [`migrate::migrate`]; the library is
//! exposed mainly for integration tests and the `xtask` crate.
pub mod cli;
pub mod error;
pub mod migrate;

pub use crate::{
  error::MigrateError,
  migrate::{MigrationSummary, migrate},
};
