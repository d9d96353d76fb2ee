//! Admonition marker table.
//!
//! A marker maps a blockquote opener such as `> 📘` to the directive token
//! that replaces it. Tables are ordered, and lookups return the first entry
//! whose prefix the line starts with.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RewriteError;

/// Leading character of a quoted line.
pub const BLOCKQUOTE_MARKER: char = '>';

/// Line emitted after the last line of every rewritten block.
pub const CLOSING_TOKEN: &str = ":::";

/// Built-in openers in lookup order.
///
/// The faucet key carries a trailing space and the other four do not, so
/// `> 🚰Title` is left alone while `> 📘Title` is rewritten, and the faucet
/// directive is written directly against its title (`:::faucetTitle`). The
/// keys are kept byte-for-byte; override the table to change either.
pub const DEFAULT_MARKERS: &[(&str, &str)] = &[
  ("> 📘", ":::info"),
  ("> 👍", ":::okay"),
  ("> 🚧", ":::warn"),
  // U+2757 followed by the emoji presentation selector U+FE0F
  ("> \u{2757}\u{fe0f}", ":::error"),
  ("> 🚰 ", ":::faucet"),
];

/// A single opener mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
  /// Text an opener line must start with.
  pub prefix: String,

  /// Directive token written in place of `prefix`.
  pub directive: String,
}

impl Marker {
  /// Create a new marker.
  #[must_use]
  pub fn new(prefix: impl Into<String>, directive: impl Into<String>) -> Self {
    Self {
      prefix:    prefix.into(),
      directive: directive.into(),
    }
  }

  /// Whether `line` opens an admonition of this kind.
  #[must_use]
  pub fn matches(&self, line: &str) -> bool {
    !self.prefix.is_empty() && line.starts_with(&self.prefix)
  }

  /// Replace the marker prefix of `line` with the directive token, keeping
  /// the remainder of the line verbatim. Lines that do not match are
  /// returned unchanged.
  #[must_use]
  pub fn open(&self, line: &str) -> String {
    line.strip_prefix(self.prefix.as_str()).map_or_else(
      || line.to_owned(),
      |rest| format!("{}{rest}", self.directive),
    )
  }

  fn validate(&self) -> Result<(), RewriteError> {
    if self.prefix.is_empty() {
      return Err(RewriteError::InvalidMarker(format!(
        "marker for '{}' has an empty prefix",
        self.directive
      )));
    }
    if self.directive.trim().is_empty() {
      return Err(RewriteError::InvalidMarker(format!(
        "marker '{}' has an empty directive",
        self.prefix
      )));
    }
    // A directive that is itself quoted would be picked up as a body line of
    // the block it just opened.
    if self.directive.starts_with(BLOCKQUOTE_MARKER) {
      return Err(RewriteError::InvalidMarker(format!(
        "directive '{}' must not start with '{BLOCKQUOTE_MARKER}'",
        self.directive
      )));
    }
    Ok(())
  }
}

impl fmt::Display for Marker {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?} -> {}", self.prefix, self.directive)
  }
}

/// Ordered, immutable set of opener mappings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Marker>", into = "Vec<Marker>")]
pub struct MarkerTable {
  markers: Vec<Marker>,
}

impl MarkerTable {
  /// Build a table from the given markers, preserving their order.
  ///
  /// # Errors
  ///
  /// Returns [`RewriteError::InvalidMarker`] if any marker has an empty
  /// prefix or directive, or a directive starting with the blockquote
  /// marker.
  pub fn new(markers: Vec<Marker>) -> Result<Self, RewriteError> {
    for marker in &markers {
      marker.validate()?;
    }
    Ok(Self { markers })
  }

  /// First marker whose prefix `line` starts with.
  #[must_use]
  pub fn find(&self, line: &str) -> Option<&Marker> {
    self.markers.iter().find(|marker| marker.matches(line))
  }

  pub fn iter(&self) -> impl Iterator<Item = &Marker> {
    self.markers.iter()
  }

  #[must_use]
  pub const fn len(&self) -> usize {
    self.markers.len()
  }

  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.markers.is_empty()
  }
}

impl Default for MarkerTable {
  fn default() -> Self {
    Self {
      markers: DEFAULT_MARKERS
        .iter()
        .map(|(prefix, directive)| Marker::new(*prefix, *directive))
        .collect(),
    }
  }
}

impl TryFrom<Vec<Marker>> for MarkerTable {
  type Error = RewriteError;

  fn try_from(markers: Vec<Marker>) -> Result<Self, Self::Error> {
    Self::new(markers)
  }
}

impl From<MarkerTable> for Vec<Marker> {
  fn from(table: MarkerTable) -> Self {
    table.markers
  }
}

impl<'a> IntoIterator for &'a MarkerTable {
  type IntoIter = std::slice::Iter<'a, Marker>;
  type Item = &'a Marker;

  fn into_iter(self) -> Self::IntoIter {
    self.markers.iter()
  }
}
