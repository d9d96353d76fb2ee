//! Splitting text into line sequences and joining them back.
use std::{fmt, str::FromStr, sync::OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::RewriteError;

/// Line ending used when a line sequence is serialized.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
  /// `\r\n`
  #[default]
  Crlf,
  /// `\n`
  Lf,
  /// `\r`
  Cr,
}

impl LineEnding {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Crlf => "\r\n",
      Self::Lf => "\n",
      Self::Cr => "\r",
    }
  }

  /// Name as accepted by [`FromStr`] and in configuration files.
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Crlf => "crlf",
      Self::Lf => "lf",
      Self::Cr => "cr",
    }
  }
}

impl fmt::Display for LineEnding {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for LineEnding {
  type Err = RewriteError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "crlf" => Ok(Self::Crlf),
      "lf" => Ok(Self::Lf),
      "cr" => Ok(Self::Cr),
      other => Err(RewriteError::UnknownLineEnding(other.to_string())),
    }
  }
}

/// Fallback pattern for when a regex fails to compile. It can never match.
fn never_matching_regex() -> Option<Regex> {
  Regex::new(r"[^\s\S]").ok()
}

fn line_break() -> Option<&'static Regex> {
  static LINE_BREAK: OnceLock<Option<Regex>> = OnceLock::new();
  LINE_BREAK
    .get_or_init(|| {
      Regex::new(r"\r\n|\r|\n")
        .ok()
        .or_else(never_matching_regex)
    })
    .as_ref()
}

/// Split `text` into lines, treating `\r\n`, `\r` and `\n` alike.
///
/// Every separator produces a boundary, so text ending in a line break yields
/// a trailing empty line and empty text yields a single empty line. Joining
/// the result with any [`LineEnding`] restores the text with that ending.
#[must_use]
pub fn split_lines(text: &str) -> Vec<String> {
  line_break().map_or_else(
    || vec![text.to_owned()],
    |re| re.split(text).map(str::to_owned).collect(),
  )
}

/// Join a line sequence with the given line ending.
#[must_use]
pub fn join_lines<S: AsRef<str>>(lines: &[S], ending: LineEnding) -> String {
  let mut out = String::with_capacity(
    lines.iter().map(|line| line.as_ref().len() + 2).sum(),
  );
  for (idx, line) in lines.iter().enumerate() {
    if idx > 0 {
      out.push_str(ending.as_str());
    }
    out.push_str(line.as_ref());
  }
  out
}
