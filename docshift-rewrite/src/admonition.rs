use std::{fmt, str::FromStr};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::{
  error::RewriteError,
  markers::{BLOCKQUOTE_MARKER, CLOSING_TOKEN, MarkerTable},
};

/// How to treat an admonition opener found inside another admonition's body.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum NestingPolicy {
  /// Rewrite nested openers as blocks of their own, closed inside the parent.
  #[default]
  Flatten,
  /// Fail with [`RewriteError::NestedAdmonition`].
  Reject,
}

impl NestingPolicy {
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Flatten => "flatten",
      Self::Reject => "reject",
    }
  }
}

impl fmt::Display for NestingPolicy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for NestingPolicy {
  type Err = RewriteError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "flatten" => Ok(Self::Flatten),
      "reject" => Ok(Self::Reject),
      other => Err(RewriteError::UnknownNestingPolicy(other.to_string())),
    }
  }
}

/// Result of rewriting one line sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rewrite {
  /// The rewritten lines. Never shorter than the input.
  pub lines: Vec<String>,

  /// Number of admonition blocks opened, nested ones included.
  pub blocks: usize,
}

impl Rewrite {
  /// Whether any block was rewritten.
  #[must_use]
  pub const fn changed(&self) -> bool {
    self.blocks > 0
  }
}

/// Rewrites blockquote admonitions into fenced directives.
///
/// An opener line such as `> 👍 Requirements` becomes `:::okay Requirements`.
/// Every following line that starts with `>` belongs to the block and loses
/// one level of quoting: a leading `"> "` is removed, or the bare `>` when no
/// space follows it. A [`CLOSING_TOKEN`] line is emitted where the run of
/// quoted lines ends, including at the end of the sequence.
///
/// The body of a block is rewritten with the same rules before it is
/// emitted, so an opener quoted twice in the source ends up as a nested
/// block closed before its parent.
#[derive(Debug, Clone, Default)]
pub struct AdmonitionRewriter {
  table:   MarkerTable,
  nesting: NestingPolicy,
}

impl AdmonitionRewriter {
  #[must_use]
  pub fn new(table: MarkerTable) -> Self {
    Self {
      table,
      nesting: NestingPolicy::default(),
    }
  }

  #[must_use]
  pub const fn with_nesting(mut self, nesting: NestingPolicy) -> Self {
    self.nesting = nesting;
    self
  }

  #[must_use]
  pub const fn table(&self) -> &MarkerTable {
    &self.table
  }

  #[must_use]
  pub const fn nesting(&self) -> NestingPolicy {
    self.nesting
  }

  /// Rewrite a line sequence.
  ///
  /// # Errors
  ///
  /// Returns [`RewriteError::NestedAdmonition`] if the policy is
  /// [`NestingPolicy::Reject`] and an opener appears inside a block body.
  pub fn rewrite<S: AsRef<str>>(
    &self,
    lines: &[S],
  ) -> Result<Rewrite, RewriteError> {
    let mut out = Rewrite {
      lines:  Vec::with_capacity(lines.len() + 4),
      blocks: 0,
    };
    self.rewrite_into(lines, 0, false, &mut out)?;
    Ok(out)
  }

  /// `offset` is the index of `lines[0]` in the caller's input, used for
  /// error reporting. Quote stripping never adds or removes lines, so body
  /// indices map one-to-one onto the input.
  fn rewrite_into<S: AsRef<str>>(
    &self,
    lines: &[S],
    offset: usize,
    nested: bool,
    out: &mut Rewrite,
  ) -> Result<(), RewriteError> {
    let mut idx = 0;

    while idx < lines.len() {
      let line = lines[idx].as_ref();

      let Some(marker) = self.table.find(line) else {
        out.lines.push(line.to_owned());
        idx += 1;
        continue;
      };

      if nested && self.nesting == NestingPolicy::Reject {
        return Err(RewriteError::NestedAdmonition {
          line: offset + idx + 1,
          text: line.to_owned(),
        });
      }

      trace!(
        "Opening {} block at line {}",
        marker.directive,
        offset + idx + 1
      );
      out.lines.push(marker.open(line));
      out.blocks += 1;

      let body_start = idx + 1;
      let body_end = lines[body_start..]
        .iter()
        .position(|line| !is_quoted(line.as_ref()))
        .map_or(lines.len(), |len| body_start + len);

      let body: Vec<&str> = lines[body_start..body_end]
        .iter()
        .map(|line| strip_quote(line.as_ref()))
        .collect();
      self.rewrite_into(&body, offset + body_start, true, out)?;

      out.lines.push(CLOSING_TOKEN.to_owned());
      idx = body_end;
    }

    Ok(())
  }
}

/// Marker plus the single space removed from each body line.
const QUOTE_PREFIX: &str = "> ";

fn is_quoted(line: &str) -> bool {
  line.starts_with(BLOCKQUOTE_MARKER)
}

/// Remove a leading `"> "` from a body line. A bare `>` becomes empty; any
/// other line, `>text` included, is kept as is.
fn strip_quote(line: &str) -> &str {
  if line.len() == BLOCKQUOTE_MARKER.len_utf8() && is_quoted(line) {
    return "";
  }
  line.strip_prefix(QUOTE_PREFIX).unwrap_or(line)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use super::*;
  use crate::markers::Marker;

  fn rewrite(lines: &[&str]) -> Vec<String> {
    AdmonitionRewriter::default()
      .rewrite(lines)
      .expect("rewrite should succeed")
      .lines
  }

  #[test]
  fn test_strip_quote() {
    assert_eq!(strip_quote("> text"), "text");
    assert_eq!(strip_quote(">"), "");
    assert_eq!(strip_quote(">text"), ">text");
    assert_eq!(strip_quote(">> double"), ">> double");
    assert_eq!(strip_quote(">  indented"), " indented");
    assert_eq!(strip_quote("> > nested"), "> nested");
    assert_eq!(strip_quote("plain"), "plain");
  }

  #[test]
  fn test_multi_line_block() {
    let out = rewrite(&[
      "> 👍 Requirements",
      ">",
      "> See the guide.",
      "Next paragraph.",
    ]);
    assert_eq!(out, vec![
      ":::okay Requirements",
      "",
      "See the guide.",
      ":::",
      "Next paragraph.",
    ]);
  }

  #[test]
  fn test_opener_followed_by_plain_line() {
    let out = rewrite(&["> 🚧 Careful", "Body text"]);
    assert_eq!(out, vec![":::warn Careful", ":::", "Body text"]);
  }

  #[test]
  fn test_block_at_end_of_sequence() {
    let out = rewrite(&["Intro", "> 📘 Note", "> last line"]);
    assert_eq!(out, vec!["Intro", ":::info Note", "last line", ":::"]);
  }

  #[test]
  fn test_opener_as_last_line() {
    let out = rewrite(&["> ❗️ Stop"]);
    assert_eq!(out, vec![":::error Stop", ":::"]);
  }

  #[test]
  fn test_plain_blockquote_untouched() {
    let input = ["> just a quote", "> more", "", "text"];
    let out = rewrite(&input);
    assert_eq!(out, input);
  }

  #[test]
  fn test_unspaced_quote_lines_kept_in_body() {
    let out = rewrite(&["> 📘 A", ">text", ">> 👍 B", "after"]);
    assert_eq!(out, vec![":::info A", ">text", ">> 👍 B", ":::", "after"]);
  }

  #[test]
  fn test_consecutive_blocks() {
    let out = rewrite(&["> 📘 One", "> a", "> 🚧 Two", "> b", "after"]);
    // Without a blank line in between, the second opener is still quoted and
    // belongs to the first block, losing its marker with the quote.
    assert_eq!(out, vec![
      ":::info One",
      "a",
      "🚧 Two",
      "b",
      ":::",
      "after",
    ]);
  }

  #[test]
  fn test_blocks_separated_by_blank_line() {
    let out = rewrite(&["> 📘 One", "> a", "", "> 🚧 Two", "> b"]);
    assert_eq!(out, vec![
      ":::info One",
      "a",
      ":::",
      "",
      ":::warn Two",
      "b",
      ":::",
    ]);
  }

  #[test]
  fn test_nested_flatten() {
    let out = rewrite(&[
      "> 📘 Outer",
      "> > 🚧 Inner",
      "> > inner text",
      "> outer text",
      "Next",
    ]);
    assert_eq!(out, vec![
      ":::info Outer",
      ":::warn Inner",
      "inner text",
      ":::",
      "outer text",
      ":::",
      "Next",
    ]);
  }

  #[test]
  fn test_nested_reject() {
    let rewriter =
      AdmonitionRewriter::default().with_nesting(NestingPolicy::Reject);
    let err = rewriter
      .rewrite(&["intro", "> 📘 Outer", "> > 🚧 Inner", "Next"])
      .expect_err("nested opener should be rejected");
    assert_eq!(err, RewriteError::NestedAdmonition {
      line: 3,
      text: "> 🚧 Inner".to_string(),
    });
  }

  #[test]
  fn test_reject_allows_top_level_blocks() {
    let rewriter =
      AdmonitionRewriter::default().with_nesting(NestingPolicy::Reject);
    let result = rewriter
      .rewrite(&["> 📘 One", "> a", "", "> 👍 Two"])
      .expect("no nesting present");
    assert_eq!(result.blocks, 2);
  }

  #[test]
  fn test_block_count_and_length() {
    let input = ["> 📘 A", "x", "> 👍 B", "> y", "z"];
    let result = AdmonitionRewriter::default()
      .rewrite(&input)
      .expect("rewrite should succeed");
    assert_eq!(result.blocks, 2);
    assert!(result.changed());
    assert_eq!(result.lines.len(), input.len() + 2);
  }

  #[test]
  fn test_idempotent() {
    let first = rewrite(&[
      "# Title",
      "> 👍 Requirements",
      ">",
      "> See the guide.",
      "",
      "> 🚰 Faucet",
      "> Get funds",
    ]);
    let second = AdmonitionRewriter::default()
      .rewrite(&first)
      .expect("rewrite should succeed");
    assert!(!second.changed());
    assert_eq!(second.lines, first);
  }

  #[test]
  fn test_custom_table() {
    let table = MarkerTable::new(vec![Marker::new("> [!NOTE]", ":::note")])
      .expect("valid table");
    let result = AdmonitionRewriter::new(table)
      .rewrite(&["> [!NOTE] Heads up", "> body", "> 📘 Not in table"])
      .expect("rewrite should succeed");
    assert_eq!(result.lines, vec![
      ":::note Heads up",
      "body",
      "📘 Not in table",
      ":::"
    ]);
  }

  #[test]
  fn test_empty_table_is_identity() {
    let table = MarkerTable::new(Vec::new()).expect("empty table is valid");
    let input = ["> 📘 Note", "> body"];
    let result = AdmonitionRewriter::new(table)
      .rewrite(&input)
      .expect("rewrite should succeed");
    assert_eq!(result.lines, input);
    assert_eq!(result.blocks, 0);
  }

  #[test]
  fn test_nesting_policy_from_str() {
    assert_eq!("Flatten".parse::<NestingPolicy>(), Ok(NestingPolicy::Flatten));
    assert_eq!("reject".parse::<NestingPolicy>(), Ok(NestingPolicy::Reject));
    assert!("escape".parse::<NestingPolicy>().is_err());
  }
}
