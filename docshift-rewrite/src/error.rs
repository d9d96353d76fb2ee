use thiserror::Error;

/// Error type for admonition rewriting and its supporting types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
  /// An admonition opener was found inside another admonition's body while
  /// nesting is rejected.
  #[error("Nested admonition at line {line}: {text}")]
  NestedAdmonition {
    /// 1-based line number in the input sequence.
    line: usize,
    /// The offending line, as it appeared after stripping its parent's quote
    /// marker.
    text: String,
  },

  #[error("Invalid marker: {0}")]
  InvalidMarker(String),

  #[error("Unknown line ending '{0}', expected one of: crlf, lf, cr")]
  UnknownLineEnding(String),

  #[error("Unknown nesting policy '{0}', expected one of: flatten, reject")]
  UnknownNestingPolicy(String),
}
