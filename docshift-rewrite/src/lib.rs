//! # docshift-rewrite
//!
//! Line-oriented rewriting of blockquote admonitions into fenced directives.
//! The crate performs no I/O; it works on line sequences produced by
//! [`split_lines`] and serialized again with [`join_lines`].
//!
//! ## Quick Start
//!
//! ```rust
//! use docshift_rewrite::{
//!   AdmonitionRewriter, LineEnding, MarkerTable, join_lines, split_lines,
//! };
//!
//! let rewriter = AdmonitionRewriter::new(MarkerTable::default());
//! let lines = split_lines("> 👍 Requirements\n>\n> See the guide.\nNext.");
//! let result = rewriter.rewrite(&lines).unwrap();
//!
//! assert_eq!(result.blocks, 1);
//! assert_eq!(
//!   join_lines(&result.lines, LineEnding::Lf),
//!   ":::okay Requirements\n\nSee the guide.\n:::\nNext."
//! );
//! ```
//!
//! ## Custom markers
//!
//! ```rust
//! use docshift_rewrite::{AdmonitionRewriter, Marker, MarkerTable};
//!
//! let table =
//!   MarkerTable::new(vec![Marker::new("> [!TIP]", ":::tip")]).unwrap();
//! let result = AdmonitionRewriter::new(table)
//!   .rewrite(&["> [!TIP] Try this", "> body"])
//!   .unwrap();
//! assert_eq!(result.lines, vec![":::tip Try this", "body", ":::"]);
//! ```

mod admonition;
mod error;
pub mod lines;
pub mod markers;

pub use crate::{
  admonition::{AdmonitionRewriter, NestingPolicy, Rewrite},
  error::RewriteError,
  lines::{LineEnding, join_lines, split_lines},
  markers::{BLOCKQUOTE_MARKER, CLOSING_TOKEN, DEFAULT_MARKERS, Marker, MarkerTable},
};
