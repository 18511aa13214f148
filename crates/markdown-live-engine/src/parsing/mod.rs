//! # Parsing
//!
//! Adapts `pulldown-cmark`'s event stream into a token tree of [`Node`]s
//! annotated with line spans and the literal markup the source used, plus
//! the [`LineIndex`] that maps between byte offsets and lines.

mod adapter;
pub mod lines;
pub mod node;

pub use adapter::{parse, parse_with_index};
pub use lines::{LineIndex, Position};
pub use node::{LineSpan, Node, NodeKind};
