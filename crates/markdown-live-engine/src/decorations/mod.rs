//! # Decoration Extraction
//!
//! Turns a parsed token tree back into exact byte ranges of the source:
//! which bytes are syntax to hide and which visible text gets a style.
//!
//! ## Architecture
//!
//! Parse nodes carry only a line span and their literal markup, so every
//! offset is recovered by searching the source. The extractor walks the
//! block stream; each `Inline` container is scanned left to right with a
//! running cursor, so repeated markers on one line resolve to successive
//! occurrences. Emphasis nesting is tracked with an explicit frame stack.
//!
//! ## Modules
//!
//! - **`types`**: `DecorationKind` and `DecorationRange`
//! - **`kinds`**: per-construct delimiter grammar (emphasis, code spans,
//!   headings, links, fences)
//! - **`extractor`**: `extract()` entry point and the tree walk
//! - **`locate`**: bounded marker search over the source and its line index
//! - **`overlap`**: splits styled ranges so none overlap each other or a hide
//!
//! ## Guarantees
//!
//! Extraction never fails. A construct whose markers cannot be located is
//! skipped, and every emitted range lies within the text.

mod extractor;
pub mod kinds;
mod locate;
mod overlap;
pub mod types;

#[cfg(test)]
mod tests;

pub use extractor::{extract, extract_tree};
pub use types::{DecorationKind, DecorationRange, ParseKindError};
