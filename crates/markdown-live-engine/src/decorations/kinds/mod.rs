//! # Construct Kinds
//!
//! Each decorated construct owns its delimiters and the line-local logic
//! that finds them. The extractor resolves which line (and from which
//! offset) to look at; these modules answer "where on this line is the
//! marker".
//!
//! ## Types
//!
//! - **`Emphasis`**: `**`, `*`, `~~` defaults and the styled kind per nesting
//! - **`code_span`**: backtick runs matched by exact length
//! - **`heading`**: ATX `#` runs and setext underlines
//! - **`link`**: `[text](target)`, `![alt](target)` and `<autolink>` grammar
//! - **`fence`**: opening fence plus info string, closing fence run
//!
//! All offsets returned here are relative to the `&str` passed in.

pub mod code_span;
pub mod emphasis;
pub mod fence;
pub mod heading;
pub mod link;

pub use emphasis::Emphasis;
