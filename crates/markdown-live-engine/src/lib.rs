pub mod decorations;
pub mod parsing;
pub mod presentation;

// Re-export key types for easier usage
pub use decorations::{DecorationKind, DecorationRange, ParseKindError, extract, extract_tree};
pub use parsing::{LineIndex, LineSpan, Node, NodeKind, Position, parse};
pub use presentation::{
    DecorationGroups, Decorator, DecoratorOptions, EditorHost, SelectionSpan, filter_and_group,
};
