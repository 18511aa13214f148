//! # Presentation
//!
//! Maps extracted ranges onto an editor: ranges touching a selected line are
//! dropped so raw markdown shows where the user is editing, and the rest are
//! grouped per [`DecorationKind`] for the host to apply.

mod host;

use std::collections::BTreeMap;
use std::ops::Range;

use crate::decorations::{DecorationKind, DecorationRange};

pub use host::{Decorator, DecoratorOptions, EditorHost};

/// Lines covered by one selection, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSpan {
    pub start_line: usize,
    pub end_line: usize,
}

impl SelectionSpan {
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line: start_line.min(end_line),
            end_line: start_line.max(end_line),
        }
    }

    /// A cursor with no extent.
    pub fn line(line: usize) -> Self {
        Self::new(line, line)
    }

    fn intersects(&self, first: usize, last: usize) -> bool {
        self.start_line <= last && first <= self.end_line
    }
}

/// Byte ranges grouped per kind, each group in extraction order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationGroups {
    groups: BTreeMap<DecorationKind, Vec<Range<usize>>>,
}

impl DecorationGroups {
    /// Ranges for `kind`; empty when the kind has none.
    pub fn get(&self, kind: DecorationKind) -> &[Range<usize>] {
        self.groups.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Non-empty groups in [`DecorationKind`] order.
    pub fn iter(&self) -> impl Iterator<Item = (DecorationKind, &[Range<usize>])> {
        self.groups.iter().map(|(kind, ranges)| (*kind, ranges.as_slice()))
    }

    /// Total number of ranges across all groups.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, kind: DecorationKind, range: Range<usize>) {
        self.groups.entry(kind).or_default().push(range);
    }
}

/// Drops every range whose lines intersect a selection and groups the rest
/// by kind.
///
/// A range spans lines `line_of(start)..=line_of(end)`. Hide ranges are
/// filtered the same way as styled ones, so a selected line shows its raw
/// markers.
pub fn filter_and_group(
    ranges: &[DecorationRange],
    selections: &[SelectionSpan],
    line_of: impl Fn(usize) -> usize,
) -> DecorationGroups {
    let mut groups = DecorationGroups::default();
    for range in ranges {
        let first = line_of(range.start);
        let last = line_of(range.end);
        if selections.iter().any(|s| s.intersects(first, last)) {
            log::trace!("revealing {} {}..{} under selection", range.kind, range.start, range.end);
            continue;
        }
        groups.push(range.kind, range.start..range.end);
    }
    groups
}
