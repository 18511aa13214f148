use std::ops::Range;

use serde::Serialize;

/// A `(line, column)` position, both zero-based. Columns are byte offsets
/// from the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Cumulative line start offsets for one source text.
///
/// Line `i` starts at `starts[i]`. A line's content ends before its
/// terminator (`\n`, or `\r\n`). A text ending in `\n` has a trailing empty
/// line, matching how editors count lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
    /// Exclusive end of each line's content (terminator excluded).
    ends: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut starts = vec![0];
        let mut ends = Vec::new();

        for (i, b) in bytes.iter().enumerate() {
            if *b == b'\n' {
                let end = if i > 0 && bytes[i - 1] == b'\r' { i - 1 } else { i };
                ends.push(end.max(starts[starts.len() - 1]));
                starts.push(i + 1);
            }
        }
        ends.push(text.len());

        Self {
            starts,
            ends,
            len: text.len(),
        }
    }

    /// Number of lines, always at least one.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Length of the indexed text in bytes.
    pub fn text_len(&self) -> usize {
        self.len
    }

    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.starts.get(line).copied()
    }

    /// Exclusive end of the line's content, before any terminator.
    pub fn line_end(&self, line: usize) -> Option<usize> {
        self.ends.get(line).copied()
    }

    /// Content range of `line`, terminator excluded.
    pub fn line_range(&self, line: usize) -> Option<Range<usize>> {
        Some(self.line_start(line)?..self.line_end(line)?)
    }

    /// The line's text without its terminator.
    pub fn line_text<'t>(&self, text: &'t str, line: usize) -> Option<&'t str> {
        text.get(self.line_range(line)?)
    }

    /// Line containing `offset`. Offsets past the end clamp to the last line.
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = self.line_of(offset);
        Position {
            line,
            column: offset - self.starts[line],
        }
    }
}
