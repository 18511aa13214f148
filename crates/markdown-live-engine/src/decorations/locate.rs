use std::ops::Range;

use crate::parsing::LineIndex;

/// The source text paired with its line index. All searches return absolute
/// byte offsets and never panic on bad lines or offsets.
#[derive(Clone, Copy)]
pub(crate) struct Source<'t> {
    pub text: &'t str,
    pub lines: &'t LineIndex,
}

impl<'t> Source<'t> {
    pub fn new(text: &'t str, lines: &'t LineIndex) -> Self {
        Self { text, lines }
    }

    pub fn has_line(&self, line: usize) -> bool {
        line < self.lines.line_count()
    }

    pub fn line_range(&self, line: usize) -> Option<Range<usize>> {
        self.lines.line_range(line)
    }

    pub fn line_text(&self, line: usize) -> Option<&'t str> {
        self.lines.line_text(self.text, line)
    }

    /// Where a scan of `line` begins: `cursor` if it lies on the line,
    /// otherwise the line start.
    pub fn scan_start(&self, line: usize, cursor: usize) -> Option<usize> {
        let range = self.line_range(line)?;
        Some(if range.contains(&cursor) || cursor == range.end {
            cursor
        } else {
            range.start
        })
    }

    /// First `marker` on `line`, scanning forward from [`Self::scan_start`].
    pub fn find_on_line(&self, line: usize, marker: &str, cursor: usize) -> Option<usize> {
        if marker.is_empty() {
            return None;
        }
        let start = self.scan_start(line, cursor)?;
        let end = self.lines.line_end(line)?;
        self.text.get(start..end)?.find(marker).map(|i| start + i)
    }

    /// First `needle` at or after `from`, not running past the end of
    /// `last_line` (or the document when `None`).
    pub fn find_forward(
        &self,
        from: usize,
        last_line: Option<usize>,
        needle: &str,
    ) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        let end = match last_line {
            Some(line) => self.lines.line_end(line)?,
            None => self.text.len(),
        };
        self.text.get(from..end)?.find(needle).map(|i| from + i)
    }

    /// Fallback for openers without a line span: the nearest `marker`
    /// preceding the first occurrence of `content` in the document.
    pub fn find_before_content(&self, content: &str, marker: &str) -> Option<usize> {
        if content.is_empty() || marker.is_empty() {
            return None;
        }
        let pos = self.text.find(content)?;
        let at = self.text[..pos].rfind(marker)?;
        (at + marker.len() <= pos).then_some(at)
    }

    /// Fallback for closers without a line span: the nearest `marker`
    /// following the first occurrence of `content` in the document.
    pub fn find_after_content(&self, content: &str, marker: &str) -> Option<usize> {
        if content.is_empty() || marker.is_empty() {
            return None;
        }
        let end = self.text.find(content)? + content.len();
        self.text[end..].find(marker).map(|i| end + i)
    }
}
