use std::ops::Range;

pub const ATX_MARKER: u8 = b'#';

/// Offsets of an ATX heading's parts within its line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtxParts {
    pub marker: Range<usize>,
    /// First byte after the marker and its trailing whitespace run.
    pub content_start: usize,
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Locates a `level`-long `#` run that is the first non-whitespace run of
/// `line`. A run of any other length does not match.
pub fn locate_atx(line: &str, level: u8) -> Option<AtxParts> {
    let level = usize::from(level);
    let indent = indent_of(line);
    let rest = &line[indent..];
    let run = rest.bytes().take_while(|&b| b == ATX_MARKER).count();
    if level == 0 || run != level {
        return None;
    }
    let after = &rest[run..];
    let gap = after.len() - after.trim_start_matches([' ', '\t']).len();
    Some(AtxParts {
        marker: indent..indent + run,
        content_start: indent + run + gap,
    })
}

/// Locates a setext underline (`===` or `---`) on `line`.
pub fn locate_setext_underline(line: &str) -> Option<Range<usize>> {
    let indent = indent_of(line);
    let rest = &line[indent..];
    let ch = rest.bytes().next().filter(|b| matches!(b, b'=' | b'-'))?;
    let run = rest.bytes().take_while(|&b| b == ch).count();
    rest[run..]
        .trim()
        .is_empty()
        .then_some(indent..indent + run)
}

/// Offset of the first non-whitespace byte of `line`.
pub fn content_start(line: &str) -> usize {
    indent_of(line)
}
