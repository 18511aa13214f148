use std::ops::Range;

/// Fence used when the node carries no markup.
pub const DEFAULT_MARKER: &str = "```";

/// Range of the opening fence plus its info string on `line`.
pub fn opening(line: &str, marker: &str, info: Option<&str>) -> Option<Range<usize>> {
    if marker.is_empty() {
        return None;
    }
    let start = line.find(marker)?;
    let mut end = start + marker.len();
    if let Some(info) = info.filter(|i| !i.is_empty())
        && let Some(at) = line[end..].find(info)
    {
        end += at + info.len();
    }
    Some(start..end)
}

/// Range of the closing fence run on `line`: the same fence character, at
/// least as long as the opening marker, with nothing but whitespace after.
pub fn closing(line: &str, marker: &str) -> Option<Range<usize>> {
    let fence = *marker.as_bytes().first()?;
    let trimmed = line.trim_start_matches(' ');
    let indent = line.len() - trimmed.len();
    let run = trimmed.bytes().take_while(|&b| b == fence).count();
    if run < marker.len() || !trimmed[run..].trim().is_empty() {
        return None;
    }
    Some(indent..indent + run)
}
