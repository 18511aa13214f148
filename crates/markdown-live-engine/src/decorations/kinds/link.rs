use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

/// Offsets of an inline link or image within a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkParts {
    /// Whole construct, from `[` (or `![`) through `)`.
    pub full: Range<usize>,
    /// Link text or image alt, between the brackets.
    pub label: Range<usize>,
}

impl LinkParts {
    /// The `]` closing the label.
    pub fn close_bracket(&self) -> usize {
        self.label.end
    }

    /// The `(` opening the target.
    pub fn open_paren(&self) -> usize {
        self.label.end + 1
    }

    /// The `)` closing the target.
    pub fn close_paren(&self) -> usize {
        self.full.end - 1
    }
}

/// The label may hold a whole `![alt](src)` image, as in badge links.
fn link_regex() -> &'static Regex {
    static LINK_REGEX: OnceLock<Regex> = OnceLock::new();
    LINK_REGEX.get_or_init(|| {
        Regex::new(r"\[((?:!\[[^\]]*\]\([^)]*\)|[^\]])+)\]\(([^)]+)\)")
            .expect("Invalid link regex")
    })
}

fn image_regex() -> &'static Regex {
    static IMAGE_REGEX: OnceLock<Regex> = OnceLock::new();
    IMAGE_REGEX
        .get_or_init(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("Invalid image regex"))
}

/// First `[text](target)` at or after `from` that is not the tail of an
/// image.
pub fn find_link(line: &str, from: usize) -> Option<LinkParts> {
    let mut at = from;
    while at <= line.len() {
        let caps = link_regex().captures_at(line, at)?;
        let full = caps.get(0)?;
        if full.start() > 0 && line.as_bytes()[full.start() - 1] == b'!' {
            at = full.start() + 1;
            continue;
        }
        let label = caps.get(1)?;
        return Some(LinkParts {
            full: full.range(),
            label: label.range(),
        });
    }
    None
}

/// First `![alt](target)` at or after `from`.
pub fn find_image(line: &str, from: usize) -> Option<LinkParts> {
    if from > line.len() {
        return None;
    }
    let caps = image_regex().captures_at(line, from)?;
    Some(LinkParts {
        full: caps.get(0)?.range(),
        label: caps.get(1)?.range(),
    })
}

/// First `<...>` autolink at or after `from`, including both angle brackets.
pub fn find_autolink(line: &str, from: usize) -> Option<Range<usize>> {
    let open = from + line.get(from..)?.find('<')?;
    // `<` is one byte, so `open + 1` is a char boundary.
    let close = open + 1 + line[open + 1..].find('>')?;
    Some(open..close + 1)
}
