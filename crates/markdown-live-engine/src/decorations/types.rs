use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Visual treatment applied to a range.
///
/// Hosts map each kind to one concrete style; the engine only ever emits the
/// tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DecorationKind {
    Hide,
    Bold,
    Italic,
    BoldItalic,
    Strikethrough,
    Code,
    Heading,
    Heading1,
    Heading2,
    Heading3,
    Link,
    Image,
}

impl DecorationKind {
    pub const ALL: [DecorationKind; 12] = [
        DecorationKind::Hide,
        DecorationKind::Bold,
        DecorationKind::Italic,
        DecorationKind::BoldItalic,
        DecorationKind::Strikethrough,
        DecorationKind::Code,
        DecorationKind::Heading,
        DecorationKind::Heading1,
        DecorationKind::Heading2,
        DecorationKind::Heading3,
        DecorationKind::Link,
        DecorationKind::Image,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DecorationKind::Hide => "hide",
            DecorationKind::Bold => "bold",
            DecorationKind::Italic => "italic",
            DecorationKind::BoldItalic => "boldItalic",
            DecorationKind::Strikethrough => "strikethrough",
            DecorationKind::Code => "code",
            DecorationKind::Heading => "heading",
            DecorationKind::Heading1 => "heading1",
            DecorationKind::Heading2 => "heading2",
            DecorationKind::Heading3 => "heading3",
            DecorationKind::Link => "link",
            DecorationKind::Image => "image",
        }
    }

    /// Everything except [`DecorationKind::Hide`] restyles visible text.
    pub fn is_styled(self) -> bool {
        self != DecorationKind::Hide
    }

    /// Styled kind for a heading of `level`; levels 4-6 share one kind.
    pub fn for_heading(level: u8) -> Self {
        match level {
            1 => DecorationKind::Heading1,
            2 => DecorationKind::Heading2,
            3 => DecorationKind::Heading3,
            _ => DecorationKind::Heading,
        }
    }
}

impl fmt::Display for DecorationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown decoration kind: {0:?}")]
pub struct ParseKindError(pub String);

impl FromStr for DecorationKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DecorationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}

/// A byte range `[start, end)` of the source and how to decorate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationRange {
    pub start: usize,
    pub end: usize,
    pub kind: DecorationKind,
    /// Heading level, only set for [`DecorationKind::Heading`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
}

impl DecorationRange {
    pub fn new(start: usize, end: usize, kind: DecorationKind) -> Self {
        Self {
            start,
            end,
            kind,
            level: None,
        }
    }

    pub fn hide(start: usize, end: usize) -> Self {
        Self::new(start, end, DecorationKind::Hide)
    }

    pub fn heading(start: usize, end: usize, level: u8) -> Self {
        let kind = DecorationKind::for_heading(level);
        Self {
            start,
            end,
            kind,
            level: (kind == DecorationKind::Heading).then_some(level),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Source text covered by the range, if it is in bounds.
    pub fn slice<'t>(&self, text: &'t str) -> Option<&'t str> {
        text.get(self.start..self.end)
    }
}
