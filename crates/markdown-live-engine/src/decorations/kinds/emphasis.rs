use crate::decorations::types::DecorationKind;
use crate::parsing::NodeKind;

/// Paired inline emphasis constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Strong,
    Em,
    Strike,
}

impl Emphasis {
    /// Marker used when the node carries no markup of its own.
    pub fn default_marker(self) -> &'static str {
        match self {
            Emphasis::Strong => "**",
            Emphasis::Em => "*",
            Emphasis::Strike => "~~",
        }
    }

    /// Styled kind for the content. `mixed` means bold and italic meet
    /// inside this span.
    pub fn styled_kind(self, mixed: bool) -> DecorationKind {
        match (self, mixed) {
            (Emphasis::Strong | Emphasis::Em, true) => DecorationKind::BoldItalic,
            (Emphasis::Strong, false) => DecorationKind::Bold,
            (Emphasis::Em, false) => DecorationKind::Italic,
            (Emphasis::Strike, _) => DecorationKind::Strikethrough,
        }
    }

    /// Strong and em share one styled range when nested; strike never does.
    pub fn merges_with_outer(self) -> bool {
        matches!(self, Emphasis::Strong | Emphasis::Em)
    }

    pub fn from_open(kind: NodeKind) -> Option<Self> {
        match kind {
            NodeKind::StrongOpen => Some(Emphasis::Strong),
            NodeKind::EmOpen => Some(Emphasis::Em),
            NodeKind::StrikeOpen => Some(Emphasis::Strike),
            _ => None,
        }
    }

    pub fn from_close(kind: NodeKind) -> Option<Self> {
        match kind {
            NodeKind::StrongClose => Some(Emphasis::Strong),
            NodeKind::EmClose => Some(Emphasis::Em),
            NodeKind::StrikeClose => Some(Emphasis::Strike),
            _ => None,
        }
    }
}
