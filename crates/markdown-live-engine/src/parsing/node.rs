/// Half-open `[start, end)` interval over zero-based lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

impl LineSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start + 1),
        }
    }

    /// Span of a single line.
    pub fn line(line: usize) -> Self {
        Self::new(line, line + 1)
    }

    /// Last line covered by the span.
    pub fn last(self) -> usize {
        self.end.saturating_sub(1).max(self.start)
    }
}

/// Every node kind the parse adapter can produce.
///
/// Block constructs appear as open/close pairs in the document's flat token
/// stream; inline constructs appear the same way inside an [`NodeKind::Inline`]
/// container. Leaf constructs (`Fence`, `CodeInline`, `Image`, ...) are single
/// nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    ParagraphOpen,
    ParagraphClose,
    HeadingOpen,
    HeadingClose,
    BlockquoteOpen,
    BlockquoteClose,
    BulletListOpen,
    BulletListClose,
    OrderedListOpen,
    OrderedListClose,
    ListItemOpen,
    ListItemClose,
    Inline,
    Text,
    SoftBreak,
    HardBreak,
    StrongOpen,
    StrongClose,
    EmOpen,
    EmClose,
    StrikeOpen,
    StrikeClose,
    CodeInline,
    LinkOpen,
    LinkClose,
    Image,
    Fence,
    CodeBlock,
    HtmlBlock,
    HtmlInline,
    Hr,
}

/// One node of the parsed token tree.
///
/// Nodes carry no byte offsets: only the line span and the literal markup the
/// source used. Recovering exact offsets is the extractor's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub line_span: Option<LineSpan>,
    /// Literal marker text, e.g. `"**"`, `"##"`, `` "```" ``.
    pub markup: String,
    /// HTML-ish tag name, e.g. `"h2"`, `"strong"`.
    pub tag: String,
    /// Fence info string.
    pub info: Option<String>,
    /// Literal inline text.
    pub content: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            line_span: None,
            markup: String::new(),
            tag: String::new(),
            info: None,
            content: None,
            children: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: LineSpan) -> Self {
        self.line_span = Some(span);
        self
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Heading level parsed from an `hN` tag.
    pub fn heading_level(&self) -> Option<u8> {
        let level: u8 = self.tag.strip_prefix('h')?.parse().ok()?;
        (1..=6).contains(&level).then_some(level)
    }

    /// Depth-first iterator over this node and all descendants.
    pub fn descendants(&self) -> impl Iterator<Item = &Node> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}
