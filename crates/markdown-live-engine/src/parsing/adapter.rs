use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, LinkType, Options, Parser, Tag};

use super::lines::LineIndex;
use super::node::{LineSpan, Node, NodeKind};

/// Parses `text` into a token tree.
pub fn parse(text: &str) -> Node {
    let lines = LineIndex::new(text);
    parse_with_index(text, &lines)
}

/// Parses `text` using an already-built line index.
///
/// The root is a [`NodeKind::Document`] whose children are the flat block
/// token stream. Inline content of each leaf block is gathered into a single
/// [`NodeKind::Inline`] child.
pub fn parse_with_index(text: &str, lines: &LineIndex) -> Node {
    let mut builder = TreeBuilder::new(text, lines);
    for (event, range) in Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH).into_offset_iter() {
        builder.event(event, range);
    }
    builder.finish()
}

/// What to emit when the `End` event matching a `Start` arrives.
enum Pending {
    Block {
        close: NodeKind,
        tag: String,
        markup: String,
        span: LineSpan,
    },
    Inline {
        close: NodeKind,
        tag: &'static str,
        markup: String,
        content: Option<String>,
        range: Range<usize>,
    },
    /// Image under construction; alt text events become its children.
    Image(Node),
    /// Code or HTML block whose text events accumulate into `content`.
    Literal(Node),
    Ignored,
}

struct TreeBuilder<'t> {
    text: &'t str,
    lines: &'t LineIndex,
    blocks: Vec<Node>,
    inline: Option<Node>,
    pending: Vec<Pending>,
}

impl<'t> TreeBuilder<'t> {
    fn new(text: &'t str, lines: &'t LineIndex) -> Self {
        Self {
            text,
            lines,
            blocks: Vec::new(),
            inline: None,
            pending: Vec::new(),
        }
    }

    fn finish(mut self) -> Node {
        self.flush_inline();
        Node::new(NodeKind::Document)
            .with_span(LineSpan::new(0, self.lines.line_count()))
            .with_children(self.blocks)
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => self.start(tag, range),
            Event::End(_) => self.end(),
            Event::Text(text) => {
                if let Some(Pending::Literal(node)) = self.pending.last_mut() {
                    node.content.get_or_insert_with(String::new).push_str(&text);
                } else {
                    // Entities and escapes decode to text absent from the
                    // source, so Text carries its literal source slice.
                    let literal = self.text.get(range.clone()).unwrap_or(&*text);
                    let node = Node::new(NodeKind::Text)
                        .with_span(self.span(&range))
                        .with_content(literal.to_string());
                    self.push_inline(node, &range);
                }
            }
            Event::Code(code) => {
                let markup = self.run_at(range.start, b'`', usize::MAX);
                let node = Node::new(NodeKind::CodeInline)
                    .with_span(self.span(&range))
                    .with_markup(if markup.is_empty() { "`".into() } else { markup })
                    .with_tag("code")
                    .with_content(code.to_string());
                self.push_inline(node, &range);
            }
            Event::Html(html) => {
                if let Some(Pending::Literal(node)) = self.pending.last_mut() {
                    node.content.get_or_insert_with(String::new).push_str(&html);
                } else {
                    let node = Node::new(NodeKind::HtmlInline)
                        .with_span(self.span(&range))
                        .with_content(html.to_string());
                    self.push_inline(node, &range);
                }
            }
            Event::InlineHtml(html) => {
                let node = Node::new(NodeKind::HtmlInline)
                    .with_span(self.span(&range))
                    .with_content(html.to_string());
                self.push_inline(node, &range);
            }
            Event::SoftBreak => {
                let node = Node::new(NodeKind::SoftBreak).with_span(self.span(&range));
                self.push_inline(node, &range);
            }
            Event::HardBreak => {
                let node = Node::new(NodeKind::HardBreak).with_span(self.span(&range));
                self.push_inline(node, &range);
            }
            Event::Rule => {
                self.flush_inline();
                let markup = self
                    .text
                    .get(range.clone())
                    .map(str::trim)
                    .unwrap_or_default()
                    .to_string();
                self.blocks.push(
                    Node::new(NodeKind::Hr)
                        .with_span(self.span(&range))
                        .with_markup(markup)
                        .with_tag("hr"),
                );
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>, range: Range<usize>) {
        let pending = match tag {
            Tag::Paragraph => self.open_block(
                NodeKind::ParagraphOpen,
                NodeKind::ParagraphClose,
                "p",
                String::new(),
                &range,
            ),
            Tag::Heading { level, .. } => {
                let level = level as usize;
                let markup = self.heading_markup(&range, level);
                self.open_block(
                    NodeKind::HeadingOpen,
                    NodeKind::HeadingClose,
                    &format!("h{level}"),
                    markup,
                    &range,
                )
            }
            Tag::BlockQuote(_) => self.open_block(
                NodeKind::BlockquoteOpen,
                NodeKind::BlockquoteClose,
                "blockquote",
                ">".into(),
                &range,
            ),
            Tag::List(Some(_)) => {
                let markup = self.ordered_delimiter(range.start);
                self.open_block(
                    NodeKind::OrderedListOpen,
                    NodeKind::OrderedListClose,
                    "ol",
                    markup,
                    &range,
                )
            }
            Tag::List(None) => {
                let markup = self.first_char_at(range.start);
                self.open_block(
                    NodeKind::BulletListOpen,
                    NodeKind::BulletListClose,
                    "ul",
                    markup,
                    &range,
                )
            }
            Tag::Item => self.open_block(
                NodeKind::ListItemOpen,
                NodeKind::ListItemClose,
                "li",
                String::new(),
                &range,
            ),
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => {
                self.flush_inline();
                let mut node = Node::new(NodeKind::Fence)
                    .with_span(self.span(&range))
                    .with_markup(self.fence_markup(range.start))
                    .with_tag("code");
                if !info.trim().is_empty() {
                    node = node.with_info(info.trim());
                }
                Pending::Literal(node)
            }
            Tag::CodeBlock(CodeBlockKind::Indented) => {
                self.flush_inline();
                Pending::Literal(
                    Node::new(NodeKind::CodeBlock)
                        .with_span(self.span(&range))
                        .with_tag("code"),
                )
            }
            Tag::HtmlBlock => {
                self.flush_inline();
                Pending::Literal(Node::new(NodeKind::HtmlBlock).with_span(self.span(&range)))
            }
            Tag::Emphasis => {
                self.open_inline(NodeKind::EmOpen, NodeKind::EmClose, "em", 1, "*", range)
            }
            Tag::Strong => self.open_inline(
                NodeKind::StrongOpen,
                NodeKind::StrongClose,
                "strong",
                2,
                "**",
                range,
            ),
            Tag::Strikethrough => self.open_inline(
                NodeKind::StrikeOpen,
                NodeKind::StrikeClose,
                "s",
                2,
                "~~",
                range,
            ),
            Tag::Link { link_type, .. } => {
                let markup = match link_type {
                    LinkType::Inline => "[",
                    LinkType::Autolink | LinkType::Email => "<",
                    // Reference, collapsed and shortcut forms
                    _ => "[]",
                };
                let node = Node::new(NodeKind::LinkOpen)
                    .with_span(self.span(&range))
                    .with_markup(markup)
                    .with_tag("a");
                self.push_inline(node, &range);
                Pending::Inline {
                    close: NodeKind::LinkClose,
                    tag: "a",
                    markup: markup.into(),
                    content: None,
                    range,
                }
            }
            Tag::Image { .. } => Pending::Image(
                Node::new(NodeKind::Image)
                    .with_span(self.span(&range))
                    .with_markup("![")
                    .with_tag("img"),
            ),
            _ => Pending::Ignored,
        };
        self.pending.push(pending);
    }

    fn end(&mut self) {
        let Some(pending) = self.pending.pop() else {
            return;
        };
        match pending {
            Pending::Block {
                close,
                tag,
                markup,
                span,
            } => {
                self.flush_inline();
                self.blocks.push(
                    Node::new(close)
                        .with_span(LineSpan::line(span.last()))
                        .with_markup(markup)
                        .with_tag(tag),
                );
            }
            Pending::Inline {
                close,
                tag,
                markup,
                content,
                range,
            } => {
                let close_line = self.lines.line_of(range.end.saturating_sub(1).max(range.start));
                let mut node = Node::new(close)
                    .with_span(LineSpan::line(close_line))
                    .with_markup(markup)
                    .with_tag(tag);
                node.content = content;
                self.push_inline(node, &range);
            }
            Pending::Image(node) => self.push_inline(node, &(0..0)),
            Pending::Literal(node) => self.blocks.push(node),
            Pending::Ignored => {}
        }
    }

    fn open_block(
        &mut self,
        open: NodeKind,
        close: NodeKind,
        tag: &str,
        markup: String,
        range: &Range<usize>,
    ) -> Pending {
        self.flush_inline();
        let span = self.span(range);
        self.blocks.push(
            Node::new(open)
                .with_span(span)
                .with_markup(markup.clone())
                .with_tag(tag),
        );
        Pending::Block {
            close,
            tag: tag.to_string(),
            markup,
            span,
        }
    }

    fn open_inline(
        &mut self,
        open: NodeKind,
        close: NodeKind,
        tag: &'static str,
        max_run: usize,
        fallback: &str,
        range: Range<usize>,
    ) -> Pending {
        let delimiter = self.text.as_bytes().get(range.start).copied().unwrap_or(b'*');
        let mut markup = self.run_at(range.start, delimiter, max_run);
        if markup.is_empty() || !matches!(delimiter, b'*' | b'_' | b'~') {
            markup = fallback.to_string();
        }
        let content = self
            .text
            .get(range.start + markup.len()..range.end.saturating_sub(markup.len()))
            .map(str::to_string);

        let mut node = Node::new(open)
            .with_span(LineSpan::line(self.lines.line_of(range.start)))
            .with_markup(markup.clone())
            .with_tag(tag);
        node.content = content.clone();
        self.push_inline(node, &range);

        Pending::Inline {
            close,
            tag,
            markup,
            content,
            range,
        }
    }

    /// Appends an inline node to the innermost open image, or to the current
    /// inline container (opening one if needed).
    fn push_inline(&mut self, node: Node, range: &Range<usize>) {
        let image = self.pending.iter_mut().rev().find_map(|p| match p {
            Pending::Image(image) => Some(image),
            _ => None,
        });
        if let Some(image) = image {
            image.children.push(node);
            return;
        }

        let node_span = node.line_span.unwrap_or_else(|| self.span(range));
        let inline = self
            .inline
            .get_or_insert_with(|| Node::new(NodeKind::Inline).with_span(node_span));
        if let Some(span) = inline.line_span.as_mut() {
            span.start = span.start.min(node_span.start);
            span.end = span.end.max(node_span.end);
        }
        inline.children.push(node);
    }

    fn flush_inline(&mut self) {
        if let Some(inline) = self.inline.take() {
            self.blocks.push(inline);
        }
    }

    fn span(&self, range: &Range<usize>) -> LineSpan {
        let first = self.lines.line_of(range.start);
        let last = self.lines.line_of(range.end.saturating_sub(1).max(range.start));
        LineSpan::new(first, last + 1)
    }

    /// Run of `byte` starting at `offset`, at most `max` long.
    fn run_at(&self, offset: usize, byte: u8, max: usize) -> String {
        let len = self.text.as_bytes()[offset.min(self.text.len())..]
            .iter()
            .take_while(|&&b| b == byte)
            .take(max)
            .count();
        String::from_utf8(vec![byte; len]).unwrap_or_default()
    }

    fn heading_markup(&self, range: &Range<usize>, level: usize) -> String {
        let source = self.text.get(range.clone()).unwrap_or_default();
        if source.trim_start().starts_with('#') {
            return "#".repeat(level);
        }
        // Setext: the underline character on the heading's last line.
        let last = self.span(range).last();
        self.lines
            .line_text(self.text, last)
            .and_then(|line| line.trim().chars().next())
            .filter(|c| matches!(c, '=' | '-'))
            .map(String::from)
            .unwrap_or_else(|| if level == 1 { "=".into() } else { "-".into() })
    }

    fn fence_markup(&self, offset: usize) -> String {
        let rest = self.text.get(offset..).unwrap_or_default();
        let indent = rest.len() - rest.trim_start_matches(' ').len();
        let fence = rest.as_bytes().get(indent).copied().unwrap_or(b'`');
        if !matches!(fence, b'`' | b'~') {
            return "```".into();
        }
        self.run_at(offset + indent, fence, usize::MAX)
    }

    fn first_char_at(&self, offset: usize) -> String {
        self.text
            .get(offset..)
            .and_then(|rest| rest.trim_start().chars().next())
            .map(String::from)
            .unwrap_or_default()
    }

    fn ordered_delimiter(&self, offset: usize) -> String {
        self.text
            .get(offset..)
            .and_then(|rest| rest.trim_start().chars().find(|c| !c.is_ascii_digit()))
            .filter(|c| matches!(c, '.' | ')'))
            .map(String::from)
            .unwrap_or_else(|| ".".into())
    }
}
