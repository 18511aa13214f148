use crate::parsing::{LineIndex, LineSpan, Node, NodeKind, parse_with_index};

use super::kinds::{Emphasis, code_span, fence, heading, link};
use super::locate::Source;
use super::overlap;
use super::types::{DecorationKind, DecorationRange};

/// Computes every decoration range for `text`.
///
/// Never fails: constructs whose markers cannot be located are skipped.
pub fn extract(text: &str) -> Vec<DecorationRange> {
    let lines = LineIndex::new(text);
    let root = parse_with_index(text, &lines);
    extract_tree(text, &lines, &root)
}

/// Computes decoration ranges for an already-parsed tree of `text`.
pub fn extract_tree(text: &str, lines: &LineIndex, root: &Node) -> Vec<DecorationRange> {
    let mut extractor = Extractor {
        src: Source::new(text, lines),
        out: Vec::new(),
    };
    extractor.walk(std::slice::from_ref(root));
    let raw = extractor.out.len();
    let ranges = overlap::resolve(extractor.out, text.len());
    log::debug!(
        "extracted {} ranges ({raw} before overlap resolution) from {} bytes, {} lines",
        ranges.len(),
        text.len(),
        lines.line_count()
    );
    ranges
}

struct Extractor<'t> {
    src: Source<'t>,
    out: Vec<DecorationRange>,
}

impl Extractor<'_> {
    fn walk(&mut self, nodes: &[Node]) {
        let mut i = 0;
        while i < nodes.len() {
            let node = &nodes[i];
            match node.kind {
                NodeKind::HeadingOpen => self.heading(node),
                NodeKind::Fence => self.fence(node),
                NodeKind::Inline => {
                    InlineScan::new(self.src, node.line_span).run(self, &node.children)
                }
                NodeKind::Document
                | NodeKind::ParagraphOpen
                | NodeKind::ParagraphClose
                | NodeKind::HeadingClose
                | NodeKind::BlockquoteOpen
                | NodeKind::BlockquoteClose
                | NodeKind::BulletListOpen
                | NodeKind::BulletListClose
                | NodeKind::OrderedListOpen
                | NodeKind::OrderedListClose
                | NodeKind::ListItemOpen
                | NodeKind::ListItemClose
                | NodeKind::CodeBlock
                | NodeKind::HtmlBlock
                | NodeKind::Hr => self.walk(&node.children),
                // Inline tokens outside an `Inline` container: scan the
                // consecutive run of them together so pairs still match.
                NodeKind::Text
                | NodeKind::SoftBreak
                | NodeKind::HardBreak
                | NodeKind::StrongOpen
                | NodeKind::StrongClose
                | NodeKind::EmOpen
                | NodeKind::EmClose
                | NodeKind::StrikeOpen
                | NodeKind::StrikeClose
                | NodeKind::CodeInline
                | NodeKind::LinkOpen
                | NodeKind::LinkClose
                | NodeKind::Image
                | NodeKind::HtmlInline => {
                    let run = nodes[i..]
                        .iter()
                        .take_while(|n| is_inline_token(n.kind))
                        .count();
                    InlineScan::new(self.src, node.line_span).run(self, &nodes[i..i + run]);
                    i += run;
                    continue;
                }
            }
            i += 1;
        }
    }

    fn push_hide(&mut self, start: usize, end: usize) {
        if end > start {
            self.out.push(DecorationRange::hide(start, end));
        }
    }

    fn push_styled(&mut self, range: DecorationRange) {
        if range.end > range.start {
            self.out.push(range);
        } else {
            log::trace!(
                "suppressing degenerate {} range {}..{}",
                range.kind,
                range.start,
                range.end
            );
        }
    }

    fn heading(&mut self, node: &Node) {
        let (Some(level), Some(span)) = (node.heading_level(), node.line_span) else {
            log::trace!("heading without level or line span: {:?}", node.tag);
            return;
        };
        if !self.src.has_line(span.start) {
            log::trace!("heading line {} outside document", span.start);
            return;
        }
        if matches!(node.markup.as_str(), "=" | "-") {
            self.setext_heading(span, level);
            return;
        }

        let (Some(line), Some(line_range)) =
            (self.src.line_text(span.start), self.src.line_range(span.start))
        else {
            return;
        };
        let Some(parts) = heading::locate_atx(line, level) else {
            log::trace!("no level-{level} marker at start of line {}", span.start);
            return;
        };
        let base = line_range.start;
        self.push_hide(base + parts.marker.start, base + parts.marker.end);
        self.push_styled(DecorationRange::heading(
            base + parts.content_start,
            line_range.end,
            level,
        ));
    }

    fn setext_heading(&mut self, span: LineSpan, level: u8) {
        let underline = span.last();
        if underline <= span.start || !self.src.has_line(underline) {
            log::trace!("setext heading at line {} has no underline line", span.start);
            return;
        }
        let (Some(text), Some(range)) =
            (self.src.line_text(underline), self.src.line_range(underline))
        else {
            return;
        };
        let Some(marker) = heading::locate_setext_underline(text) else {
            log::trace!("no setext underline on line {underline}");
            return;
        };
        self.push_hide(range.start + marker.start, range.start + marker.end);

        let (Some(first), Some(first_range), Some(content_end)) = (
            self.src.line_text(span.start),
            self.src.line_range(span.start),
            self.src.lines.line_end(underline - 1),
        ) else {
            return;
        };
        let content_start = first_range.start + heading::content_start(first);
        self.push_styled(DecorationRange::heading(content_start, content_end, level));
    }

    fn fence(&mut self, node: &Node) {
        let Some(span) = node.line_span else {
            return;
        };
        let Some(line) = self.src.line_text(span.start) else {
            log::trace!("fence line {} outside document", span.start);
            return;
        };
        let marker = if node.markup.is_empty() {
            fence::DEFAULT_MARKER
        } else {
            node.markup.as_str()
        };
        let Some(open) = fence::opening(line, marker, node.info.as_deref()) else {
            log::trace!("no opening fence {marker:?} on line {}", span.start);
            return;
        };
        let base = self.src.lines.line_start(span.start).unwrap_or_default();
        self.push_hide(base + open.start, base + open.end);

        // The closing fence is the span's last line; accept the line just
        // after it too in case the parser's range stopped short of it.
        for candidate in [span.last(), span.end] {
            if candidate <= span.start {
                continue;
            }
            let (Some(text), Some(range)) =
                (self.src.line_text(candidate), self.src.line_range(candidate))
            else {
                continue;
            };
            if let Some(close) = fence::closing(text, marker) {
                self.push_hide(range.start + close.start, range.start + close.end);
                break;
            }
        }
    }
}

fn is_inline_token(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Text
            | NodeKind::SoftBreak
            | NodeKind::HardBreak
            | NodeKind::StrongOpen
            | NodeKind::StrongClose
            | NodeKind::EmOpen
            | NodeKind::EmClose
            | NodeKind::StrikeOpen
            | NodeKind::StrikeClose
            | NodeKind::CodeInline
            | NodeKind::LinkOpen
            | NodeKind::LinkClose
            | NodeKind::Image
            | NodeKind::HtmlInline
    )
}

/// An open construct awaiting its close token.
#[derive(Debug)]
enum Frame {
    Emphasis {
        emphasis: Emphasis,
        marker: String,
        /// First content byte, `None` when the opener was not located.
        content_start: Option<usize>,
        /// Bold and italic meet inside this span.
        mixed: bool,
        /// Already covered by an enclosing strong/em range.
        suppressed: bool,
    },
    Link {
        /// Offset just past the link's closing delimiter.
        resume: Option<usize>,
    },
}

/// Left-to-right scan over one inline token stream.
///
/// `cursor` only moves forward past located markers and text, so repeated
/// markers on a line resolve to successive occurrences.
struct InlineScan<'t> {
    src: Source<'t>,
    cursor: usize,
    frames: Vec<Frame>,
}

impl<'t> InlineScan<'t> {
    fn new(src: Source<'t>, span: Option<LineSpan>) -> Self {
        let cursor = span
            .and_then(|s| src.lines.line_start(s.start))
            .unwrap_or_default();
        Self {
            src,
            cursor,
            frames: Vec::new(),
        }
    }

    fn run(mut self, ex: &mut Extractor<'_>, nodes: &[Node]) {
        for node in nodes {
            match node.kind {
                NodeKind::Text | NodeKind::HtmlInline => self.skip_text(node),
                NodeKind::SoftBreak | NodeKind::HardBreak => {}
                NodeKind::StrongOpen | NodeKind::EmOpen | NodeKind::StrikeOpen => {
                    if let Some(emphasis) = Emphasis::from_open(node.kind) {
                        self.open_emphasis(ex, node, emphasis);
                    }
                }
                NodeKind::StrongClose | NodeKind::EmClose | NodeKind::StrikeClose => {
                    if let Some(emphasis) = Emphasis::from_close(node.kind) {
                        self.close_emphasis(ex, node, emphasis);
                    }
                }
                NodeKind::CodeInline => self.code_span(ex, node),
                NodeKind::LinkOpen => self.open_link(ex, node),
                NodeKind::LinkClose => self.close_link(),
                NodeKind::Image => self.image(ex, node),
                NodeKind::Document
                | NodeKind::Inline
                | NodeKind::ParagraphOpen
                | NodeKind::ParagraphClose
                | NodeKind::HeadingOpen
                | NodeKind::HeadingClose
                | NodeKind::BlockquoteOpen
                | NodeKind::BlockquoteClose
                | NodeKind::BulletListOpen
                | NodeKind::BulletListClose
                | NodeKind::OrderedListOpen
                | NodeKind::OrderedListClose
                | NodeKind::ListItemOpen
                | NodeKind::ListItemClose
                | NodeKind::Fence
                | NodeKind::CodeBlock
                | NodeKind::HtmlBlock
                | NodeKind::Hr => {
                    log::trace!("ignoring block token {:?} inside inline content", node.kind);
                }
            }
        }
    }

    /// Advances the cursor past literal text so later markers are searched
    /// after it.
    fn skip_text(&mut self, node: &Node) {
        let Some(content) = node.content.as_deref().filter(|c| !c.is_empty()) else {
            return;
        };
        // Never search before the node's own first line.
        let from = node
            .line_span
            .and_then(|span| self.src.lines.line_start(span.start))
            .map_or(self.cursor, |start| self.cursor.max(start));
        let last_line = node.line_span.map(LineSpan::last);
        match self.src.find_forward(from, last_line, content) {
            Some(at) => self.cursor = at + content.len(),
            None => log::trace!("text {content:?} not found after {from}"),
        }
    }

    fn marker<'n>(node: &'n Node, default: &'n str) -> &'n str {
        if node.markup.is_empty() {
            default
        } else {
            &node.markup
        }
    }

    fn locate_open(&self, node: &Node, marker: &str) -> Option<usize> {
        match node.line_span {
            Some(span) => self.src.find_on_line(span.start, marker, self.cursor),
            None => self.src.find_before_content(node.content.as_deref()?, marker),
        }
    }

    fn locate_close(&self, node: &Node, marker: &str) -> Option<usize> {
        match node.line_span {
            Some(span) => self.src.find_on_line(span.start, marker, self.cursor),
            None => self.src.find_after_content(node.content.as_deref()?, marker),
        }
    }

    fn open_emphasis(&mut self, ex: &mut Extractor<'_>, node: &Node, emphasis: Emphasis) {
        let marker = Self::marker(node, emphasis.default_marker());
        let content_start = match self.locate_open(node, marker) {
            Some(at) => {
                ex.push_hide(at, at + marker.len());
                self.cursor = at + marker.len();
                Some(self.cursor)
            }
            None => {
                log::trace!("unlocatable {emphasis:?} opener {marker:?}");
                None
            }
        };

        // Strong and em share the outermost range: the first one opened
        // styles the whole span and turns bold-italic once the other nests
        // inside it.
        let mut suppressed = false;
        if emphasis.merges_with_outer() {
            let outer = self.frames.iter_mut().find_map(|frame| match frame {
                Frame::Emphasis {
                    emphasis: outer,
                    mixed,
                    suppressed: false,
                    ..
                } if outer.merges_with_outer() => Some((*outer, mixed)),
                _ => None,
            });
            if let Some((outer, mixed)) = outer {
                suppressed = true;
                if outer != emphasis {
                    *mixed = true;
                }
            }
        }

        self.frames.push(Frame::Emphasis {
            emphasis,
            marker: marker.to_string(),
            content_start,
            mixed: false,
            suppressed,
        });
    }

    fn close_emphasis(&mut self, ex: &mut Extractor<'_>, node: &Node, emphasis: Emphasis) {
        let Some(index) = self.frames.iter().rposition(
            |frame| matches!(frame, Frame::Emphasis { emphasis: open, .. } if *open == emphasis),
        ) else {
            log::trace!("{emphasis:?} closer without opener");
            return;
        };
        self.frames.truncate(index + 1);
        let Some(Frame::Emphasis {
            marker: open_marker,
            content_start,
            mixed,
            suppressed,
            ..
        }) = self.frames.pop()
        else {
            return;
        };

        let marker = Self::marker(node, &open_marker);
        let Some(at) = self.locate_close(node, marker) else {
            log::trace!("unlocatable {emphasis:?} closer {marker:?}");
            return;
        };
        if let Some(start) = content_start
            && !suppressed
        {
            ex.push_styled(DecorationRange::new(start, at, emphasis.styled_kind(mixed)));
        }
        ex.push_hide(at, at + marker.len());
        self.cursor = self.cursor.max(at + marker.len());
    }

    fn code_span(&mut self, ex: &mut Extractor<'_>, node: &Node) {
        let run = if node.markup.is_empty() { 1 } else { node.markup.len() };
        let tick = char::from(code_span::TICK).to_string().repeat(run);

        let open = match node.line_span {
            Some(span) => self
                .src
                .scan_start(span.start, self.cursor)
                .and_then(|from| code_span::find_run(self.src.text, from, run))
                .filter(|&at| self.src.lines.line_of(at) == span.start),
            None => node
                .content
                .as_deref()
                .and_then(|content| self.src.find_before_content(content, &tick)),
        };
        let Some(open) = open else {
            log::trace!("unlocatable code span opener");
            return;
        };

        let body = open + run;
        let limit = node
            .line_span
            .and_then(|span| self.src.lines.line_end(span.last()))
            .unwrap_or(self.src.text.len());
        let Some(close) =
            code_span::find_run(self.src.text, body, run).filter(|&at| at + run <= limit)
        else {
            log::trace!("code span opened at {open} never closes");
            return;
        };

        ex.push_hide(open, body);
        ex.push_hide(close, close + run);
        ex.push_styled(DecorationRange::new(body, close, DecorationKind::Code));
        self.cursor = close + run;
    }

    fn open_link(&mut self, ex: &mut Extractor<'_>, node: &Node) {
        if !matches!(node.markup.as_str(), "[" | "<") {
            // Reference-style links stay raw; their label text is still
            // scanned for nested constructs.
            log::trace!("skipping reference link {:?}", node.markup);
            self.frames.push(Frame::Link { resume: None });
            return;
        }
        let resume = node.line_span.and_then(|span| {
            let line_range = self.src.line_range(span.start)?;
            let line = self.src.line_text(span.start)?;
            let from = self.src.scan_start(span.start, self.cursor)? - line_range.start;
            let base = line_range.start;

            if node.markup == "<" {
                let angle = link::find_autolink(line, from)?;
                ex.push_hide(base + angle.start, base + angle.start + 1);
                ex.push_hide(base + angle.end - 1, base + angle.end);
                ex.push_styled(DecorationRange::new(
                    base + angle.start + 1,
                    base + angle.end - 1,
                    DecorationKind::Link,
                ));
                self.cursor = base + angle.start + 1;
                return Some(base + angle.end);
            }

            let parts = link::find_link(line, from)?;
            ex.push_hide(base + parts.full.start, base + parts.full.start + 1);
            ex.push_hide(base + parts.close_bracket(), base + parts.close_bracket() + 1);
            ex.push_hide(base + parts.open_paren(), base + parts.open_paren() + 1);
            ex.push_hide(base + parts.close_paren(), base + parts.full.end);
            ex.push_styled(DecorationRange::new(
                base + parts.label.start,
                base + parts.label.end,
                DecorationKind::Link,
            ));
            self.cursor = base + parts.label.start;
            Some(base + parts.full.end)
        });
        if resume.is_none() {
            log::trace!("unlocatable link {:?}", node.markup);
        }
        self.frames.push(Frame::Link { resume });
    }

    fn close_link(&mut self) {
        let Some(index) = self
            .frames
            .iter()
            .rposition(|frame| matches!(frame, Frame::Link { .. }))
        else {
            return;
        };
        self.frames.truncate(index + 1);
        if let Some(Frame::Link {
            resume: Some(resume),
        }) = self.frames.pop()
        {
            self.cursor = self.cursor.max(resume);
        }
    }

    fn image(&mut self, ex: &mut Extractor<'_>, node: &Node) {
        let Some(span) = node.line_span else {
            log::trace!("image without line span");
            return;
        };
        let (Some(line_range), Some(line)) =
            (self.src.line_range(span.start), self.src.line_text(span.start))
        else {
            return;
        };
        let Some(from) = self.src.scan_start(span.start, self.cursor) else {
            return;
        };
        let Some(parts) = link::find_image(line, from - line_range.start) else {
            log::trace!("unlocatable image on line {}", span.start);
            return;
        };
        let base = line_range.start;
        ex.push_hide(base + parts.full.start, base + parts.label.start);
        ex.push_hide(base + parts.close_bracket(), base + parts.close_bracket() + 1);
        ex.push_hide(base + parts.open_paren(), base + parts.open_paren() + 1);
        ex.push_hide(base + parts.close_paren(), base + parts.full.end);
        ex.push_styled(DecorationRange::new(
            base + parts.label.start,
            base + parts.label.end,
            DecorationKind::Image,
        ));
        self.cursor = base + parts.full.end;
    }
}
