use markdown_live_engine::{
    DecorationKind, DecorationRange, Decorator, EditorHost, LineIndex, Position, SelectionSpan,
    extract,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::ops::Range;

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

/// Asserts bounds and disjointness of styled ranges.
fn check_invariants(text: &str, ranges: &[DecorationRange]) {
    for r in ranges {
        assert!(r.start < r.end && r.end <= text.len(), "out of bounds: {r:?}");
    }
    for (i, a) in ranges.iter().enumerate() {
        for b in &ranges[i + 1..] {
            if a.kind.is_styled() || b.kind.is_styled() {
                assert!(a.end <= b.start || b.end <= a.start, "overlap: {a:?} {b:?}");
            }
        }
    }
}

/// Source text of every range of `kind`, in emission order.
fn styled_text(text: &str, ranges: &[DecorationRange], kind: DecorationKind) -> Vec<String> {
    ranges
        .iter()
        .filter(|r| r.kind == kind)
        .map(|r| text[r.start..r.end].to_string())
        .collect()
}

/// Source with every hidden byte removed.
fn visible(text: &str, ranges: &[DecorationRange]) -> String {
    let mut hidden = vec![false; text.len()];
    for r in ranges.iter().filter(|r| r.kind == DecorationKind::Hide) {
        hidden[r.start..r.end].iter_mut().for_each(|h| *h = true);
    }
    text.char_indices()
        .filter(|(i, _)| !hidden[*i])
        .map(|(_, c)| c)
        .collect()
}

#[rstest]
#[case("headings")]
#[case("emphasis")]
#[case("links")]
#[case("fences")]
#[case("mixed")]
fn fixtures_hold_invariants_and_are_stable(#[case] name: &str) {
    let text = fixture(name);
    let ranges = extract(&text);
    check_invariants(&text, &ranges);
    assert_eq!(ranges, extract(&text));
}

#[test]
fn headings_fixture() {
    let text = fixture("headings");
    let ranges = extract(&text);
    assert_eq!(
        styled_text(&text, &ranges, DecorationKind::Heading1),
        vec!["Top Level", "Setext Title"]
    );
    assert_eq!(
        styled_text(&text, &ranges, DecorationKind::Heading2),
        vec!["Second ", "Setext Sub"]
    );
    assert_eq!(styled_text(&text, &ranges, DecorationKind::Italic), vec!["level"]);
    assert_eq!(styled_text(&text, &ranges, DecorationKind::Heading3), vec!["Third with "]);
    assert_eq!(styled_text(&text, &ranges, DecorationKind::Code), vec!["code"]);

    let fourth: Vec<_> = ranges
        .iter()
        .filter(|r| r.kind == DecorationKind::Heading)
        .map(|r| r.level)
        .collect();
    assert_eq!(fourth, vec![Some(4)]);

    let shown = visible(&text, &ranges);
    assert!(shown.starts_with(" Top Level\n\n Second level\n\n Third with code\n\n Fourth\n"));
    assert!(!shown.contains("==="));
    assert!(!shown.contains("---"));
}

#[test]
fn emphasis_fixture() {
    let text = fixture("emphasis");
    let ranges = extract(&text);
    assert_eq!(
        styled_text(&text, &ranges, DecorationKind::Bold),
        vec!["bold", "under bold"]
    );
    assert_eq!(
        styled_text(&text, &ranges, DecorationKind::Italic),
        vec!["italic", "under italic", "one", "two", "three"]
    );
    assert_eq!(
        styled_text(&text, &ranges, DecorationKind::BoldItalic),
        vec!["bold with ", "italic", " inside"]
    );
    assert_eq!(styled_text(&text, &ranges, DecorationKind::Strikethrough), vec!["gone"]);
    assert!(!visible(&text, &ranges).contains(['*', '_', '~']));
}

#[test]
fn links_fixture() {
    let text = fixture("links");
    let ranges = extract(&text);
    assert_eq!(
        styled_text(&text, &ranges, DecorationKind::Link),
        vec!["the docs", "first", "second", "https://rust-lang.org"]
    );
    assert_eq!(styled_text(&text, &ranges, DecorationKind::Image), vec!["a diagram"]);

    let shown = visible(&text, &ranges);
    assert!(shown.starts_with("See the docshttps://example.com/docs for more."));
    assert!(shown.contains("Reference style [is skipped][ref]."));
}

#[test]
fn fences_fixture() {
    let text = fixture("fences");
    let ranges = extract(&text);
    let hidden = styled_text(&text, &ranges, DecorationKind::Hide);
    assert_eq!(hidden, vec!["```rust", "```", "~~~", "~~~", "`", "`"]);
    assert!(!ranges.iter().any(|r| r.kind == DecorationKind::Bold));
    assert_eq!(styled_text(&text, &ranges, DecorationKind::Code), vec!["inline"]);
}

#[test]
fn mixed_fixture() {
    let text = fixture("mixed");
    let ranges = extract(&text);
    assert_eq!(styled_text(&text, &ranges, DecorationKind::Heading1), vec!["Project "]);
    assert_eq!(styled_text(&text, &ranges, DecorationKind::Heading), vec!["Small "]);
    assert_eq!(
        styled_text(&text, &ranges, DecorationKind::Italic),
        vec!["Notes", "heading"]
    );
    assert_eq!(
        styled_text(&text, &ranges, DecorationKind::Bold),
        vec!["important", "bullet"]
    );
    assert_eq!(
        styled_text(&text, &ranges, DecorationKind::Code),
        vec!["code", "double `tick` code"]
    );
    assert_eq!(styled_text(&text, &ranges, DecorationKind::Link), vec!["a link"]);
    assert_eq!(styled_text(&text, &ranges, DecorationKind::Strikethrough), vec!["old"]);
}

struct FixtureHost {
    text: String,
    lines: LineIndex,
    cursor_line: usize,
    applied: Vec<(DecorationKind, Vec<Range<usize>>)>,
}

impl EditorHost for FixtureHost {
    fn language_id(&self) -> &str {
        "markdown"
    }

    fn document_text(&self) -> &str {
        &self.text
    }

    fn offset_to_position(&self, offset: usize) -> Position {
        self.lines.position(offset)
    }

    fn active_selections(&self) -> Vec<SelectionSpan> {
        vec![SelectionSpan::line(self.cursor_line)]
    }

    fn apply_style(&mut self, kind: DecorationKind, ranges: &[Range<usize>]) {
        self.applied.push((kind, ranges.to_vec()));
    }
}

#[test]
fn cursor_line_shows_raw_markdown() {
    let text = fixture("emphasis");
    let mut host = FixtureHost {
        lines: LineIndex::new(&text),
        text,
        cursor_line: 0,
        applied: Vec::new(),
    };
    let groups = Decorator::default().update(&mut host).unwrap();

    assert_eq!(host.applied.len(), DecorationKind::ALL.len());
    assert!(groups.get(DecorationKind::Strikethrough).is_empty());
    assert_eq!(groups.get(DecorationKind::Bold).len(), 1);
    let first_line_end = host.text.find('\n').unwrap();
    for (_, ranges) in groups.iter() {
        assert!(ranges.iter().all(|r| r.start > first_line_end));
    }
}
