//! Extraction tests over small documents.
//!
//! Each case lists the expected ranges in emission order; `invariants::check`
//! runs on every result.


use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::decorations::{DecorationKind, DecorationRange, extract};

fn extract_checked(text: &str) -> Vec<DecorationRange> {
    let ranges = extract(text);
    invariants::check(text, &ranges);
    ranges
}

/// One line per range: `kind start..end "snippet"`.
fn render(text: &str) -> String {
    extract_checked(text)
        .iter()
        .map(|r| {
            let snippet = r.slice(text).unwrap_or_default();
            format!("{} {}..{} {:?}", r.kind, r.start, r.end, snippet)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn hide(start: usize, end: usize) -> DecorationRange {
    DecorationRange::hide(start, end)
}

fn styled(start: usize, end: usize, kind: DecorationKind) -> DecorationRange {
    DecorationRange::new(start, end, kind)
}

// Headings

#[rstest]
#[case("# H1 Heading", vec![hide(0, 1), styled(2, 12, DecorationKind::Heading1)])]
#[case("## H2 Heading", vec![hide(0, 2), styled(3, 13, DecorationKind::Heading2)])]
#[case("### Three", vec![hide(0, 3), styled(4, 9, DecorationKind::Heading3)])]
#[case("#### Four", vec![hide(0, 4), DecorationRange::heading(5, 9, 4)])]
#[case("###### Six", vec![hide(0, 6), DecorationRange::heading(7, 10, 6)])]
fn atx_heading_levels(#[case] text: &str, #[case] expected: Vec<DecorationRange>) {
    assert_eq!(extract_checked(text), expected);
}

#[test]
fn deep_headings_carry_their_level() {
    let ranges = extract_checked("##### Five");
    assert_eq!(ranges[1].kind, DecorationKind::Heading);
    assert_eq!(ranges[1].level, Some(5));
}

#[test]
fn consecutive_headings_each_get_their_own_marker() {
    assert_eq!(
        extract_checked("# H1\n## H2\n### H3"),
        vec![
            hide(0, 1),
            styled(2, 4, DecorationKind::Heading1),
            hide(5, 7),
            styled(8, 10, DecorationKind::Heading2),
            hide(11, 14),
            styled(15, 17, DecorationKind::Heading3),
        ]
    );
}

#[test]
fn lone_marker_only_hides() {
    assert_eq!(extract_checked("#"), vec![hide(0, 1)]);
}

#[test]
fn setext_heading_hides_underline() {
    assert_eq!(
        extract_checked("Title\n=====\n"),
        vec![hide(6, 11), styled(0, 5, DecorationKind::Heading1)]
    );
}

#[test]
fn heading_is_split_around_inline_code() {
    insta::assert_snapshot!(render("# a `c` b"), @r##"
    hide 0..1 "#"
    heading1 2..4 "a "
    heading1 7..9 " b"
    hide 4..5 "`"
    hide 6..7 "`"
    code 5..6 "c"
    "##);
}

#[test]
fn crlf_line_endings() {
    assert_eq!(
        extract_checked("# T\r\n**b**"),
        vec![
            hide(0, 1),
            styled(2, 3, DecorationKind::Heading1),
            hide(5, 7),
            styled(7, 8, DecorationKind::Bold),
            hide(8, 10),
        ]
    );
}

// Emphasis

#[rstest]
#[case("**bold text**", vec![hide(0, 2), styled(2, 11, DecorationKind::Bold), hide(11, 13)])]
#[case("__bold__", vec![hide(0, 2), styled(2, 6, DecorationKind::Bold), hide(6, 8)])]
#[case("*it*", vec![hide(0, 1), styled(1, 3, DecorationKind::Italic), hide(3, 4)])]
#[case("_it_", vec![hide(0, 1), styled(1, 3, DecorationKind::Italic), hide(3, 4)])]
#[case("~~gone~~", vec![hide(0, 2), styled(2, 6, DecorationKind::Strikethrough), hide(6, 8)])]
fn emphasis_pairs(#[case] text: &str, #[case] expected: Vec<DecorationRange>) {
    assert_eq!(extract_checked(text), expected);
}

#[test]
fn repeated_markers_resolve_left_to_right() {
    assert_eq!(
        extract_checked("*it* and *more*"),
        vec![
            hide(0, 1),
            styled(1, 3, DecorationKind::Italic),
            hide(3, 4),
            hide(9, 10),
            styled(10, 14, DecorationKind::Italic),
            hide(14, 15),
        ]
    );
}

#[test]
fn em_inside_strong_becomes_bold_italic() {
    insta::assert_snapshot!(render("**bold *both* bold**"), @r#"
    hide 0..2 "**"
    hide 7..8 "*"
    hide 12..13 "*"
    boldItalic 2..7 "bold "
    boldItalic 8..12 "both"
    boldItalic 13..18 " bold"
    hide 18..20 "**"
    "#);
}

#[test]
fn strong_inside_em_becomes_bold_italic() {
    let ranges = extract_checked("*a **b** c*");
    let kinds: Vec<_> = ranges
        .iter()
        .filter(|r| r.kind.is_styled())
        .map(|r| r.kind)
        .collect();
    assert!(!kinds.is_empty());
    assert!(kinds.iter().all(|k| *k == DecorationKind::BoldItalic));
    assert_eq!(ranges.iter().filter(|r| r.kind == DecorationKind::Hide).count(), 4);
}

#[test]
fn triple_delimiters_style_only_the_word() {
    let styled: Vec<_> = extract_checked("***both***")
        .into_iter()
        .filter(|r| r.kind.is_styled())
        .collect();
    assert_eq!(styled, vec![DecorationRange::new(3, 7, DecorationKind::BoldItalic)]);
}

#[test]
fn strike_stays_independent_of_strong() {
    let ranges = extract_checked("**a ~~b~~ c**");
    assert!(ranges.iter().any(|r| r.kind == DecorationKind::Strikethrough));
    assert!(ranges.iter().any(|r| r.kind == DecorationKind::Bold));
    assert!(!ranges.iter().any(|r| r.kind == DecorationKind::BoldItalic));
}

#[test]
fn emphasis_across_lines() {
    assert_eq!(
        extract_checked("*one\ntwo*"),
        vec![hide(0, 1), styled(1, 8, DecorationKind::Italic), hide(8, 9)]
    );
}

#[test]
fn emphasis_inside_containers() {
    assert_eq!(
        extract_checked("- **two**"),
        vec![hide(2, 4), styled(4, 7, DecorationKind::Bold), hide(7, 9)]
    );
    assert_eq!(
        extract_checked("> *q*"),
        vec![hide(2, 3), styled(3, 4, DecorationKind::Italic), hide(4, 5)]
    );
}

// Code spans

#[test]
fn code_span() {
    assert_eq!(
        extract_checked("`code`"),
        vec![hide(0, 1), hide(5, 6), styled(1, 5, DecorationKind::Code)]
    );
}

#[test]
fn code_span_with_longer_run() {
    assert_eq!(
        extract_checked("``a`b``"),
        vec![hide(0, 2), hide(5, 7), styled(2, 5, DecorationKind::Code)]
    );
}

#[test]
fn sibling_code_spans() {
    assert_eq!(
        extract_checked("`a` and `b`"),
        vec![
            hide(0, 1),
            hide(2, 3),
            styled(1, 2, DecorationKind::Code),
            hide(8, 9),
            hide(10, 11),
            styled(9, 10, DecorationKind::Code),
        ]
    );
}

// Links and images

#[test]
fn inline_link_hides_delimiters_and_target_stays_plain() {
    insta::assert_snapshot!(render("see [docs](https://x.dev) now"), @r#"
    hide 4..5 "["
    hide 9..10 "]"
    hide 10..11 "("
    hide 24..25 ")"
    link 5..9 "docs"
    "#);
}

#[test]
fn image_styles_alt_text() {
    assert_eq!(
        extract_checked("![cat](c.png)"),
        vec![
            hide(0, 2),
            hide(5, 6),
            hide(6, 7),
            hide(12, 13),
            styled(2, 5, DecorationKind::Image),
        ]
    );
}

#[test]
fn image_with_empty_alt_has_no_style() {
    let ranges = extract_checked("![](c.png)");
    assert!(ranges.iter().all(|r| r.kind == DecorationKind::Hide));
}

#[test]
fn autolink_hides_angle_brackets() {
    assert_eq!(
        extract_checked("<https://a.b>"),
        vec![hide(0, 1), hide(12, 13), styled(1, 12, DecorationKind::Link)]
    );
}

#[test]
fn reference_links_are_skipped() {
    let text = "[a][r]\n\n[r]: https://x.dev\n";
    assert!(!extract_checked(text).iter().any(|r| r.kind == DecorationKind::Link));
}

#[test]
fn reference_link_leaves_later_constructs_in_place() {
    let text = "[ref][r] **b** [x](y)\n\n[r]: http://a\n";
    assert_eq!(
        extract_checked(text),
        vec![
            hide(9, 11),
            styled(11, 12, DecorationKind::Bold),
            hide(12, 14),
            hide(15, 16),
            hide(17, 18),
            hide(18, 19),
            hide(20, 21),
            styled(16, 17, DecorationKind::Link),
        ]
    );
}

#[test]
fn badge_link_hides_each_delimiter_once() {
    let ranges = extract_checked("[![alt](i.png)](u) *z*");
    let hides: Vec<_> = ranges
        .iter()
        .filter(|r| r.kind == DecorationKind::Hide)
        .map(|r| r.start..r.end)
        .collect();
    for (i, h) in hides.iter().enumerate() {
        assert!(!hides[i + 1..].contains(h), "duplicate hide {h:?}");
    }
    for h in [0..1, 1..3, 14..15, 15..16, 17..18] {
        assert!(hides.contains(&h), "missing hide {h:?}");
    }
    assert!(ranges.contains(&styled(3, 6, DecorationKind::Image)));
    assert!(ranges.contains(&styled(20, 21, DecorationKind::Italic)));
}

#[rstest]
#[case::entities("&ast;x&ast; *b*", 12)]
#[case::escapes("\\*a\\* *b*", 6)]
fn decoded_text_does_not_move_the_cursor(#[case] text: &str, #[case] at: usize) {
    assert_eq!(
        extract_checked(text),
        vec![
            hide(at, at + 1),
            styled(at + 1, at + 2, DecorationKind::Italic),
            hide(at + 2, at + 3),
        ]
    );
}

// Fences

#[test]
fn fence_hides_opening_info_and_closing_run() {
    assert_eq!(
        extract_checked("```rust\nfn main() {}\n```\n"),
        vec![hide(0, 7), hide(21, 24)]
    );
}

#[test]
fn unclosed_fence_only_hides_opening() {
    assert_eq!(extract_checked("```\ncode"), vec![hide(0, 3)]);
}

#[test]
fn fence_body_is_not_decorated() {
    let ranges = extract_checked("~~~\n**not bold**\n~~~");
    assert_eq!(ranges, vec![hide(0, 3), hide(17, 20)]);
}

// Whole-pass properties

const MIXED: &str = concat!(
    "# Notes\n\nSome **bold**, *it*, `code` and [a link](x).\n\n",
    "- ~~done~~ item\n- ![pic](p.png)\n\n",
    "```sh\necho hi\n```\n\n#### Deep *heading*\n",
);

#[test]
fn extraction_is_idempotent() {
    assert_eq!(extract_checked(MIXED), extract_checked(MIXED));
}

#[test]
fn mixed_document_covers_every_construct() {
    let ranges = extract_checked(MIXED);
    for kind in [
        DecorationKind::Hide,
        DecorationKind::Bold,
        DecorationKind::Italic,
        DecorationKind::Strikethrough,
        DecorationKind::Code,
        DecorationKind::Heading,
        DecorationKind::Heading1,
        DecorationKind::Link,
        DecorationKind::Image,
    ] {
        assert!(ranges.iter().any(|r| r.kind == kind), "no {kind} range");
    }
}

#[rstest]
#[case("")]
#[case("\n\n")]
#[case("**")]
#[case("*a **b* c**")]
#[case("[unclosed](")]
#[case("`")]
#[case("héllo *wörld* `ç`")]
#[case("> - # nested **deep**\n>   ```\n")]
fn malformed_input_stays_in_bounds(#[case] text: &str) {
    extract_checked(text);
}
