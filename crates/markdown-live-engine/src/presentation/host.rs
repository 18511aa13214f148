use std::ops::Range;

use crate::decorations::{DecorationKind, extract};
use crate::parsing::Position;

use super::{DecorationGroups, SelectionSpan, filter_and_group};

/// The editor capabilities a decoration pass needs.
///
/// Implementors own the document and the rendering; the engine only reads
/// text and selections and hands back byte ranges per kind.
pub trait EditorHost {
    /// Language of the active document, e.g. `"markdown"`.
    fn language_id(&self) -> &str;

    fn document_text(&self) -> &str;

    fn offset_to_position(&self, offset: usize) -> Position;

    fn active_selections(&self) -> Vec<SelectionSpan>;

    /// Replaces every range previously styled as `kind`. An empty slice
    /// clears the kind.
    fn apply_style(&mut self, kind: DecorationKind, ranges: &[Range<usize>]);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratorOptions {
    /// Language ids that get decorated.
    pub languages: Vec<String>,
    /// Show raw markdown on lines touched by a selection.
    pub reveal_selected_lines: bool,
    /// Kinds that are always applied empty.
    pub disabled_kinds: Vec<DecorationKind>,
}

impl Default for DecoratorOptions {
    fn default() -> Self {
        Self {
            languages: vec!["markdown".into(), "md".into(), "mdx".into()],
            reveal_selected_lines: true,
            disabled_kinds: Vec::new(),
        }
    }
}

impl DecoratorOptions {
    pub fn applies_to(&self, language_id: &str) -> bool {
        self.languages
            .iter()
            .any(|lang| lang.eq_ignore_ascii_case(language_id))
    }

    fn is_enabled(&self, kind: DecorationKind) -> bool {
        !self.disabled_kinds.contains(&kind)
    }
}

/// Runs full decoration passes against an [`EditorHost`].
#[derive(Debug, Clone, Default)]
pub struct Decorator {
    options: DecoratorOptions,
}

impl Decorator {
    pub fn new(options: DecoratorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecoratorOptions {
        &self.options
    }

    /// Recomputes every decoration of the host's document and applies each
    /// kind, clearing kinds with no ranges.
    ///
    /// Returns the applied groups, or `None` (touching nothing) when the
    /// document's language is not decorated.
    pub fn update<H: EditorHost + ?Sized>(&self, host: &mut H) -> Option<DecorationGroups> {
        if !self.options.applies_to(host.language_id()) {
            log::debug!("skipping document with language {:?}", host.language_id());
            return None;
        }

        let mut groups = {
            let ranges = extract(host.document_text());
            let selections = if self.options.reveal_selected_lines {
                host.active_selections()
            } else {
                Vec::new()
            };
            filter_and_group(&ranges, &selections, |offset| host.offset_to_position(offset).line)
        };
        groups.groups.retain(|kind, _| self.options.is_enabled(*kind));

        for kind in DecorationKind::ALL {
            host.apply_style(kind, groups.get(kind));
        }
        log::debug!("applied {} decorations", groups.len());
        Some(groups)
    }

    /// Clears every kind on the host.
    pub fn clear<H: EditorHost + ?Sized>(&self, host: &mut H) {
        for kind in DecorationKind::ALL {
            host.apply_style(kind, &[]);
        }
    }
}
