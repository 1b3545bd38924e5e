//! Text annotation pass: entity links and search highlights.
//!
//! # Responsibility
//! - Mark verbatim character names as entity links carrying the character id.
//! - Mark case-insensitive search matches as highlights.
//!
//! # Invariants
//! - Entity matching is longest-name-first and non-overlapping.
//! - A highlight never crosses an entity link boundary: gaps between links
//!   and each link's own name are highlighted independently.
//! - Markup is produced only when rendering; the annotation itself is typed.

pub mod spans;

use crate::source::EntityName;
use serde::Serialize;
pub use spans::{find_entity_spans, split_runs, EntitySpan, SearchHighlighter, TextRun};

/// CSS class of an entity link span.
pub const ENTITY_LINK_CLASS: &str = "character-link";
/// CSS class of a search highlight span.
pub const SEARCH_HIGHLIGHT_CLASS: &str = "search-highlight";

/// One piece of annotated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Text(TextRunView),
    EntityLink {
        entity_id: String,
        runs: Vec<TextRunView>,
    },
}

/// Serializable view of a [`TextRun`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextRunView {
    pub text: String,
    pub highlighted: bool,
}

impl From<TextRun> for TextRunView {
    fn from(run: TextRun) -> Self {
        Self {
            text: run.text,
            highlighted: run.highlighted,
        }
    }
}

/// Annotated display text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotatedText {
    pub segments: Vec<Segment>,
}

impl AnnotatedText {
    /// Text with all annotations dropped.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(run) => out.push_str(&run.text),
                Segment::EntityLink { runs, .. } => {
                    runs.iter().for_each(|run| out.push_str(&run.text));
                }
            }
        }
        out
    }

    /// Linked entity ids in text order.
    pub fn linked_ids(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::EntityLink { entity_id, .. } => Some(entity_id.as_str()),
                Segment::Text(_) => None,
            })
            .collect()
    }

    /// Number of highlighted runs, inside or outside links.
    pub fn highlight_count(&self) -> usize {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(run) => usize::from(run.highlighted),
                Segment::EntityLink { runs, .. } => {
                    runs.iter().filter(|run| run.highlighted).count()
                }
            })
            .sum()
    }

    /// Renders HTML markup with escaped text.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(run) => push_run(&mut out, run),
                Segment::EntityLink { entity_id, runs } => {
                    out.push_str(&format!(
                        "<span class=\"{ENTITY_LINK_CLASS}\" data-char-id=\"{}\">",
                        escape_html(entity_id)
                    ));
                    runs.iter().for_each(|run| push_run(&mut out, run));
                    out.push_str("</span>");
                }
            }
        }
        out
    }
}

/// Annotates `text` with entity links, then search highlights.
///
/// `entities` must be ordered longest name first (see
/// [`crate::source::Catalog::entities`]).
pub fn annotate(
    text: &str,
    entities: &[EntityName],
    highlighter: Option<&SearchHighlighter>,
) -> AnnotatedText {
    let spans = find_entity_spans(text, entities);
    let mut segments = Vec::new();
    let mut cursor = 0;

    for span in spans {
        push_gap(&mut segments, &text[cursor..span.range.start], highlighter);
        let runs = split_runs(&text[span.range.clone()], highlighter)
            .into_iter()
            .map(TextRunView::from)
            .collect();
        segments.push(Segment::EntityLink {
            entity_id: span.entity_id,
            runs,
        });
        cursor = span.range.end;
    }
    push_gap(&mut segments, &text[cursor..], highlighter);

    AnnotatedText { segments }
}

fn push_gap(segments: &mut Vec<Segment>, gap: &str, highlighter: Option<&SearchHighlighter>) {
    segments.extend(
        split_runs(gap, highlighter)
            .into_iter()
            .map(|run| Segment::Text(run.into())),
    );
}

fn push_run(out: &mut String, run: &TextRunView) {
    if run.highlighted {
        out.push_str(&format!(
            "<span class=\"{SEARCH_HIGHLIGHT_CLASS}\">{}</span>",
            escape_html(&run.text)
        ));
    } else {
        out.push_str(&escape_html(&run.text));
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{annotate, escape_html, SearchHighlighter};
    use crate::source::EntityName;

    #[test]
    fn markup_wraps_links_and_highlights() {
        let entities = vec![EntityName {
            id: "char_002".to_string(),
            name: "乔治·华盛顿".to_string(),
        }];
        let highlighter = SearchHighlighter::new("华盛顿");
        let annotated = annotate("乔治·华盛顿建立", &entities, highlighter.as_ref());
        assert_eq!(
            annotated.to_markup(),
            "<span class=\"character-link\" data-char-id=\"char_002\">乔治·\
             <span class=\"search-highlight\">华盛顿</span></span>建立"
        );
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(escape_html("<a&\"b\">"), "&lt;a&amp;&quot;b&quot;&gt;");
    }
}
