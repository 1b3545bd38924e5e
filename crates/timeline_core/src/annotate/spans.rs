//! Entity span detection and search-term run splitting.

use crate::source::EntityName;
use log::debug;
use regex::{Regex, RegexBuilder};
use std::ops::Range;

/// Byte range of one linked entity occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub range: Range<usize>,
    pub entity_id: String,
}

/// Finds every verbatim entity occurrence, longest names first.
///
/// `entities` must be ordered longest name first. A candidate overlapping an
/// already claimed span is skipped, so a short name inside a longer one is
/// never linked on its own. Returned spans are sorted by start.
pub fn find_entity_spans(text: &str, entities: &[EntityName]) -> Vec<EntitySpan> {
    let mut spans: Vec<EntitySpan> = Vec::new();
    for entity in entities {
        if entity.name.is_empty() {
            continue;
        }
        for (start, matched) in text.match_indices(entity.name.as_str()) {
            let range = start..start + matched.len();
            let overlaps = spans
                .iter()
                .any(|span| span.range.start < range.end && range.start < span.range.end);
            if !overlaps {
                spans.push(EntitySpan {
                    range,
                    entity_id: entity.id.clone(),
                });
            }
        }
    }
    spans.sort_by_key(|span| span.range.start);
    spans
}

/// Case-insensitive literal matcher for the active search term.
#[derive(Debug, Clone)]
pub struct SearchHighlighter {
    regex: Regex,
}

impl SearchHighlighter {
    /// Compiles a matcher for `term`; blank terms disable highlighting.
    pub fn new(term: &str) -> Option<Self> {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            return None;
        }
        match RegexBuilder::new(&regex::escape(trimmed))
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => Some(Self { regex }),
            Err(err) => {
                debug!("event=highlight_disabled module=annotate status=error error={err}");
                None
            }
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Splits `text` into alternating plain and highlighted runs.
    pub fn split(&self, text: &str) -> Vec<TextRun> {
        let mut runs = Vec::new();
        let mut cursor = 0;
        for found in self.regex.find_iter(text) {
            if found.start() > cursor {
                runs.push(TextRun::plain(&text[cursor..found.start()]));
            }
            runs.push(TextRun::highlighted(found.as_str()));
            cursor = found.end();
        }
        if cursor < text.len() {
            runs.push(TextRun::plain(&text[cursor..]));
        }
        runs
    }
}

/// Contiguous text with a single highlight state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub highlighted: bool,
}

impl TextRun {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: false,
        }
    }

    pub fn highlighted(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: true,
        }
    }
}

/// Runs for `text`, highlighted when a matcher is active.
pub fn split_runs(text: &str, highlighter: Option<&SearchHighlighter>) -> Vec<TextRun> {
    match highlighter {
        Some(highlighter) => highlighter.split(text),
        None if text.is_empty() => Vec::new(),
        None => vec![TextRun::plain(text)],
    }
}
