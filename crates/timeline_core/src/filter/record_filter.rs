//! Record filter over the event collection.
//!
//! # Responsibility
//! - Turn raw control values into a typed [`FilterConfig`].
//! - Select the events matching every active predicate.
//!
//! # Invariants
//! - Predicates combine with logical AND; `all` facets always pass.
//! - Output preserves the catalog's relative event order.
//! - Every recompute evaluates every predicate; nothing is cached.
//! - Dangling character references count as non-matching, never as errors.
//! - Search uses the same case rule as highlighting, so a matched event
//!   always shows its highlight.

use crate::annotate::SearchHighlighter;
use crate::model::record::Event;
use crate::source::Catalog;
use log::warn;
use serde::{Deserialize, Serialize};

/// Sentinel accepted from controls for "no restriction".
pub const ALL_SENTINEL: &str = "all";

/// One filter dimension: either unrestricted or a concrete target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Facet {
    #[default]
    All,
    Only(String),
}

impl Facet {
    /// Normalizes a raw control value; blank and `all` map to [`Facet::All`].
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == ALL_SENTINEL {
            Self::All
        } else {
            Self::Only(trimmed.to_string())
        }
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Only(value) => Some(value.as_str()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// Field set a free-text search looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    /// Title, description, tags and referenced character names.
    #[default]
    All,
    /// Title and description.
    Events,
    /// Referenced character names.
    Characters,
    /// Tags (region facet).
    Region,
    /// Tags (period facet).
    Period,
}

impl SearchScope {
    /// Parses a control value; unknown values fall back to [`SearchScope::All`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "events" => Self::Events,
            "characters" => Self::Characters,
            "region" => Self::Region,
            "period" => Self::Period,
            _ => Self::All,
        }
    }
}

/// Complete filter configuration for one recompute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterConfig {
    pub category: Facet,
    pub character_category: Facet,
    pub region: Facet,
    pub period: Facet,
    /// Raw search text; matching trims it and ignores case.
    pub search: String,
    pub scope: SearchScope,
}

impl FilterConfig {
    /// Returns the configuration with every facet at `all` and no search.
    pub fn cleared() -> Self {
        Self::default()
    }

    /// Trimmed search term, `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        normalize_search_term(&self.search)
    }

    /// Whether this configuration restricts nothing.
    pub fn is_cleared(&self) -> bool {
        self.category.is_all()
            && self.character_category.is_all()
            && self.region.is_all()
            && self.period.is_all()
            && self.search_term().is_none()
    }
}

/// Trims a search input; blank input disables search.
pub fn normalize_search_term(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Returns the events matching `config`, in catalog order.
pub fn filter_events<'a>(catalog: &'a Catalog, config: &FilterConfig) -> Vec<&'a Event> {
    let matcher = match config.search_term() {
        None => None,
        Some(term) => match SearchHighlighter::new(term) {
            Some(matcher) => Some(matcher),
            None => {
                warn!("event=filter_events module=filter status=error reason=search_unavailable");
                return Vec::new();
            }
        },
    };
    catalog
        .events()
        .iter()
        .filter(|event| matches_event(catalog, event, config, matcher.as_ref()))
        .collect()
}

/// Evaluates every predicate for one event.
///
/// `matcher` is built from the config's search term; `None` disables search.
pub fn matches_event(
    catalog: &Catalog,
    event: &Event,
    config: &FilterConfig,
    matcher: Option<&SearchHighlighter>,
) -> bool {
    matches_category(event, &config.category)
        && matches_character_category(catalog, event, &config.character_category)
        && matches_tag_facet(catalog, event, &config.region)
        && matches_tag_facet(catalog, event, &config.period)
        && matches_search(event, matcher, config.scope)
}

fn matches_category(event: &Event, facet: &Facet) -> bool {
    match facet.target() {
        None => true,
        Some(target) => event.category.contains_tag(target),
    }
}

fn matches_character_category(catalog: &Catalog, event: &Event, facet: &Facet) -> bool {
    match facet.target() {
        None => true,
        Some(target) => catalog
            .resolved_characters(event)
            .any(|character| character.category.contains_tag(target)),
    }
}

// Tags fold several facets into one string, hence substring matching.
fn matches_tag_facet(catalog: &Catalog, event: &Event, facet: &Facet) -> bool {
    match facet.target() {
        None => true,
        Some(target) => {
            event.has_tag_containing(target)
                || catalog
                    .resolved_characters(event)
                    .any(|character| character.has_tag_containing(target))
        }
    }
}

fn matches_search(event: &Event, matcher: Option<&SearchHighlighter>, scope: SearchScope) -> bool {
    let Some(matcher) = matcher else {
        return true;
    };

    let in_text = || {
        matcher.is_match(&event.title)
            || event.description.lines().iter().any(|line| matcher.is_match(line))
    };
    let in_tags = || event.tags.iter().any(|tag| matcher.is_match(tag));
    let in_names = || {
        event
            .characters
            .iter()
            .any(|reference| matcher.is_match(&reference.name))
    };

    match scope {
        SearchScope::All => in_text() || in_tags() || in_names(),
        SearchScope::Events => in_text(),
        SearchScope::Characters => in_names(),
        SearchScope::Region | SearchScope::Period => in_tags(),
    }
}

#[cfg(test)]
mod tests {
    use super::{Facet, SearchScope};

    #[test]
    fn facet_parse_maps_sentinel_and_blank_to_all() {
        assert_eq!(Facet::parse("all"), Facet::All);
        assert_eq!(Facet::parse("  "), Facet::All);
        assert_eq!(Facet::parse(" 欧洲 "), Facet::Only("欧洲".to_string()));
    }

    #[test]
    fn scope_parse_falls_back_to_all() {
        assert_eq!(SearchScope::parse("Characters"), SearchScope::Characters);
        assert_eq!(SearchScope::parse("unknown"), SearchScope::All);
    }
}
