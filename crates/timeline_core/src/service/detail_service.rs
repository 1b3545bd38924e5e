//! Detail view projections for a selected record.
//!
//! # Responsibility
//! - Resolve a character with its related events in chronological order.
//! - Resolve an event with its referenced characters.
//!
//! # Invariants
//! - Dangling references are dropped silently.
//! - Related events sort by parsed year ascending; equal years keep the
//!   character's declaration order.

use crate::error::LayoutResult;
use crate::labels::{character_category_name, event_category_label};
use crate::model::year::parse_year;
use crate::source::Catalog;
use serde::Serialize;

/// Related event line in a character detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedEvent {
    pub id: String,
    pub year_label: String,
    pub year: i64,
    pub title: String,
}

impl RelatedEvent {
    /// List caption, e.g. `公元1510年 - 「选民行会」成立`.
    pub fn caption(&self) -> String {
        format!("{} - {}", self.year_label, self.title)
    }
}

/// Character detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterDetail {
    pub id: String,
    pub name: String,
    pub title: String,
    /// `birth - death` labels.
    pub lifespan: String,
    /// Category names joined for display; empty when uncategorized.
    pub category_name: String,
    pub description: Vec<String>,
    pub achievements: Vec<String>,
    pub related_events: Vec<RelatedEvent>,
    pub tags: Vec<String>,
}

/// Character reference resolved for an event detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedCharacter {
    pub id: String,
    pub name: String,
    pub title: String,
}

/// Event detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDetail {
    pub id: String,
    pub year_label: String,
    pub title: String,
    pub category_label: String,
    pub description: Vec<String>,
    pub location: Option<String>,
    pub characters: Vec<ResolvedCharacter>,
    pub tags: Vec<String>,
}

/// Builds the detail view of character `id`.
///
/// Returns `Ok(None)` for unknown ids.
///
/// # Errors
/// Propagates a malformed year label of a resolved related event.
pub fn character_detail(catalog: &Catalog, id: &str) -> LayoutResult<Option<CharacterDetail>> {
    let Some(character) = catalog.character(id) else {
        return Ok(None);
    };

    let mut related_events = Vec::new();
    for event_id in &character.related_events {
        let Some(event) = catalog.event(event_id) else {
            continue;
        };
        related_events.push(RelatedEvent {
            id: event.id.clone(),
            year_label: event.display_year.clone(),
            year: parse_year(&event.display_year)?,
            title: event.title.clone(),
        });
    }
    related_events.sort_by_key(|related| related.year);

    Ok(Some(CharacterDetail {
        id: character.id.clone(),
        name: character.name.clone(),
        title: character.title.clone(),
        lifespan: format!("{} - {}", character.birth, character.death),
        category_name: character_category_name(&character.category),
        description: to_owned_lines(character.description.lines()),
        achievements: character.achievements.clone(),
        related_events,
        tags: character.tags.clone(),
    }))
}

/// Builds the detail view of event `id`, `None` for unknown ids.
pub fn event_detail(catalog: &Catalog, id: &str) -> Option<EventDetail> {
    let event = catalog.event(id)?;
    let characters = catalog
        .resolved_characters(event)
        .map(|character| ResolvedCharacter {
            id: character.id.clone(),
            name: character.name.clone(),
            title: character.title.clone(),
        })
        .collect();

    Some(EventDetail {
        id: event.id.clone(),
        year_label: event.display_year.clone(),
        title: event.title.clone(),
        category_label: event_category_label(&event.category),
        description: to_owned_lines(event.description.lines()),
        location: event.location.clone().filter(|value| !value.trim().is_empty()),
        characters,
        tags: event.tags.clone(),
    })
}

fn to_owned_lines(lines: Vec<&str>) -> Vec<String> {
    lines.into_iter().map(str::to_string).collect()
}
