//! Record source loading and the in-memory catalog.
//!
//! # Responsibility
//! - Load characters and events once from a JSON record source.
//! - Answer id lookups for cross references.
//! - Keep the entity list used for name linking, longest name first.
//!
//! # Invariants
//! - A missing source yields an empty catalog, logged as a warning.
//! - A missing or `null` collection loads as empty, logged per collection.
//! - Lookups never fail on dangling ids; they return `None`.
//! - The catalog is immutable after construction.

use crate::model::record::{Character, Event};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type SourceResult<T> = Result<T, SourceError>;

/// Failure while reading a record source.
#[derive(Debug)]
pub enum SourceError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Two records in one collection share an id.
    DuplicateId {
        collection: &'static str,
        id: String,
    },
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read record source: {err}"),
            Self::Json(err) => write!(f, "invalid record source document: {err}"),
            Self::DuplicateId { collection, id } => {
                write!(f, "duplicate id `{id}` in {collection}")
            }
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::DuplicateId { .. } => None,
        }
    }
}

impl From<std::io::Error> for SourceError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Wire shape of a record source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecordDocument")]
pub struct RecordSource {
    pub characters: Vec<Character>,
    pub events: Vec<Event>,
}

/// Decoded document before absent collections are replaced.
#[derive(Deserialize)]
struct RecordDocument {
    #[serde(default)]
    characters: Option<Vec<Character>>,
    #[serde(default)]
    events: Option<Vec<Event>>,
}

impl From<RecordDocument> for RecordSource {
    fn from(value: RecordDocument) -> Self {
        Self {
            characters: present_or_empty(value.characters, "characters"),
            events: present_or_empty(value.events, "events"),
        }
    }
}

fn present_or_empty<T>(collection: Option<Vec<T>>, name: &str) -> Vec<T> {
    collection.unwrap_or_else(|| {
        warn!("event=catalog_loaded module=source status=missing collection={name}");
        Vec::new()
    })
}

/// Entity name used by the text annotation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityName {
    pub id: String,
    pub name: String,
}

/// Immutable set of loaded records with id indexes.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    characters: Vec<Character>,
    events: Vec<Event>,
    character_index: HashMap<String, usize>,
    event_index: HashMap<String, usize>,
    entities: Vec<EntityName>,
}

impl Catalog {
    /// Builds a catalog from an already decoded source.
    ///
    /// # Errors
    /// Returns [`SourceError::DuplicateId`] when a collection repeats an id.
    pub fn new(source: RecordSource) -> SourceResult<Self> {
        let character_index = index_by_id(&source.characters, |c| &c.id, "characters")?;
        let event_index = index_by_id(&source.events, |e| &e.id, "events")?;

        let mut entities = source
            .characters
            .iter()
            .filter(|character| !character.name.is_empty())
            .map(|character| EntityName {
                id: character.id.clone(),
                name: character.name.clone(),
            })
            .collect::<Vec<_>>();
        // Stable: equal lengths keep source order.
        entities.sort_by(|a, b| b.name.chars().count().cmp(&a.name.chars().count()));

        info!(
            "event=catalog_loaded module=source status=ok characters={} events={}",
            source.characters.len(),
            source.events.len()
        );

        Ok(Self {
            characters: source.characters,
            events: source.events,
            character_index,
            event_index,
            entities,
        })
    }

    /// Builds a catalog, treating an absent source as empty.
    pub fn from_source(source: Option<RecordSource>) -> SourceResult<Self> {
        match source {
            Some(source) => Self::new(source),
            None => {
                warn!("event=catalog_loaded module=source status=missing characters=0 events=0");
                Ok(Self::default())
            }
        }
    }

    /// Decodes a JSON record source document.
    pub fn from_json_str(json: &str) -> SourceResult<Self> {
        let source = serde_json::from_str::<RecordSource>(json)?;
        Self::new(source)
    }

    /// Reads and decodes a JSON record source file.
    pub fn from_path(path: impl AsRef<Path>) -> SourceResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn character(&self, id: &str) -> Option<&Character> {
        self.character_index
            .get(id)
            .and_then(|&idx| self.characters.get(idx))
    }

    pub fn event(&self, id: &str) -> Option<&Event> {
        self.event_index.get(id).and_then(|&idx| self.events.get(idx))
    }

    /// Resolves an event's character references, dropping dangling ids.
    pub fn resolved_characters<'a>(&'a self, event: &'a Event) -> impl Iterator<Item = &'a Character> {
        event
            .characters
            .iter()
            .filter_map(move |reference| self.character(&reference.id))
    }

    /// Character names for linking, longest first.
    pub fn entities(&self) -> &[EntityName] {
        &self.entities
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty() && self.events.is_empty()
    }
}

fn index_by_id<T>(
    items: &[T],
    id_of: impl Fn(&T) -> &String,
    collection: &'static str,
) -> SourceResult<HashMap<String, usize>> {
    let mut index = HashMap::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let id = id_of(item);
        if index.insert(id.clone(), position).is_some() {
            return Err(SourceError::DuplicateId {
                collection,
                id: id.clone(),
            });
        }
    }
    Ok(index)
}
