//! Character and event records.
//!
//! # Responsibility
//! - Define the immutable record shapes consumed by the layout engine.
//! - Hide the "single tag or list of tags" category shape behind one type.
//!
//! # Invariants
//! - `id` is unique within its own collection.
//! - Cross references (`characters[].id`, `related_events[]`) may dangle and
//!   are resolved by omission, never by failure.
//! - Records are never mutated after the source is loaded.

use serde::{Deserialize, Serialize};

/// Opaque record identifier.
pub type RecordId = String;

/// Category value that is either one tag or an ordered list of tags.
///
/// Both shapes answer membership the same way, so callers never branch on
/// the shape themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategorySet {
    Single(String),
    Many(Vec<String>),
}

impl CategorySet {
    /// Returns whether `tag` is this category (single) or one of its members.
    pub fn contains_tag(&self, tag: &str) -> bool {
        match self {
            Self::Single(value) => value == tag,
            Self::Many(values) => values.iter().any(|value| value == tag),
        }
    }

    /// Iterates tags in declaration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::Many(values) => values.as_slice(),
        };
        slice.iter().map(String::as_str)
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl From<&str> for CategorySet {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<Vec<&str>> for CategorySet {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Display text that is either one paragraph or several lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Lines(Vec<String>),
}

impl Description {
    /// Returns the lines to render, one entry per visual line.
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Text(value) => vec![value.as_str()],
            Self::Lines(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl Default for Description {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for Description {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Denormalized character reference carried by an event.
///
/// `name` is a snapshot for display and search; filtering resolves the live
/// character through `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRef {
    pub id: RecordId,
    pub name: String,
}

/// Dated event rendered as a timeline card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: RecordId,
    /// Display year label; also the grouping key.
    #[serde(rename = "year", alias = "displayYear")]
    pub display_year: String,
    pub title: String,
    #[serde(default)]
    pub description: Description,
    #[serde(default)]
    pub category: CategorySet,
    #[serde(default)]
    pub characters: Vec<CharacterRef>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Event {
    /// Creates an event with empty optional projections.
    pub fn new(
        id: impl Into<RecordId>,
        display_year: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<CategorySet>,
    ) -> Self {
        Self {
            id: id.into(),
            display_year: display_year.into(),
            title: title.into(),
            description: Description::default(),
            category: category.into(),
            characters: Vec::new(),
            location: None,
            tags: Vec::new(),
        }
    }

    /// Returns whether any own tag contains `needle` as a substring.
    pub fn has_tag_containing(&self, needle: &str) -> bool {
        self.tags.iter().any(|tag| tag.contains(needle))
    }
}

/// Historical figure referenced by events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub birth: String,
    #[serde(default)]
    pub death: String,
    #[serde(default)]
    pub description: Description,
    #[serde(default)]
    pub category: CategorySet,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub related_events: Vec<RecordId>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Character {
    /// Creates a character with empty optional projections.
    pub fn new(
        id: impl Into<RecordId>,
        name: impl Into<String>,
        category: impl Into<CategorySet>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            title: String::new(),
            birth: String::new(),
            death: String::new(),
            description: Description::default(),
            category: category.into(),
            achievements: Vec::new(),
            related_events: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Returns whether any tag contains `needle` as a substring.
    pub fn has_tag_containing(&self, needle: &str) -> bool {
        self.tags.iter().any(|tag| tag.contains(needle))
    }
}
