//! Year grouping, in-year category ordering and vertical sequencing.
//!
//! # Invariants
//! - Groups key on the original label; equal parsed values stay separate.
//! - Sorting is stable at both levels (by year, then by category rank).
//! - Every filtered event lands in exactly one group.
//! - Group offsets grow monotonically with cumulative content height.

use crate::config::LayoutMetrics;
use crate::model::record::{CategorySet, Event};
use crate::model::year::{parse_year, YearParseError};
use std::collections::HashMap;

/// In-year priority of event categories; earlier entries sort first.
pub const CATEGORY_PRIORITY: &[&str] = &["organize", "military", "diplomacy", "personage"];

/// Rank of a category in [`CATEGORY_PRIORITY`].
///
/// Multi-valued categories take their best-ranked tag. Unranked categories
/// share the rank after the last listed entry.
pub fn category_rank(category: &CategorySet) -> usize {
    category
        .tags()
        .filter_map(|tag| CATEGORY_PRIORITY.iter().position(|known| *known == tag))
        .min()
        .unwrap_or(CATEGORY_PRIORITY.len())
}

/// Stable in-place sort by category rank.
pub fn sort_by_category(events: &mut [&Event]) {
    events.sort_by_key(|event| category_rank(&event.category));
}

/// Events sharing one year label, with its unscaled vertical offset.
#[derive(Debug, Clone, PartialEq)]
pub struct YearGroup<'a> {
    pub label: String,
    /// Parsed year used for ordering only.
    pub year: i64,
    /// Position of this group among all groups, from 0.
    pub ordinal: usize,
    /// Unscaled top offset of the year marker.
    pub top_offset: u32,
    pub events: Vec<&'a Event>,
}

/// Ordered year groups produced for one recompute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearGroups<'a> {
    groups: Vec<YearGroup<'a>>,
    index: HashMap<String, usize>,
}

impl<'a> YearGroups<'a> {
    /// Year labels in ascending chronological order.
    pub fn ordered_years(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.label.as_str())
    }

    pub fn get(&self, label: &str) -> Option<&YearGroup<'a>> {
        self.index.get(label).and_then(|&idx| self.groups.get(idx))
    }

    /// Unscaled marker offset of `label`.
    pub fn offset_of(&self, label: &str) -> Option<u32> {
        self.get(label).map(|group| group.top_offset)
    }

    /// Events of `label`, category ordered.
    pub fn items_of(&self, label: &str) -> Option<&[&'a Event]> {
        self.get(label).map(|group| group.events.as_slice())
    }

    pub fn groups(&self) -> &[YearGroup<'a>] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Sum of all group sizes.
    pub fn total_items(&self) -> usize {
        self.groups.iter().map(|group| group.events.len()).sum()
    }
}

/// Groups filtered events by year label and assigns cumulative offsets.
///
/// # Errors
/// Returns the first [`YearParseError`] met; the whole recompute is blocked
/// rather than placing the bad record at an arbitrary position.
pub fn group_by_year<'a>(
    filtered: &[&'a Event],
    metrics: &LayoutMetrics,
) -> Result<YearGroups<'a>, YearParseError> {
    let mut keyed = filtered
        .iter()
        .map(|event| parse_year(&event.display_year).map(|year| (year, *event)))
        .collect::<Result<Vec<_>, _>>()?;
    keyed.sort_by_key(|(year, _)| *year);

    let mut groups: Vec<YearGroup<'a>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (year, event) in keyed {
        match index.get(event.display_year.as_str()) {
            Some(&idx) => groups[idx].events.push(event),
            None => {
                index.insert(event.display_year.clone(), groups.len());
                groups.push(YearGroup {
                    label: event.display_year.clone(),
                    year,
                    ordinal: groups.len(),
                    top_offset: 0,
                    events: vec![event],
                });
            }
        }
    }

    let mut current_top = metrics.base_offset;
    for group in &mut groups {
        sort_by_category(&mut group.events);
        group.top_offset = current_top;
        let cards = u32::try_from(group.events.len()).unwrap_or(u32::MAX);
        current_top = current_top
            .saturating_add(metrics.year_to_first_item)
            .saturating_add(cards.saturating_mul(metrics.item_spacing))
            .saturating_add(metrics.year_spacing);
    }

    Ok(YearGroups { groups, index })
}
