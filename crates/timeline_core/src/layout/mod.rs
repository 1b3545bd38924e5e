//! Timeline layout: grouping, positioning, pagination and frame assembly.
//!
//! # Responsibility
//! - Turn a catalog and an immutable [`LayoutRequest`] into a
//!   [`TimelineLayout`] in one synchronous pass.
//! - Extend an existing layout with one more page of a year's cards.
//!
//! # Invariants
//! - [`compute_layout`] is pure; calling it twice with equal inputs yields
//!   equal layouts.
//! - The only state carried between calls is the per-year reveal cursor.
//! - A malformed year label fails the whole recompute.

pub mod frame;
pub mod grouping;
pub mod pagination;
pub mod positioner;

use crate::annotate::{annotate, SearchHighlighter};
use crate::config::{LayoutMetrics, ZoomLevel, NO_RESULTS_COUNTDOWN_TICKS};
use crate::error::{LayoutError, LayoutResult};
use crate::filter::record_filter::{filter_events, FilterConfig};
use crate::labels::event_category_label;
use crate::model::record::Event;
use crate::source::{Catalog, EntityName};
use frame::{NoResults, PositionedCard, RevealAffordance, TimelineFrame, TimelineSummary, YearMarker};
use grouping::group_by_year;
use log::debug;
use pagination::RevealState;
use positioner::{global_index, position, SLOTS_PER_YEAR};
use serde::{Deserialize, Serialize};

/// Controls for one recompute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub filters: FilterConfig,
    pub zoom: ZoomLevel,
}

impl LayoutRequest {
    pub fn new(filters: FilterConfig, zoom: ZoomLevel) -> Self {
        Self { filters, zoom }
    }
}

/// Owned slot data of one laid-out year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSlots {
    pub label: String,
    pub ordinal: usize,
    /// Unscaled marker offset.
    pub top_offset: u32,
    /// Event ids in category order.
    pub event_ids: Vec<String>,
}

/// Result of one recompute plus its reveal cursors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineLayout {
    pub request: LayoutRequest,
    pub frame: TimelineFrame,
    pub years: Vec<YearSlots>,
    pub reveal: RevealState,
}

impl TimelineLayout {
    pub fn year(&self, label: &str) -> Option<&YearSlots> {
        self.years.iter().find(|year| year.label == label)
    }

    /// Cards currently shown for `label`.
    pub fn revealed_count(&self, label: &str) -> usize {
        self.reveal.revealed_count(label)
    }
}

/// Shared inputs for building cards of one layout.
pub struct CardContext<'a> {
    pub entities: &'a [EntityName],
    pub highlighter: Option<&'a SearchHighlighter>,
    pub zoom: ZoomLevel,
    pub metrics: &'a LayoutMetrics,
}

impl CardContext<'_> {
    /// Builds the card for the `index_within_year`-th event of `year`.
    ///
    /// Cards past the first page stack below it: their slot base moves down
    /// by one page of slots per page already shown.
    pub fn card(&self, event: &Event, year: &YearSlots, index_within_year: usize) -> PositionedCard {
        let index = global_index(year.ordinal, index_within_year);
        let page_start =
            u32::try_from(index_within_year / SLOTS_PER_YEAR * SLOTS_PER_YEAR).unwrap_or(u32::MAX);
        // Offsets saturate at the bottom of the surface.
        let slot_base = year
            .top_offset
            .saturating_add(self.metrics.year_to_first_item)
            .saturating_add(page_start.saturating_mul(self.metrics.item_spacing));
        let placement = position(index, slot_base, self.zoom.factor(), self.metrics.item_spacing);

        let category_label = event_category_label(&event.category);
        PositionedCard {
            event_id: event.id.clone(),
            year_label: year.label.clone(),
            category_tags: event.category.tags().map(str::to_string).collect(),
            category: annotate(&category_label, self.entities, self.highlighter),
            title: annotate(&event.title, self.entities, self.highlighter),
            description: event
                .description
                .lines()
                .into_iter()
                .map(|line| annotate(line, self.entities, self.highlighter))
                .collect(),
            tags: event.tags.clone(),
            location: event.location.clone().filter(|value| !value.trim().is_empty()),
            global_index: index,
            year_offset: slot_base,
            pixel_top: placement.pixel_top,
            side: placement.side,
            scale: self.zoom.factor(),
        }
    }
}

/// Filters, groups and positions the eager window for `request`.
///
/// # Errors
/// Returns [`LayoutError::Year`] when a matching event has a malformed year.
pub fn compute_layout(
    catalog: &Catalog,
    request: &LayoutRequest,
    metrics: &LayoutMetrics,
) -> LayoutResult<TimelineLayout> {
    let filtered = filter_events(catalog, &request.filters);
    let groups = group_by_year(&filtered, metrics)?;
    let highlighter = request.filters.search_term().and_then(SearchHighlighter::new);
    let context = CardContext {
        entities: catalog.entities(),
        highlighter: highlighter.as_ref(),
        zoom: request.zoom,
        metrics,
    };

    let mut frame = TimelineFrame {
        zoom_percent: request.zoom.percent(),
        summary: TimelineSummary {
            event_count: groups.total_items(),
            year_count: groups.len(),
        },
        ..TimelineFrame::default()
    };
    let mut years = Vec::with_capacity(groups.len());
    let mut reveal = RevealState::default();

    for group in groups.groups() {
        let slots = YearSlots {
            label: group.label.clone(),
            ordinal: group.ordinal,
            top_offset: group.top_offset,
            event_ids: group.events.iter().map(|event| event.id.clone()).collect(),
        };
        frame
            .markers
            .push(YearMarker::new(&group.label, group.top_offset, request.zoom));

        let window = reveal.open(&group.label, group.events.len(), metrics.page_size);
        for index in window.eager_range() {
            frame.cards.push(context.card(group.events[index], &slots, index));
        }
        if window.has_more() {
            frame.reveal.push(RevealAffordance {
                year_label: group.label.clone(),
                remaining: window.remaining(),
            });
        }
        years.push(slots);
    }

    if groups.is_empty() {
        frame.no_results = Some(NoResults {
            remaining_ticks: NO_RESULTS_COUNTDOWN_TICKS,
        });
    }
    frame.refresh_height(metrics);

    debug!(
        "event=layout_computed module=layout status=ok years={} cards={} zoom={}",
        frame.markers.len(),
        frame.cards.len(),
        request.zoom.percent()
    );

    Ok(TimelineLayout {
        request: request.clone(),
        frame,
        years,
        reveal,
    })
}

/// Reveals the next page of `year_label` and appends its cards to the frame.
///
/// Returns the newly positioned cards; an empty list when the year is
/// already fully shown.
///
/// # Errors
/// Returns [`LayoutError::UnknownYear`] when the year is not laid out.
pub fn reveal_more(
    layout: &mut TimelineLayout,
    catalog: &Catalog,
    year_label: &str,
    metrics: &LayoutMetrics,
) -> LayoutResult<Vec<PositionedCard>> {
    let year_idx = layout
        .years
        .iter()
        .position(|year| year.label == year_label)
        .ok_or_else(|| LayoutError::UnknownYear(year_label.to_string()))?;
    let Some(window) = layout.reveal.window_mut(year_label) else {
        return Err(LayoutError::UnknownYear(year_label.to_string()));
    };
    let Some(range) = window.advance() else {
        return Ok(Vec::new());
    };
    let remaining = window.remaining();

    let highlighter = layout
        .request
        .filters
        .search_term()
        .and_then(SearchHighlighter::new);
    let context = CardContext {
        entities: catalog.entities(),
        highlighter: highlighter.as_ref(),
        zoom: layout.request.zoom,
        metrics,
    };

    let year = &layout.years[year_idx];
    let cards = range
        .filter_map(|index| {
            let event = catalog.event(year.event_ids.get(index)?)?;
            Some(context.card(event, year, index))
        })
        .collect::<Vec<_>>();

    layout.frame.cards.extend(cards.iter().cloned());
    if remaining == 0 {
        layout.frame.reveal.retain(|item| item.year_label != year_label);
    } else if let Some(item) = layout
        .frame
        .reveal
        .iter_mut()
        .find(|item| item.year_label == year_label)
    {
        item.remaining = remaining;
    }
    layout.frame.refresh_height(metrics);

    debug!(
        "event=year_revealed module=layout status=ok year={} added={} remaining={}",
        year_label,
        cards.len(),
        remaining
    );
    Ok(cards)
}
