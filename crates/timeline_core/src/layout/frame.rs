//! Output shapes handed to the rendering surface.

use crate::annotate::AnnotatedText;
use crate::config::{LayoutMetrics, ZoomLevel};
use crate::layout::positioner::{position, Side};
use serde::Serialize;

/// Year marker on the central axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearMarker {
    pub label: String,
    /// Unscaled marker offset.
    pub year_offset: u32,
    pub pixel_top: f64,
}

impl YearMarker {
    pub fn new(label: impl Into<String>, year_offset: u32, zoom: ZoomLevel) -> Self {
        Self {
            label: label.into(),
            year_offset,
            pixel_top: f64::from(year_offset) * zoom.factor(),
        }
    }

    /// Recomputes the pixel top from the stored offset.
    pub fn rescale(&mut self, zoom: ZoomLevel) {
        self.pixel_top = f64::from(self.year_offset) * zoom.factor();
    }
}

/// Positioned, annotated event card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedCard {
    pub event_id: String,
    pub year_label: String,
    /// Raw category tags, used as style classes.
    pub category_tags: Vec<String>,
    pub category: AnnotatedText,
    pub title: AnnotatedText,
    /// One entry per description line.
    pub description: Vec<AnnotatedText>,
    pub tags: Vec<String>,
    pub location: Option<String>,
    pub global_index: usize,
    /// Unscaled offset of the card's slot base; pixel tops derive from it.
    pub year_offset: u32,
    pub pixel_top: f64,
    pub side: Side,
    /// Card scale, equal to the zoom factor.
    pub scale: f64,
}

impl PositionedCard {
    /// Recomputes pixel top and scale from the stored unscaled values.
    pub fn rescale(&mut self, zoom: ZoomLevel, metrics: &LayoutMetrics) {
        let placement = position(
            self.global_index,
            self.year_offset,
            zoom.factor(),
            metrics.item_spacing,
        );
        self.pixel_top = placement.pixel_top;
        self.side = placement.side;
        self.scale = zoom.factor();
    }

    /// Description rendered as markup, lines joined by `<br>`.
    pub fn description_markup(&self) -> String {
        self.description
            .iter()
            .map(AnnotatedText::to_markup)
            .collect::<Vec<_>>()
            .join("<br>")
    }
}

/// "Reveal more" affordance for a year with hidden cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevealAffordance {
    pub year_label: String,
    pub remaining: usize,
}

impl RevealAffordance {
    /// Button caption, e.g. `加载更多 (3 个事件)`.
    pub fn caption(&self) -> String {
        format!("加载更多 ({} 个事件)", self.remaining)
    }
}

/// Empty-result state with its auto-clear countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NoResults {
    pub remaining_ticks: u32,
}

impl NoResults {
    pub fn caption(&self) -> String {
        format!("{}秒后自动返回", self.remaining_ticks)
    }
}

/// Counts shown in the page header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimelineSummary {
    pub event_count: usize,
    pub year_count: usize,
}

impl TimelineSummary {
    pub fn caption(&self) -> String {
        format!("共 {} 个事件，{} 个年份", self.event_count, self.year_count)
    }
}

/// Everything the rendering surface draws for one recompute.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimelineFrame {
    pub zoom_percent: u32,
    pub markers: Vec<YearMarker>,
    pub cards: Vec<PositionedCard>,
    pub reveal: Vec<RevealAffordance>,
    pub no_results: Option<NoResults>,
    pub summary: TimelineSummary,
    /// Pixel height needed to show every marker and card.
    pub height: f64,
}

impl TimelineFrame {
    /// Rescales every marker and card, then the height.
    pub fn rescale(&mut self, zoom: ZoomLevel, metrics: &LayoutMetrics) {
        self.zoom_percent = zoom.percent();
        self.markers.iter_mut().for_each(|marker| marker.rescale(zoom));
        self.cards
            .iter_mut()
            .for_each(|card| card.rescale(zoom, metrics));
        self.refresh_height(metrics);
    }

    /// Lowest pixel top of any marker or card plus padding.
    pub fn refresh_height(&mut self, metrics: &LayoutMetrics) {
        let lowest = self
            .markers
            .iter()
            .map(|marker| marker.pixel_top)
            .chain(self.cards.iter().map(|card| card.pixel_top))
            .fold(0.0_f64, f64::max);
        self.height = lowest + f64::from(metrics.height_padding);
    }

    pub fn card(&self, event_id: &str) -> Option<&PositionedCard> {
        self.cards.iter().find(|card| card.event_id == event_id)
    }

    pub fn marker(&self, label: &str) -> Option<&YearMarker> {
        self.markers.iter().find(|marker| marker.label == label)
    }

    pub fn reveal_for(&self, label: &str) -> Option<&RevealAffordance> {
        self.reveal.iter().find(|item| item.year_label == label)
    }
}
