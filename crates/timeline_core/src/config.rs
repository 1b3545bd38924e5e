//! Engine-wide layout constants and zoom bounds.
//!
//! # Invariants
//! - Spacing constants are fixed per engine and never passed per call.
//! - Zoom is a percentage in `[ZOOM_MIN, ZOOM_MAX]` moving in `ZOOM_STEP`s.

use serde::{Deserialize, Serialize};

pub const ZOOM_MIN: u32 = 80;
pub const ZOOM_MAX: u32 = 150;
pub const ZOOM_STEP: u32 = 10;
pub const ZOOM_DEFAULT: u32 = 100;

/// Ticks the no-results state waits before clearing all filters.
pub const NO_RESULTS_COUNTDOWN_TICKS: u32 = 5;

/// Fixed geometry of the vertical timeline, in unscaled pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutMetrics {
    /// Top offset of the first year marker.
    pub base_offset: u32,
    /// Gap between a year marker and its first card.
    pub year_to_first_item: u32,
    /// Vertical slot of one card.
    pub item_spacing: u32,
    /// Gap after the last card of a year.
    pub year_spacing: u32,
    /// Cards shown per year before the "reveal more" affordance.
    pub page_size: usize,
    /// Extra room below the lowest item when sizing the timeline.
    pub height_padding: u32,
}

impl LayoutMetrics {
    pub const STANDARD: Self = Self {
        base_offset: 80,
        year_to_first_item: 50,
        item_spacing: 150,
        year_spacing: 150,
        page_size: 10,
        height_padding: 400,
    };
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Zoom percentage clamped to the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct ZoomLevel(u32);

impl ZoomLevel {
    /// Clamps `percent` into range and snaps it down onto the step grid.
    pub fn new(percent: u32) -> Self {
        let clamped = percent.clamp(ZOOM_MIN, ZOOM_MAX);
        let snapped = ZOOM_MIN + (clamped - ZOOM_MIN) / ZOOM_STEP * ZOOM_STEP;
        Self(snapped)
    }

    pub fn percent(self) -> u32 {
        self.0
    }

    /// Scale applied to unscaled offsets, e.g. `1.2` at 120%.
    pub fn factor(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// One step larger, saturating at the maximum.
    pub fn zoomed_in(self) -> Self {
        Self::new(self.0.saturating_add(ZOOM_STEP))
    }

    /// One step smaller, saturating at the minimum.
    pub fn zoomed_out(self) -> Self {
        Self::new(self.0.saturating_sub(ZOOM_STEP))
    }
}

impl From<u32> for ZoomLevel {
    fn from(percent: u32) -> Self {
        Self::new(percent)
    }
}

impl From<ZoomLevel> for u32 {
    fn from(value: ZoomLevel) -> Self {
        value.0
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self(ZOOM_DEFAULT)
    }
}
