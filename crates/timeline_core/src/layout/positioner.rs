//! Card placement on either side of the central axis.
//!
//! # Invariants
//! - `global_index = year_ordinal * 10 + index_within_year`; a later year's
//!   alternation never depends on how many cards earlier years hold.
//! - Vertical stacking uses `global_index % 10`, never the global index.
//! - Pixel tops are always derived from stored unscaled values, so zooming
//!   back and forth cannot drift.

use serde::{Deserialize, Serialize};

/// Slots reserved per year in the global index space.
pub const SLOTS_PER_YEAR: usize = 10;

/// Side of the central axis a card is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Even indexes go left, odd go right.
    pub fn for_index(global_index: usize) -> Self {
        if global_index % 2 == 0 {
            Self::Left
        } else {
            Self::Right
        }
    }

    /// Tag row alignment on the card, pointing toward the axis.
    pub fn tag_alignment(self) -> &'static str {
        match self {
            Self::Left => "flex-end",
            Self::Right => "flex-start",
        }
    }
}

/// Output of [`position`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub pixel_top: f64,
    pub side: Side,
}

/// Global index of the `index_within_year`-th card of year `year_ordinal`.
pub fn global_index(year_ordinal: usize, index_within_year: usize) -> usize {
    year_ordinal * SLOTS_PER_YEAR + index_within_year
}

/// Computes pixel top and side for one card.
///
/// `year_top_offset` is the unscaled offset of the card's first slot.
pub fn position(
    global_index: usize,
    year_top_offset: u32,
    zoom_factor: f64,
    item_spacing: u32,
) -> Placement {
    let local_index = (global_index % SLOTS_PER_YEAR) as f64;
    let unscaled = f64::from(year_top_offset) + local_index * f64::from(item_spacing);
    Placement {
        pixel_top: unscaled * zoom_factor,
        side: Side::for_index(global_index),
    }
}
