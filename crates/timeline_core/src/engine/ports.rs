//! Collaborator contracts between the engine and a rendering surface.

use crate::error::LayoutResult;
use crate::layout::frame::{PositionedCard, TimelineFrame};

/// Output collaborator that draws frames.
pub trait RenderSurface {
    /// Whether the surface can currently accept output.
    fn is_available(&self) -> bool {
        true
    }

    /// Replaces everything drawn with `frame`.
    fn render_frame(&mut self, frame: &TimelineFrame);

    /// Appends cards revealed for one year; `remaining` is 0 once the year's
    /// affordance should be retired.
    fn append_cards(&mut self, year_label: &str, cards: &[PositionedCard], remaining: usize);
}

/// Visibility signal sink, called when a year marker scrolls into view.
pub trait VisibilityPort {
    /// Handles the first visibility report of `year_label` by revealing its
    /// next page. Later reports for the same year are no-ops until the next
    /// recompute.
    fn on_year_visible(&mut self, year_label: &str) -> LayoutResult<Vec<PositionedCard>>;
}
