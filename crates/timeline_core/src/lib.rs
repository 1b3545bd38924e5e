//! Core engine for the historical timeline.
//! Filtering, year grouping, positioning, pagination and text annotation
//! live here; hosts only draw what [`TimelineFrame`] describes.

pub mod annotate;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod labels;
pub mod layout;
pub mod logging;
pub mod model;
pub mod service;
pub mod source;

pub use annotate::{annotate, AnnotatedText, SearchHighlighter, Segment};
pub use config::{LayoutMetrics, ZoomLevel};
pub use engine::countdown::CountdownTick;
pub use engine::ports::{RenderSurface, VisibilityPort};
pub use engine::session::TimelineEngine;
pub use error::{LayoutError, LayoutResult};
pub use filter::record_filter::{filter_events, Facet, FilterConfig, SearchScope};
pub use layout::frame::{PositionedCard, RevealAffordance, TimelineFrame, YearMarker};
pub use layout::positioner::Side;
pub use layout::{compute_layout, reveal_more, LayoutRequest, TimelineLayout};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status};
pub use model::record::{CategorySet, Character, CharacterRef, Description, Event};
pub use model::year::{format_year, parse_year, YearParseError};
pub use service::detail_service::{CharacterDetail, EventDetail};
pub use source::{Catalog, RecordSource, SourceError, SourceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
