//! Timeline session: owns the catalog and the current layout state.
//!
//! # Invariants
//! - Every filter or search change discards the previous layout entirely.
//! - Zoom changes rescale stored offsets; they never re-filter.
//! - The loaded-years set is reset by every recompute.

use crate::config::{LayoutMetrics, ZoomLevel};
use crate::engine::countdown::{Countdown, CountdownTick};
use crate::engine::ports::{RenderSurface, VisibilityPort};
use crate::error::{LayoutError, LayoutResult};
use crate::filter::record_filter::FilterConfig;
use crate::layout::frame::{PositionedCard, TimelineFrame};
use crate::layout::{compute_layout, reveal_more, LayoutRequest, TimelineLayout};
use crate::service::detail_service::{self, CharacterDetail, EventDetail};
use crate::source::Catalog;
use log::{debug, info, warn};
use std::collections::HashSet;

/// Stateful facade driving recomputes, reveals, zoom and countdown.
pub struct TimelineEngine {
    catalog: Catalog,
    metrics: LayoutMetrics,
    layout: TimelineLayout,
    loaded_years: HashSet<String>,
    countdown: Option<Countdown>,
}

impl TimelineEngine {
    /// Creates an engine with standard metrics. Call [`Self::recompute`]
    /// before reading the frame.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_metrics(catalog, LayoutMetrics::default())
    }

    pub fn with_metrics(catalog: Catalog, metrics: LayoutMetrics) -> Self {
        Self {
            catalog,
            metrics,
            layout: TimelineLayout::default(),
            loaded_years: HashSet::new(),
            countdown: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    pub fn request(&self) -> &LayoutRequest {
        &self.layout.request
    }

    pub fn frame(&self) -> &TimelineFrame {
        &self.layout.frame
    }

    pub fn layout(&self) -> &TimelineLayout {
        &self.layout
    }

    /// Discards all layout state and rebuilds it for `request`.
    ///
    /// # Errors
    /// Returns [`LayoutError::Year`] on a malformed year label; the previous
    /// layout is left in place in that case.
    pub fn recompute(&mut self, request: LayoutRequest) -> LayoutResult<&TimelineFrame> {
        let layout = compute_layout(&self.catalog, &request, &self.metrics).map_err(|err| {
            warn!("event=timeline_recompute module=engine status=error error={err}");
            err
        })?;

        self.loaded_years.clear();
        self.countdown = layout.frame.no_results.map(|_| Countdown::start());
        self.layout = layout;

        info!(
            "event=timeline_recompute module=engine status=ok years={} cards={} matched={} no_results={}",
            self.layout.frame.markers.len(),
            self.layout.frame.cards.len(),
            self.layout.frame.summary.event_count,
            self.countdown.is_some()
        );
        Ok(&self.layout.frame)
    }

    /// Recomputes with new filters at the current zoom.
    pub fn set_filters(&mut self, filters: FilterConfig) -> LayoutResult<&TimelineFrame> {
        let zoom = self.layout.request.zoom;
        self.recompute(LayoutRequest::new(filters, zoom))
    }

    /// Resets search, scope and every facet to `all`, then recomputes.
    pub fn clear_filters(&mut self) -> LayoutResult<&TimelineFrame> {
        self.set_filters(FilterConfig::cleared())
    }

    /// Rescales the current layout to `zoom` without re-filtering.
    pub fn set_zoom(&mut self, zoom: ZoomLevel) -> &TimelineFrame {
        self.layout.request.zoom = zoom;
        self.layout.frame.rescale(zoom, &self.metrics);
        debug!(
            "event=zoom_changed module=engine status=ok zoom={}",
            zoom.percent()
        );
        &self.layout.frame
    }

    pub fn zoom_in(&mut self) -> &TimelineFrame {
        let zoom = self.layout.request.zoom.zoomed_in();
        self.set_zoom(zoom)
    }

    pub fn zoom_out(&mut self) -> &TimelineFrame {
        let zoom = self.layout.request.zoom.zoomed_out();
        self.set_zoom(zoom)
    }

    /// Reveals the next page of `year_label`.
    ///
    /// Returns the appended cards; empty when nothing was left to show.
    pub fn reveal_more(&mut self, year_label: &str) -> LayoutResult<Vec<PositionedCard>> {
        reveal_more(&mut self.layout, &self.catalog, year_label, &self.metrics)
    }

    /// Cards currently shown for `year_label`.
    pub fn revealed_count(&self, year_label: &str) -> usize {
        self.layout.revealed_count(year_label)
    }

    /// Hidden cards still behind `year_label`'s affordance.
    pub fn remaining_count(&self, year_label: &str) -> usize {
        self.layout
            .reveal
            .window(year_label)
            .map_or(0, |window| window.remaining())
    }

    /// Advances the no-results countdown by one tick.
    ///
    /// At zero all filters are cleared and the layout is recomputed.
    pub fn tick_countdown(&mut self) -> LayoutResult<CountdownTick> {
        let Some(countdown) = self.countdown.as_mut() else {
            return Ok(CountdownTick::Idle);
        };

        let tick = countdown.tick();
        match tick {
            CountdownTick::Counting { remaining } => {
                if let Some(no_results) = self.layout.frame.no_results.as_mut() {
                    no_results.remaining_ticks = remaining;
                }
            }
            CountdownTick::Expired => {
                info!("event=no_results_expired module=engine status=ok action=clear_filters");
                self.countdown = None;
                self.clear_filters()?;
            }
            CountdownTick::Idle => {}
        }
        Ok(tick)
    }

    /// Whether an auto-clear countdown is running.
    pub fn countdown_active(&self) -> bool {
        self.countdown.is_some()
    }

    /// Draws the current frame onto `surface`.
    ///
    /// # Errors
    /// Returns [`LayoutError::SurfaceUnavailable`] when no surface is given
    /// or the surface reports itself unavailable.
    pub fn present<S: RenderSurface + ?Sized>(&self, surface: Option<&mut S>) -> LayoutResult<()> {
        let surface = available_surface(surface)?;
        surface.render_frame(&self.layout.frame);
        Ok(())
    }

    /// Reveals the next page of `year_label` and appends it to `surface`.
    pub fn reveal_into<S: RenderSurface + ?Sized>(
        &mut self,
        year_label: &str,
        surface: Option<&mut S>,
    ) -> LayoutResult<Vec<PositionedCard>> {
        let surface = available_surface(surface)?;
        let cards = self.reveal_more(year_label)?;
        surface.append_cards(year_label, &cards, self.remaining_count(year_label));
        Ok(cards)
    }

    /// Detail view for a selected character.
    pub fn character_detail(&self, id: &str) -> LayoutResult<Option<CharacterDetail>> {
        detail_service::character_detail(&self.catalog, id)
    }

    /// Detail view for a selected event.
    pub fn event_detail(&self, id: &str) -> Option<EventDetail> {
        detail_service::event_detail(&self.catalog, id)
    }
}

impl VisibilityPort for TimelineEngine {
    fn on_year_visible(&mut self, year_label: &str) -> LayoutResult<Vec<PositionedCard>> {
        if self.loaded_years.contains(year_label) {
            return Ok(Vec::new());
        }
        if self.layout.year(year_label).is_none() {
            return Err(LayoutError::UnknownYear(year_label.to_string()));
        }
        self.loaded_years.insert(year_label.to_string());
        self.reveal_more(year_label)
    }
}

fn available_surface<S: RenderSurface + ?Sized>(surface: Option<&mut S>) -> LayoutResult<&mut S> {
    match surface {
        Some(surface) if surface.is_available() => Ok(surface),
        _ => {
            warn!("event=present module=engine status=error error=surface_unavailable");
            Err(LayoutError::SurfaceUnavailable)
        }
    }
}
