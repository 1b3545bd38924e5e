//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose timeline triggers (recompute, reveal, zoom, countdown tick,
//!   detail lookup) to Dart via FRB.
//! - Flatten core frames into plain envelopes with pre-rendered markup.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One process-wide engine; every call holds its lock for the whole trigger.
//! - Failures are reported in the envelope (`ok=false`, `message`), never thrown.

use log::{error, warn};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use timeline_core::layout::frame::{PositionedCard, RevealAffordance, TimelineFrame};
use timeline_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, Catalog,
    CountdownTick, Facet, FilterConfig, LayoutRequest, SearchScope, TimelineEngine, VisibilityPort,
    ZoomLevel,
};

const DATA_PATH_ENV: &str = "TIMELINE_DATA_PATH";
static ENGINE: OnceLock<Mutex<TimelineEngine>> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Year marker on the central axis.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineMarkerItem {
    pub label: String,
    pub pixel_top: f64,
}

/// Positioned event card with pre-rendered markup.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineCardItem {
    pub event_id: String,
    pub year_label: String,
    /// Title with `character-link` and `search-highlight` spans.
    pub title_markup: String,
    pub category_markup: String,
    /// Description lines joined by `<br>`.
    pub description_markup: String,
    /// Raw category tags for style classes.
    pub category_tags: Vec<String>,
    pub tags: Vec<String>,
    pub location: Option<String>,
    pub pixel_top: f64,
    /// `left|right`.
    pub side: String,
    /// CSS `justify-content` value for the tag row.
    pub tag_alignment: String,
    pub scale: f64,
}

/// "Reveal more" affordance of one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRevealItem {
    pub year_label: String,
    pub remaining: u32,
    pub caption: String,
}

/// Full frame envelope returned by recompute and zoom triggers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimelineFrameResponse {
    pub ok: bool,
    pub message: String,
    pub zoom_percent: u32,
    pub markers: Vec<TimelineMarkerItem>,
    pub cards: Vec<TimelineCardItem>,
    pub reveal: Vec<TimelineRevealItem>,
    /// e.g. `共 8 个事件，8 个年份`.
    pub summary_caption: String,
    /// Countdown caption while the result set is empty.
    pub no_results_caption: Option<String>,
    pub height: f64,
}

/// Cards appended by a reveal or visibility trigger.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimelineRevealResponse {
    pub ok: bool,
    pub message: String,
    pub cards: Vec<TimelineCardItem>,
    /// Cards still hidden for the year; 0 retires the affordance.
    pub remaining: u32,
    /// Timeline height after the append.
    pub height: f64,
}

/// Countdown tick result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimelineTickResponse {
    pub ok: bool,
    pub message: String,
    /// `idle|counting|expired`.
    pub state: String,
    pub remaining: u32,
    /// Reset frame, present only when the countdown expired.
    pub frame: Option<TimelineFrameResponse>,
}

/// Related event line of a character detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedEventItem {
    pub event_id: String,
    pub caption: String,
}

/// Character detail envelope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharacterDetailResponse {
    pub ok: bool,
    pub found: bool,
    pub message: String,
    pub name: String,
    pub title: String,
    pub lifespan: String,
    pub category_name: String,
    pub description: Vec<String>,
    pub achievements: Vec<String>,
    pub related_events: Vec<RelatedEventItem>,
    pub tags: Vec<String>,
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineActionResponse {
    pub ok: bool,
    pub message: String,
}

/// Replaces the engine's records with the document at `data_path`.
///
/// # FFI contract
/// - Sync call; reads one file.
/// - Never panics; the previous records stay active on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_load(data_path: String) -> TimelineActionResponse {
    let catalog = match Catalog::from_path(data_path.trim()) {
        Ok(catalog) => catalog,
        Err(err) => {
            return TimelineActionResponse {
                ok: false,
                message: format!("timeline_load failed: {err}"),
            };
        }
    };
    let summary = format!(
        "Loaded {} event(s), {} character(s).",
        catalog.events().len(),
        catalog.characters().len()
    );
    match with_engine(|engine| {
        *engine = TimelineEngine::new(catalog);
        Ok(())
    }) {
        Ok(()) => TimelineActionResponse {
            ok: true,
            message: summary,
        },
        Err(err) => TimelineActionResponse {
            ok: false,
            message: format!("timeline_load failed: {err}"),
        },
    }
}

/// Recomputes the timeline for the given controls.
///
/// Input semantics:
/// - Facets: a tag, or `all`/blank for no restriction.
/// - `scope`: `all|events|characters|region|period`; unknown values mean `all`.
/// - `zoom_percent`: clamped to 80..=150 and snapped to steps of 10.
///
/// # FFI contract
/// - Sync call, in-memory execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_recompute(
    category: String,
    character_category: String,
    region: String,
    period: String,
    search: String,
    scope: String,
    zoom_percent: u32,
) -> TimelineFrameResponse {
    let filters = FilterConfig {
        category: Facet::parse(&category),
        character_category: Facet::parse(&character_category),
        region: Facet::parse(&region),
        period: Facet::parse(&period),
        search,
        scope: SearchScope::parse(&scope),
    };
    let request = LayoutRequest::new(filters, ZoomLevel::new(zoom_percent));
    frame_response(
        "timeline_recompute",
        with_engine(|engine| {
            engine
                .recompute(request)
                .map(to_frame_response)
                .map_err(|err| err.to_string())
        }),
    )
}

/// Resets search, scope and all facets, keeping zoom.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_clear_filters() -> TimelineFrameResponse {
    frame_response(
        "timeline_clear_filters",
        with_engine(|engine| {
            engine
                .clear_filters()
                .map(to_frame_response)
                .map_err(|err| err.to_string())
        }),
    )
}

/// Zooms in one step; rescales without re-filtering.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_zoom_in() -> TimelineFrameResponse {
    frame_response(
        "timeline_zoom_in",
        with_engine(|engine| Ok(to_frame_response(engine.zoom_in()))),
    )
}

/// Zooms out one step; rescales without re-filtering.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_zoom_out() -> TimelineFrameResponse {
    frame_response(
        "timeline_zoom_out",
        with_engine(|engine| Ok(to_frame_response(engine.zoom_out()))),
    )
}

/// Reveals the next page of `year_label` ("加载更多" button).
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_reveal_more(year_label: String) -> TimelineRevealResponse {
    reveal_response(
        "timeline_reveal_more",
        with_engine(|engine| {
            let cards = engine
                .reveal_more(&year_label)
                .map_err(|err| err.to_string())?;
            Ok(to_reveal_response(engine, &year_label, &cards))
        }),
    )
}

/// Reports that `year_label`'s marker scrolled into view.
///
/// The first report per recompute reveals one page; repeats return no cards.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_year_visible(year_label: String) -> TimelineRevealResponse {
    reveal_response(
        "timeline_year_visible",
        with_engine(|engine| {
            let cards = engine
                .on_year_visible(&year_label)
                .map_err(|err| err.to_string())?;
            Ok(to_reveal_response(engine, &year_label, &cards))
        }),
    )
}

/// Advances the no-results countdown; call once per second while
/// `no_results_caption` is present.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_tick() -> TimelineTickResponse {
    let result = with_engine(|engine| {
        let tick = engine.tick_countdown().map_err(|err| err.to_string())?;
        Ok(match tick {
            CountdownTick::Idle => TimelineTickResponse {
                ok: true,
                state: "idle".to_string(),
                ..TimelineTickResponse::default()
            },
            CountdownTick::Counting { remaining } => TimelineTickResponse {
                ok: true,
                state: "counting".to_string(),
                remaining,
                ..TimelineTickResponse::default()
            },
            CountdownTick::Expired => TimelineTickResponse {
                ok: true,
                state: "expired".to_string(),
                frame: Some(to_frame_response(engine.frame())),
                ..TimelineTickResponse::default()
            },
        })
    });
    match result {
        Ok(response) => response,
        Err(err) => TimelineTickResponse {
            ok: false,
            message: format!("timeline_tick failed: {err}"),
            ..TimelineTickResponse::default()
        },
    }
}

/// Detail view of a clicked character link.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_character_detail(character_id: String) -> CharacterDetailResponse {
    let result = with_engine(|engine| {
        engine
            .character_detail(character_id.trim())
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(Some(detail)) => CharacterDetailResponse {
            ok: true,
            found: true,
            message: String::new(),
            related_events: detail
                .related_events
                .iter()
                .map(|related| RelatedEventItem {
                    event_id: related.id.clone(),
                    caption: related.caption(),
                })
                .collect(),
            name: detail.name,
            title: detail.title,
            lifespan: detail.lifespan,
            category_name: detail.category_name,
            description: detail.description,
            achievements: detail.achievements,
            tags: detail.tags,
        },
        Ok(None) => CharacterDetailResponse {
            ok: true,
            found: false,
            message: format!("character `{}` not found", character_id.trim()),
            ..CharacterDetailResponse::default()
        },
        Err(err) => CharacterDetailResponse {
            ok: false,
            message: format!("timeline_character_detail failed: {err}"),
            ..CharacterDetailResponse::default()
        },
    }
}

fn engine() -> &'static Mutex<TimelineEngine> {
    ENGINE.get_or_init(|| Mutex::new(TimelineEngine::new(initial_catalog())))
}

fn initial_catalog() -> Catalog {
    let Some(path) = resolve_data_path() else {
        warn!("event=engine_init module=ffi status=missing_source env={DATA_PATH_ENV}");
        return Catalog::default();
    };
    match Catalog::from_path(&path) {
        Ok(catalog) => catalog,
        Err(err) => {
            error!(
                "event=engine_init module=ffi status=error path={} error={err}",
                path.display()
            );
            Catalog::default()
        }
    }
}

fn resolve_data_path() -> Option<PathBuf> {
    let raw = std::env::var(DATA_PATH_ENV).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

fn with_engine<T>(f: impl FnOnce(&mut TimelineEngine) -> Result<T, String>) -> Result<T, String> {
    let mut guard = engine()
        .lock()
        .map_err(|_| "timeline engine lock poisoned".to_string())?;
    f(&mut *guard)
}

fn frame_response(
    operation: &str,
    result: Result<TimelineFrameResponse, String>,
) -> TimelineFrameResponse {
    match result {
        Ok(response) => response,
        Err(err) => TimelineFrameResponse {
            ok: false,
            message: format!("{operation} failed: {err}"),
            ..TimelineFrameResponse::default()
        },
    }
}

fn reveal_response(
    operation: &str,
    result: Result<TimelineRevealResponse, String>,
) -> TimelineRevealResponse {
    match result {
        Ok(response) => response,
        Err(err) => TimelineRevealResponse {
            ok: false,
            message: format!("{operation} failed: {err}"),
            ..TimelineRevealResponse::default()
        },
    }
}

fn to_frame_response(frame: &TimelineFrame) -> TimelineFrameResponse {
    let message = match frame.no_results {
        Some(_) => "No results.".to_string(),
        None => format!("Showing {} card(s).", frame.cards.len()),
    };
    TimelineFrameResponse {
        ok: true,
        message,
        zoom_percent: frame.zoom_percent,
        markers: frame
            .markers
            .iter()
            .map(|marker| TimelineMarkerItem {
                label: marker.label.clone(),
                pixel_top: marker.pixel_top,
            })
            .collect(),
        cards: frame.cards.iter().map(to_card_item).collect(),
        reveal: frame.reveal.iter().map(to_reveal_item).collect(),
        summary_caption: frame.summary.caption(),
        no_results_caption: frame.no_results.map(|no_results| no_results.caption()),
        height: frame.height,
    }
}

fn to_reveal_response(
    engine: &TimelineEngine,
    year_label: &str,
    cards: &[PositionedCard],
) -> TimelineRevealResponse {
    TimelineRevealResponse {
        ok: true,
        message: format!("Revealed {} card(s).", cards.len()),
        cards: cards.iter().map(to_card_item).collect(),
        remaining: to_u32(engine.remaining_count(year_label)),
        height: engine.frame().height,
    }
}

fn to_card_item(card: &PositionedCard) -> TimelineCardItem {
    TimelineCardItem {
        event_id: card.event_id.clone(),
        year_label: card.year_label.clone(),
        title_markup: card.title.to_markup(),
        category_markup: card.category.to_markup(),
        description_markup: card.description_markup(),
        category_tags: card.category_tags.clone(),
        tags: card.tags.clone(),
        location: card.location.clone(),
        pixel_top: card.pixel_top,
        side: side_label(card),
        tag_alignment: card.side.tag_alignment().to_string(),
        scale: card.scale,
    }
}

fn to_reveal_item(item: &RevealAffordance) -> TimelineRevealItem {
    TimelineRevealItem {
        year_label: item.year_label.clone(),
        remaining: to_u32(item.remaining),
        caption: item.caption(),
    }
}

fn side_label(card: &PositionedCard) -> String {
    match card.side {
        timeline_core::Side::Left => "left".to_string(),
        timeline_core::Side::Right => "right".to_string(),
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, timeline_character_detail, timeline_clear_filters,
        timeline_load, timeline_recompute, timeline_reveal_more, timeline_tick,
        timeline_year_visible, timeline_zoom_in, timeline_zoom_out, to_u32,
    };

    const SAMPLE_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../timeline_cli/data/sample.json");

    fn recompute_all(search: &str, scope: &str) -> super::TimelineFrameResponse {
        timeline_recompute(
            "all".to_string(),
            "all".to_string(),
            "all".to_string(),
            "all".to_string(),
            search.to_string(),
            scope.to_string(),
            100,
        )
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/timeline-logs".to_string());
        assert!(error.contains("unsupported"));
    }

    #[test]
    fn load_reports_missing_file() {
        let response = timeline_load("/definitely/not/here.json".to_string());
        assert!(!response.ok);
        assert!(response.message.starts_with("timeline_load failed"));
    }

    #[test]
    fn counts_saturate_into_u32() {
        assert_eq!(to_u32(7), 7);
        assert_eq!(to_u32(usize::MAX), u32::MAX);
    }

    // Single test drives the shared engine so parallel tests never interleave.
    #[test]
    fn engine_flow_over_sample_records() {
        let loaded = timeline_load(SAMPLE_PATH.to_string());
        assert!(loaded.ok, "{}", loaded.message);

        let frame = recompute_all("", "all");
        assert!(frame.ok, "{}", frame.message);
        assert_eq!(frame.markers.len(), frame.cards.len());
        assert_eq!(frame.markers[0].label, "公元1452年");
        assert!(frame.no_results_caption.is_none());
        assert_eq!(frame.cards[0].side, "left");
        assert_eq!(frame.cards[0].tag_alignment, "flex-end");
        assert!(frame.cards[0]
            .title_markup
            .contains("data-char-id=\"char_001\""));

        let zoomed = timeline_zoom_in();
        assert_eq!(zoomed.zoom_percent, 110);
        assert_eq!(zoomed.cards.len(), frame.cards.len());
        let restored = timeline_zoom_out();
        assert_eq!(restored.markers, frame.markers);

        let searched = recompute_all("逝世", "events");
        assert_eq!(searched.cards.len(), 1);
        assert!(searched.cards[0].title_markup.contains("search-highlight"));

        let revealed = timeline_reveal_more("公元1519年".to_string());
        assert!(revealed.ok);
        assert!(revealed.cards.is_empty());
        assert_eq!(revealed.remaining, 0);
        assert!(timeline_year_visible("公元1519年".to_string()).ok);
        assert!(!timeline_year_visible("公元1000年".to_string()).ok);

        let empty = recompute_all("不存在", "characters");
        assert_eq!(empty.no_results_caption.as_deref(), Some("5秒后自动返回"));
        for _ in 0..4 {
            assert_eq!(timeline_tick().state, "counting");
        }
        let expired = timeline_tick();
        assert_eq!(expired.state, "expired");
        assert_eq!(expired.frame.unwrap().cards.len(), frame.cards.len());
        assert_eq!(timeline_tick().state, "idle");

        let detail = timeline_character_detail("char_001".to_string());
        assert!(detail.found);
        assert_eq!(detail.category_name, "投影派、干涉派");
        assert_eq!(detail.related_events[0].caption, "公元1452年 - 列奥纳多·达·芬奇诞生");
        assert!(!timeline_character_detail("char_404".to_string()).found);

        assert!(timeline_clear_filters().ok);
    }
}
