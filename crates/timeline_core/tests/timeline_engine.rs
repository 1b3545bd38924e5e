use timeline_core::model::record::CharacterRef;
use timeline_core::{
    Catalog, Character, CountdownTick, Event, Facet, FilterConfig, LayoutError, LayoutRequest,
    PositionedCard, RecordSource, RenderSurface, SearchScope, TimelineEngine, TimelineFrame,
    VisibilityPort, ZoomLevel,
};

#[derive(Default)]
struct RecordingSurface {
    offline: bool,
    frames: Vec<TimelineFrame>,
    appended: Vec<(String, usize, usize)>,
}

impl RenderSurface for RecordingSurface {
    fn is_available(&self) -> bool {
        !self.offline
    }

    fn render_frame(&mut self, frame: &TimelineFrame) {
        self.frames.push(frame.clone());
    }

    fn append_cards(&mut self, year_label: &str, cards: &[PositionedCard], remaining: usize) {
        self.appended
            .push((year_label.to_string(), cards.len(), remaining));
    }
}

fn two_year_engine() -> TimelineEngine {
    let leonardo = Character::new("char_001", "列奥纳多·达·芬奇", "scientist");
    let mut death = Event::new("event_002", "公元1519年", "列奥纳多·达·芬奇逝世", "personage");
    death.characters = vec![CharacterRef {
        id: "char_001".to_string(),
        name: "列奥纳多·达·芬奇".to_string(),
    }];
    let birth = Event::new("event_001", "公元1452年", "芬奇镇的新生儿", "personage");

    let catalog = Catalog::new(RecordSource {
        characters: vec![leonardo],
        events: vec![death, birth],
    })
    .unwrap();
    TimelineEngine::new(catalog)
}

fn crowded_engine(count: usize) -> TimelineEngine {
    let events = (0..count)
        .map(|idx| Event::new(format!("e{idx:02}"), "公元1776年", format!("事件{idx}"), "military"))
        .collect();
    TimelineEngine::new(
        Catalog::new(RecordSource {
            characters: Vec::new(),
            events,
        })
        .unwrap(),
    )
}

#[test]
fn default_request_lays_out_both_years_in_order() {
    let mut engine = two_year_engine();
    let frame = engine.recompute(LayoutRequest::default()).unwrap();

    let labels = frame
        .markers
        .iter()
        .map(|marker| marker.label.as_str())
        .collect::<Vec<_>>();
    assert_eq!(labels, vec!["公元1452年", "公元1519年"]);
    assert_eq!(frame.cards.len(), 2);
    assert!(frame.no_results.is_none());
    assert!(frame.reveal.is_empty());
    assert!(frame.cards.iter().all(|card| card.scale == 1.0));
}

#[test]
fn cards_carry_entity_links_and_search_highlights() {
    let mut engine = two_year_engine();
    let frame = engine
        .set_filters(FilterConfig {
            search: "逝世".to_string(),
            ..FilterConfig::cleared()
        })
        .unwrap();

    assert_eq!(frame.cards.len(), 1);
    let card = &frame.cards[0];
    assert_eq!(card.title.linked_ids(), vec!["char_001"]);
    assert_eq!(card.title.highlight_count(), 1);
    assert_eq!(card.category.plain_text(), "人物");
}

#[test]
fn empty_result_counts_down_then_clears_filters() {
    let mut engine = two_year_engine();
    engine.recompute(LayoutRequest::default()).unwrap();
    let frame = engine
        .set_filters(FilterConfig {
            search: "拿破仑".to_string(),
            scope: SearchScope::Characters,
            ..FilterConfig::cleared()
        })
        .unwrap();

    assert!(frame.cards.is_empty());
    assert!(frame.markers.is_empty());
    assert_eq!(frame.no_results.unwrap().remaining_ticks, 5);
    assert_eq!(frame.no_results.unwrap().caption(), "5秒后自动返回");
    assert!(engine.countdown_active());

    for expected in (1..5).rev() {
        let tick = engine.tick_countdown().unwrap();
        assert_eq!(tick, CountdownTick::Counting { remaining: expected });
        assert_eq!(engine.frame().no_results.unwrap().remaining_ticks, expected);
    }
    assert_eq!(engine.tick_countdown().unwrap(), CountdownTick::Expired);

    assert!(engine.request().filters.is_cleared());
    assert_eq!(engine.request().filters.scope, SearchScope::All);
    assert_eq!(engine.frame().cards.len(), 2);
    assert!(engine.frame().no_results.is_none());
    assert!(!engine.countdown_active());
    assert_eq!(engine.tick_countdown().unwrap(), CountdownTick::Idle);
}

#[test]
fn new_filters_cancel_a_running_countdown() {
    let mut engine = two_year_engine();
    engine
        .set_filters(FilterConfig {
            category: Facet::parse("diplomacy"),
            ..FilterConfig::cleared()
        })
        .unwrap();
    assert!(engine.countdown_active());
    engine.tick_countdown().unwrap();

    engine.clear_filters().unwrap();
    assert!(!engine.countdown_active());
    assert_eq!(engine.tick_countdown().unwrap(), CountdownTick::Idle);
}

#[test]
fn zoom_keeps_filters_and_card_set() {
    let mut engine = two_year_engine();
    let filters = FilterConfig {
        character_category: Facet::parse("scientist"),
        ..FilterConfig::cleared()
    };
    engine.set_filters(filters.clone()).unwrap();
    let before = engine.frame().cards.len();

    let frame = engine.zoom_in();
    assert_eq!(frame.zoom_percent, 110);
    assert_eq!(frame.cards.len(), before);
    assert_eq!(engine.request().filters, filters);
    assert_eq!(engine.request().zoom, ZoomLevel::new(110));
}

#[test]
fn filter_changes_keep_zoom() {
    let mut engine = two_year_engine();
    engine
        .recompute(LayoutRequest::new(FilterConfig::cleared(), ZoomLevel::new(130)))
        .unwrap();
    let frame = engine.clear_filters().unwrap();
    assert_eq!(frame.zoom_percent, 130);
}

#[test]
fn missing_or_offline_surface_is_reported() {
    let mut engine = two_year_engine();
    engine.recompute(LayoutRequest::default()).unwrap();

    let err = engine.present::<RecordingSurface>(None).unwrap_err();
    assert_eq!(err, LayoutError::SurfaceUnavailable);

    let mut offline = RecordingSurface {
        offline: true,
        ..RecordingSurface::default()
    };
    assert_eq!(
        engine.present(Some(&mut offline)).unwrap_err(),
        LayoutError::SurfaceUnavailable
    );
    assert!(offline.frames.is_empty());

    let mut surface = RecordingSurface::default();
    engine.present(Some(&mut surface)).unwrap();
    assert_eq!(surface.frames.len(), 1);
    assert_eq!(&surface.frames[0], engine.frame());
}

#[test]
fn reveal_into_surface_reports_remaining() {
    let mut engine = crowded_engine(14);
    engine.recompute(LayoutRequest::default()).unwrap();
    let mut surface = RecordingSurface::default();

    let cards = engine.reveal_into("公元1776年", Some(&mut surface)).unwrap();
    assert_eq!(cards.len(), 4);
    assert_eq!(surface.appended, vec![("公元1776年".to_string(), 4, 0)]);
    assert_eq!(engine.revealed_count("公元1776年"), 14);
}

#[test]
fn first_visibility_reveals_once_until_recompute() {
    let mut engine = crowded_engine(12);
    engine.recompute(LayoutRequest::default()).unwrap();

    let first = engine.on_year_visible("公元1776年").unwrap();
    assert_eq!(first.len(), 2);
    assert!(engine.on_year_visible("公元1776年").unwrap().is_empty());
    assert_eq!(engine.revealed_count("公元1776年"), 12);

    engine.recompute(LayoutRequest::default()).unwrap();
    assert_eq!(engine.revealed_count("公元1776年"), 10);
    assert_eq!(engine.on_year_visible("公元1776年").unwrap().len(), 2);
}

#[test]
fn visibility_of_unknown_year_is_an_error() {
    let mut engine = crowded_engine(3);
    engine.recompute(LayoutRequest::default()).unwrap();
    assert!(matches!(
        engine.on_year_visible("公元1000年"),
        Err(LayoutError::UnknownYear(_))
    ));
}

#[test]
fn malformed_year_blocks_recompute_and_keeps_previous_frame() {
    let catalog = Catalog::new(RecordSource {
        characters: Vec::new(),
        events: vec![
            Event::new("good", "公元1510年", "t", "organize"),
            Event::new("bad", "年代不详", "t", "military"),
        ],
    })
    .unwrap();
    let mut engine = TimelineEngine::new(catalog);
    engine
        .set_filters(FilterConfig {
            category: Facet::parse("organize"),
            ..FilterConfig::cleared()
        })
        .unwrap();
    let before = engine.frame().clone();

    assert!(matches!(
        engine.clear_filters(),
        Err(LayoutError::Year(_))
    ));
    assert_eq!(engine.frame(), &before);
    assert_eq!(engine.request().filters.category, Facet::parse("organize"));
}

#[test]
fn detail_lookups_go_through_engine() {
    let engine = two_year_engine();
    let detail = engine.character_detail("char_001").unwrap().unwrap();
    assert_eq!(detail.category_name, "科学家");
    assert_eq!(engine.event_detail("event_001").unwrap().year_label, "公元1452年");
}
