use timeline_core::model::record::CharacterRef;
use timeline_core::service::detail_service::{character_detail, event_detail};
use timeline_core::{Catalog, Character, Event, LayoutError, RecordSource};

fn catalog() -> Catalog {
    let mut leonardo = Character::new("char_001", "列奥纳多·达·芬奇", vec!["scientist", "projective"]);
    leonardo.title = "选民行会创始人".to_string();
    leonardo.birth = "1452年".to_string();
    leonardo.death = "1519年".to_string();
    leonardo.description = "文艺复兴时期的博学者".into();
    leonardo.related_events = vec![
        "event_late".to_string(),
        "event_missing".to_string(),
        "event_bce".to_string(),
        "event_early".to_string(),
    ];

    let mut early = Event::new("event_early", "公元1510年", "「选民行会」成立", "organize");
    early.characters = vec![
        CharacterRef {
            id: "char_001".to_string(),
            name: "列奥纳多·达·芬奇".to_string(),
        },
        CharacterRef {
            id: "char_404".to_string(),
            name: "无名氏".to_string(),
        },
    ];
    early.location = Some("  ".to_string());

    Catalog::new(RecordSource {
        characters: vec![leonardo],
        events: vec![
            Event::new("event_late", "公元1519年", "列奥纳多逝世", "personage"),
            Event::new("event_bce", "公元前44年", "凯撒遇刺", vec!["military", "personage"]),
            early,
        ],
    })
    .unwrap()
}

#[test]
fn character_detail_sorts_related_events_by_year_and_drops_dangling() {
    let detail = character_detail(&catalog(), "char_001").unwrap().unwrap();

    let captions = detail
        .related_events
        .iter()
        .map(|related| related.caption())
        .collect::<Vec<_>>();
    assert_eq!(
        captions,
        vec![
            "公元前44年 - 凯撒遇刺",
            "公元1510年 - 「选民行会」成立",
            "公元1519年 - 列奥纳多逝世",
        ]
    );
    assert_eq!(detail.lifespan, "1452年 - 1519年");
    assert_eq!(detail.category_name, "科学家、投影派");
    assert_eq!(detail.description, vec!["文艺复兴时期的博学者".to_string()]);
}

#[test]
fn unknown_character_yields_none() {
    assert!(character_detail(&catalog(), "char_999").unwrap().is_none());
}

#[test]
fn malformed_related_year_is_reported() {
    let mut character = Character::new("c1", "甲", "political");
    character.related_events = vec!["e1".to_string()];
    let catalog = Catalog::new(RecordSource {
        characters: vec![character],
        events: vec![Event::new("e1", "不详", "t", "organize")],
    })
    .unwrap();
    let err = character_detail(&catalog, "c1").unwrap_err();
    assert!(matches!(err, LayoutError::Year(_)));
}

#[test]
fn event_detail_resolves_characters_and_labels() {
    let catalog = catalog();
    let detail = event_detail(&catalog, "event_early").unwrap();
    assert_eq!(detail.category_label, "组织");
    assert_eq!(detail.characters.len(), 1);
    assert_eq!(detail.characters[0].title, "选民行会创始人");
    assert_eq!(detail.location, None);

    let bce = event_detail(&catalog, "event_bce").unwrap();
    assert_eq!(bce.category_label, "军事、人物");
    assert!(event_detail(&catalog, "nope").is_none());
}
