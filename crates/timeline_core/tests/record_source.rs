use std::io::Write;
use timeline_core::{Catalog, CategorySet, Description, SourceError};

const SAMPLE: &str = r#"{
  "characters": [
    {
      "id": "char_001",
      "name": "列奥纳多·达·芬奇",
      "title": "选民行会创始人",
      "birth": "1452年",
      "death": "1519年",
      "description": ["文艺复兴时期的博学者", "选民行会的创始人"],
      "category": ["scientist", "projective"],
      "achievements": ["创立选民行会"],
      "relatedEvents": ["event_001"],
      "tags": ["欧洲", "文艺复兴"]
    }
  ],
  "events": [
    {
      "id": "event_001",
      "year": "公元1510年",
      "title": "「选民行会」成立",
      "description": "列奥纳多·达·芬奇创立选民行会",
      "category": "organize",
      "characters": [{ "id": "char_001", "name": "列奥纳多·达·芬奇" }],
      "location": "佛罗伦萨",
      "tags": ["意大利"]
    },
    {
      "id": "event_002",
      "displayYear": "公元1519年",
      "title": "列奥纳多逝世"
    }
  ]
}"#;

#[test]
fn loads_catalog_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let catalog = Catalog::from_path(file.path()).unwrap();
    assert_eq!(catalog.characters().len(), 1);
    assert_eq!(catalog.events().len(), 2);

    let character = catalog.character("char_001").unwrap();
    assert_eq!(
        character.category,
        CategorySet::from(vec!["scientist", "projective"])
    );
    assert_eq!(character.description.lines().len(), 2);
    assert_eq!(character.related_events, vec!["event_001".to_string()]);

    let event = catalog.event("event_001").unwrap();
    assert_eq!(event.display_year, "公元1510年");
    assert_eq!(event.category, CategorySet::from("organize"));
    assert_eq!(event.location.as_deref(), Some("佛罗伦萨"));
}

#[test]
fn optional_event_fields_default_and_display_year_alias_is_accepted() {
    let catalog = Catalog::from_json_str(SAMPLE).unwrap();
    let event = catalog.event("event_002").unwrap();

    assert_eq!(event.display_year, "公元1519年");
    assert_eq!(event.description, Description::default());
    assert!(event.characters.is_empty());
    assert!(event.category.tags().next().is_none());
}

#[test]
fn resolved_characters_skip_dangling_references() {
    let json = r#"{
      "characters": [{ "id": "c1", "name": "甲" }],
      "events": [{
        "id": "e1", "year": "公元1年", "title": "t",
        "characters": [{ "id": "c1", "name": "甲" }, { "id": "c9", "name": "无" }]
      }]
    }"#;
    let catalog = Catalog::from_json_str(json).unwrap();
    let event = catalog.event("e1").unwrap();
    let resolved = catalog
        .resolved_characters(event)
        .map(|character| character.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(resolved, vec!["c1"]);
}

#[test]
fn missing_collections_load_as_empty() {
    let catalog = Catalog::from_json_str("{}").unwrap();
    assert!(catalog.is_empty());

    let catalog = Catalog::from_json_str(
        r#"{ "events": [{ "id": "e1", "year": "公元1年", "title": "t" }] }"#,
    )
    .unwrap();
    assert!(catalog.characters().is_empty());
    assert_eq!(catalog.events().len(), 1);
}

#[test]
fn null_collections_load_as_empty() {
    let catalog = Catalog::from_json_str(r#"{ "characters": null, "events": [] }"#).unwrap();
    assert!(catalog.is_empty());

    let catalog = Catalog::from_json_str(
        r#"{ "characters": [{ "id": "c1", "name": "甲" }], "events": null }"#,
    )
    .unwrap();
    assert_eq!(catalog.characters().len(), 1);
    assert!(catalog.events().is_empty());
}

#[test]
fn invalid_documents_and_missing_files_are_typed_errors() {
    let err = Catalog::from_json_str("{ \"events\": 3 }").unwrap_err();
    assert!(matches!(err, SourceError::Json(_)));

    let dir = tempfile::tempdir().unwrap();
    let err = Catalog::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, SourceError::Io(_)));
}

#[test]
fn duplicate_character_ids_are_rejected() {
    let json = r#"{ "characters": [
      { "id": "c1", "name": "甲" },
      { "id": "c1", "name": "乙" }
    ] }"#;
    let err = Catalog::from_json_str(json).unwrap_err();
    assert!(err.to_string().contains("c1"));
}
