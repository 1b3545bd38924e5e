//! Display labels for category tags.
//!
//! Unknown tags are shown as-is so new data never renders blank.

use crate::model::record::CategorySet;

const EVENT_CATEGORY_LABELS: &[(&str, &str)] = &[
    ("organize", "组织"),
    ("military", "军事"),
    ("diplomacy", "外交"),
    ("personage", "人物"),
];

const CHARACTER_CATEGORY_NAMES: &[(&str, &str)] = &[
    ("political", "政治家"),
    ("military", "军事家"),
    ("scientist", "科学家"),
    ("literary", "文学家"),
    ("philosopher", "哲学家"),
    ("projective", "投影派"),
    ("intervene", "干涉派"),
    ("energy", "能量派"),
    ("orientate", "定位派"),
];

/// Separator between labels of a multi-valued category.
pub const LABEL_SEPARATOR: &str = "、";

/// Label shown on an event card's category line.
pub fn event_category_label(category: &CategorySet) -> String {
    join_labels(category, EVENT_CATEGORY_LABELS)
}

/// Label shown in a character's detail view.
pub fn character_category_name(category: &CategorySet) -> String {
    join_labels(category, CHARACTER_CATEGORY_NAMES)
}

fn join_labels(category: &CategorySet, table: &[(&str, &'static str)]) -> String {
    category
        .tags()
        .map(|tag| lookup(table, tag).unwrap_or(tag))
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR)
}

fn lookup(table: &[(&str, &'static str)], tag: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(key, _)| *key == tag)
        .map(|(_, label)| *label)
}
