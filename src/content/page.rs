//! Load-time normalisation of a page's `content` object.

use serde_json::{Map, Value};

pub const ENABLED_KEY: &str = "enabled";

const HOME_ORDER: &[&str] = &["hero", "services", "about", "testimonials", "stats", "blog", "newsletter", "contact"];
const ABOUT_ORDER: &[&str] = &["hero", "story", "mission_vision", "founder", "team"];

/// Display order of the top-level sections of `slug`, if one is registered.
pub fn canonical_order(slug: &str) -> Option<&'static [&'static str]> {
    match slug {
        "home" => Some(HOME_ORDER),
        "about" => Some(ABOUT_ORDER),
        _ => None,
    }
}

/// Adds `enabled: true` to every nested object that has no flag of its own.
///
/// Arrays are left alone: their records are list rows, not sections.
pub fn backfill_enabled(content: &mut Map<String, Value>) {
    for value in content.values_mut() {
        if let Value::Object(section) = value {
            if !section.contains_key(ENABLED_KEY) {
                section.insert(ENABLED_KEY.to_string(), Value::Bool(true));
            }
            backfill_enabled(section);
        }
    }
}

/// Reorders top-level keys: listed keys first in list order, then the rest
/// in their existing order.
pub fn order_sections(content: Map<String, Value>, order: &[&str]) -> Map<String, Value> {
    let mut listed = Map::new();
    let mut rest = Map::new();
    for (key, value) in content {
        if !value.is_null() && order.contains(&key.as_str()) {
            listed.insert(key, value);
        } else {
            rest.insert(key, value);
        }
    }

    let mut ordered = Map::with_capacity(listed.len() + rest.len());
    for key in order {
        if let Some(value) = listed.remove(*key) {
            ordered.insert(key.to_string(), value);
        }
    }
    ordered.extend(rest);
    ordered
}

/// Backfills toggles and applies the slug's canonical order.
pub fn prepare_for_editing(slug: &str, mut content: Map<String, Value>) -> Map<String, Value> {
    backfill_enabled(&mut content);
    match canonical_order(slug) {
        Some(order) => order_sections(content, order),
        None => content,
    }
}

/// Public rendition of `content`: disabled sections removed, toggles stripped.
pub fn published_content(content: &Map<String, Value>) -> Map<String, Value> {
    content
        .iter()
        .filter(|(key, _)| key.as_str() != ENABLED_KEY)
        .filter_map(|(key, value)| match value {
            Value::Object(section) => {
                if section.get(ENABLED_KEY) == Some(&Value::Bool(false)) {
                    None
                } else {
                    Some((key.clone(), Value::Object(published_content(section))))
                }
            }
            other => Some((key.clone(), other.clone())),
        })
        .collect()
}
