//! Taxonomy option resolution
//!
//! Translates a raw taxonomy document into menu options. Two key encodings
//! coexist in stored documents: the direct encoding (`"cs"`) and the legacy
//! compound encoding where an ancestor is prefixed (`"2024_cs"`). Options
//! from every matching key are merged.

use std::collections::{BTreeSet, HashSet};

use serde_json::{Map, Value};

use super::document::PROGRAM_LIST_KEY;
use super::path::KEY_SEPARATOR;

/// Resolves the options for `lookup_key` in a raw document.
///
/// Returns an empty list when the document is not an object or the key is
/// empty. Never fails.
pub fn resolve_options(document: &Value, lookup_key: &str) -> Vec<String> {
    match document.as_object() {
        Some(map) => resolve_map_options(map, lookup_key),
        None => Vec::new(),
    }
}

/// Resolves the options for `lookup_key` in a document map.
///
/// Collects the list under `lookup_key` plus the lists of every other key
/// ending in `"_" + lookup_key`. The result is deduplicated, sorted and free
/// of empty or non-string entries.
pub fn resolve_map_options(document: &Map<String, Value>, lookup_key: &str) -> Vec<String> {
    if lookup_key.is_empty() {
        return Vec::new();
    }

    let suffix = format!("{}{}", KEY_SEPARATOR, lookup_key);
    let mut options: BTreeSet<&str> = BTreeSet::new();

    if let Some(Value::Array(direct)) = document.get(lookup_key) {
        options.extend(direct.iter().filter_map(truthy_str));
    }

    for (key, value) in document {
        if key == lookup_key || !key.ends_with(&suffix) {
            continue;
        }

        if let Value::Array(items) = value {
            options.extend(items.iter().filter_map(truthy_str));
        }
    }

    options.into_iter().map(String::from).collect()
}

/// Extracts the program list from a raw `programs` document.
///
/// Non-objects yield an empty list.
pub fn extract_programs(document: &Value) -> Vec<String> {
    match document.as_object() {
        Some(map) => extract_programs_from_map(map),
        None => Vec::new(),
    }
}

/// Extracts the program list from a `programs` document map.
///
/// The `list` bucket comes first, followed by every other list-valued bucket
/// in document order. Duplicates keep their first position; empty entries are
/// dropped. The result is deliberately not sorted.
pub fn extract_programs_from_map(document: &Map<String, Value>) -> Vec<String> {
    let primary = match document.get(PROGRAM_LIST_KEY) {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    };

    let legacy = document
        .iter()
        .filter(|(key, _)| key.as_str() != PROGRAM_LIST_KEY)
        .filter_map(|(_, value)| value.as_array())
        .flatten();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut programs = Vec::new();

    for program in primary.iter().chain(legacy).filter_map(truthy_str) {
        if seen.insert(program) {
            programs.push(program.to_string());
        }
    }

    programs
}

fn truthy_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}
