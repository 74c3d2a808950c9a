//! Taxonomy documents and their identifiers

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::resolver::{extract_programs_from_map, resolve_map_options};
use crate::domain::DomainError;

/// Bucket key holding the ordered program list in the program-centric layout
pub const PROGRAM_LIST_KEY: &str = "list";

/// Identifier of one of the four taxonomy documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyDocumentId {
    Programs,
    Terms,
    Subjects,
    Lectures,
}

impl TaxonomyDocumentId {
    pub const ALL: [TaxonomyDocumentId; 4] = [
        TaxonomyDocumentId::Programs,
        TaxonomyDocumentId::Terms,
        TaxonomyDocumentId::Subjects,
        TaxonomyDocumentId::Lectures,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Programs => "programs",
            Self::Terms => "terms",
            Self::Subjects => "subjects",
            Self::Lectures => "lectures",
        }
    }
}

impl std::fmt::Display for TaxonomyDocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaxonomyDocumentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "programs" => Ok(Self::Programs),
            "terms" => Ok(Self::Terms),
            "subjects" => Ok(Self::Subjects),
            "lectures" => Ok(Self::Lectures),
            _ => Err(DomainError::validation(format!(
                "Unknown taxonomy document: {}. Valid documents: programs, terms, subjects, lectures",
                s
            ))),
        }
    }
}

/// A taxonomy document: loosely structured mapping from key to option list
///
/// Keys are either direct (`"cs"`) or legacy compound (`"2024_cs"`). Values
/// are expected to be lists of strings but anything else is tolerated and
/// simply ignored when options are resolved. Key order is the order the
/// store returned them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxonomyDocument(Map<String, Value>);

impl TaxonomyDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document from any JSON value; non-objects become empty documents
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Sets a key to a list of string options, replacing any previous value
    pub fn with_list<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = values
            .into_iter()
            .map(|v| Value::String(v.into()))
            .collect();
        self.0.insert(key.into(), Value::Array(list));
        self
    }

    /// Sorted, deduplicated options for a lookup key across both key encodings
    pub fn resolve(&self, lookup_key: &str) -> Vec<String> {
        resolve_map_options(&self.0, lookup_key)
    }

    /// Program names in first-seen order across the `list` bucket and legacy buckets
    pub fn programs(&self) -> Vec<String> {
        extract_programs_from_map(&self.0)
    }

    /// Appends `value` to the list under `key` unless already present.
    ///
    /// A missing key, or one holding something other than a list, is replaced
    /// by a fresh single-element list. Returns whether the document changed.
    pub fn union_value(&mut self, key: &str, value: &str) -> bool {
        match self.0.get_mut(key) {
            Some(Value::Array(items)) => {
                if items.iter().any(|item| item.as_str() == Some(value)) {
                    false
                } else {
                    items.push(Value::String(value.to_string()));
                    true
                }
            }
            _ => {
                self.0.insert(
                    key.to_string(),
                    Value::Array(vec![Value::String(value.to_string())]),
                );
                true
            }
        }
    }

    /// Removes every occurrence of `value` from the list under `key`.
    ///
    /// The key itself stays, possibly with an empty list. Returns whether
    /// anything was removed.
    pub fn remove_value(&mut self, key: &str, value: &str) -> bool {
        match self.0.get_mut(key) {
            Some(Value::Array(items)) => {
                let before = items.len();
                items.retain(|item| item.as_str() != Some(value));
                items.len() != before
            }
            _ => false,
        }
    }
}

impl From<Map<String, Value>> for TaxonomyDocument {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
