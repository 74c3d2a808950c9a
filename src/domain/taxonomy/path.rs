//! Taxonomy levels, navigation paths and compound lookup keys

use serde::{Deserialize, Serialize};

use super::document::TaxonomyDocumentId;
use crate::domain::DomainError;

/// Separator between segments of a compound taxonomy key
pub const KEY_SEPARATOR: &str = "_";

/// One level of the program → term → subject → lecture hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyLevel {
    Program,
    Term,
    Subject,
    Lecture,
}

impl TaxonomyLevel {
    /// Levels that contribute a segment to compound lookup keys, in key order
    pub const KEY_SEGMENTS: [TaxonomyLevel; 3] = [
        TaxonomyLevel::Program,
        TaxonomyLevel::Term,
        TaxonomyLevel::Subject,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Program => "program",
            Self::Term => "term",
            Self::Subject => "subject",
            Self::Lecture => "lecture",
        }
    }

    /// The level below this one
    pub fn next(&self) -> Option<TaxonomyLevel> {
        match self {
            Self::Program => Some(Self::Term),
            Self::Term => Some(Self::Subject),
            Self::Subject => Some(Self::Lecture),
            Self::Lecture => None,
        }
    }

    /// The level above this one
    pub fn previous(&self) -> Option<TaxonomyLevel> {
        match self {
            Self::Program => None,
            Self::Term => Some(Self::Program),
            Self::Subject => Some(Self::Term),
            Self::Lecture => Some(Self::Subject),
        }
    }

    /// The taxonomy document listing the options one level below this one
    pub fn child_document(&self) -> Option<TaxonomyDocumentId> {
        match self {
            Self::Program => Some(TaxonomyDocumentId::Terms),
            Self::Term => Some(TaxonomyDocumentId::Subjects),
            Self::Subject => Some(TaxonomyDocumentId::Lectures),
            Self::Lecture => None,
        }
    }
}

impl std::fmt::Display for TaxonomyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaxonomyLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "program" => Ok(Self::Program),
            "term" => Ok(Self::Term),
            "subject" => Ok(Self::Subject),
            "lecture" => Ok(Self::Lecture),
            _ => Err(DomainError::validation(format!(
                "Unknown taxonomy level: {}",
                s
            ))),
        }
    }
}

/// Segments chosen so far while walking the taxonomy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyPath {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lecture: Option<String>,
}

impl TaxonomyPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, level: TaxonomyLevel) -> Option<&str> {
        let slot = match level {
            TaxonomyLevel::Program => &self.program,
            TaxonomyLevel::Term => &self.term,
            TaxonomyLevel::Subject => &self.subject,
            TaxonomyLevel::Lecture => &self.lecture,
        };
        slot.as_deref()
    }

    /// Chooses `value` at `level` and forgets every deeper choice
    pub fn select(&mut self, level: TaxonomyLevel, value: impl Into<String>) {
        let value = Some(value.into());

        match level {
            TaxonomyLevel::Program => {
                self.program = value;
                self.term = None;
                self.subject = None;
                self.lecture = None;
            }
            TaxonomyLevel::Term => {
                self.term = value;
                self.subject = None;
                self.lecture = None;
            }
            TaxonomyLevel::Subject => {
                self.subject = value;
                self.lecture = None;
            }
            TaxonomyLevel::Lecture => {
                self.lecture = value;
            }
        }
    }

    /// Builder form of [`select`](Self::select)
    pub fn with(mut self, level: TaxonomyLevel, value: impl Into<String>) -> Self {
        self.select(level, value);
        self
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.program.is_none()
            && self.term.is_none()
            && self.subject.is_none()
            && self.lecture.is_none()
    }
}

impl From<&LecturePath> for TaxonomyPath {
    fn from(path: &LecturePath) -> Self {
        Self {
            program: Some(path.program.clone()),
            term: Some(path.term.clone()),
            subject: Some(path.subject.clone()),
            lecture: Some(path.lecture.clone()),
        }
    }
}

/// Builds the lookup key used to find the options below `level`.
///
/// Chosen values for program, term and subject are joined with `_`, stopping
/// after `level`. Levels missing from the path are omitted rather than
/// rendered as empty segments, so a program without terms resolves subjects
/// under `"<program>_<subject>"`-style keys. `Lecture` behaves like
/// `Subject` since lectures have no children.
pub fn build_lookup_key(path: &TaxonomyPath, level: TaxonomyLevel) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(TaxonomyLevel::KEY_SEGMENTS.len());

    for segment in TaxonomyLevel::KEY_SEGMENTS {
        if let Some(value) = path.get(segment).filter(|v| !v.is_empty()) {
            parts.push(value);
        }

        if segment == level {
            break;
        }
    }

    parts.join(KEY_SEPARATOR)
}

/// A fully specified location of a lecture in the taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LecturePath {
    pub program: String,
    pub term: String,
    pub subject: String,
    pub lecture: String,
}

impl LecturePath {
    pub fn new(
        program: impl Into<String>,
        term: impl Into<String>,
        subject: impl Into<String>,
        lecture: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            term: term.into(),
            subject: subject.into(),
            lecture: lecture.into(),
        }
    }

    /// Converts a navigation path, requiring every level to be chosen
    pub fn from_path(path: &TaxonomyPath) -> Option<Self> {
        Some(Self {
            program: path.program.clone()?,
            term: path.term.clone()?,
            subject: path.subject.clone()?,
            lecture: path.lecture.clone()?,
        })
    }

    /// Key under which the options below `level` are stored for this path
    pub fn key_for(&self, level: TaxonomyLevel) -> String {
        build_lookup_key(&TaxonomyPath::from(self), level)
    }
}
