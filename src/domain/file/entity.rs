//! File record entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::taxonomy::LecturePath;

/// Fallback label when a record carries neither a display nor an original name
pub const DEFAULT_DISPLAY_NAME: &str = "File";

/// Fallback original name for records stored without one
pub const DEFAULT_ORIGINAL_NAME: &str = "file.unknown";

/// Type label for names without an extension
pub const UNKNOWN_FILE_TYPE: &str = "FILE";

/// Metadata of a downloadable file, keyed by its location in the taxonomy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    /// Chat-platform file id used to send the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default = "default_original_name")]
    pub original_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(flatten)]
    pub path: LecturePath,
    #[serde(default)]
    pub name_lower: String,
    pub created_at: DateTime<Utc>,
}

fn default_original_name() -> String {
    DEFAULT_ORIGINAL_NAME.to_string()
}

impl FileRecord {
    /// Builds a record for a newly uploaded file
    pub fn create(id: impl Into<String>, new_file: NewFile) -> Self {
        let original_name = new_file
            .original_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(default_original_name);

        let mime_type = new_file.mime_type.or_else(|| {
            mime_guess::from_path(&original_name)
                .first()
                .map(|m| m.essence_str().to_string())
        });

        let display_name = new_file.display_name.trim().to_string();

        Self {
            id: id.into(),
            file_id: Some(new_file.file_id),
            name_lower: normalize_name(&display_name),
            display_name,
            original_name,
            mime_type,
            path: new_file.path,
            created_at: Utc::now(),
        }
    }

    /// Upper-cased extension of the original name, or `FILE` without one
    pub fn file_type(&self) -> String {
        match self.original_name.rsplit_once('.') {
            Some((_, ext)) => ext.to_uppercase(),
            None => UNKNOWN_FILE_TYPE.to_string(),
        }
    }

    /// Display name falling back to the original name, then a generic label
    pub fn label(&self) -> &str {
        if !self.display_name.is_empty() {
            &self.display_name
        } else if !self.original_name.is_empty() {
            &self.original_name
        } else {
            DEFAULT_DISPLAY_NAME
        }
    }

    /// Applies a partial update, keeping `name_lower` in sync with the display name
    pub fn apply(&mut self, update: &FileUpdate) {
        if let Some(display_name) = update.display_name.as_deref() {
            let trimmed = display_name.trim();

            if !trimmed.is_empty() {
                self.display_name = trimmed.to_string();
                self.name_lower = normalize_name(trimmed);
            }
        }

        if let Some(file_id) = &update.file_id {
            self.file_id = Some(file_id.clone());
        }

        if let Some(path) = &update.path {
            self.path = path.clone();
        }
    }

    pub fn summary(&self) -> FileSummary {
        FileSummary {
            id: self.id.clone(),
            display_name: self.label().to_string(),
            file_id: self.file_id.clone(),
        }
    }
}

/// Lower-cased, trimmed form used for prefix search
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Input for registering an uploaded file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFile {
    pub file_id: String,
    pub display_name: String,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(flatten)]
    pub path: LecturePath,
}

/// Partial update of a file record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileUpdate {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub path: Option<LecturePath>,
}

impl FileUpdate {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.file_id.is_none() && self.path.is_none()
    }
}

/// Search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}
