//! File upload validation

use thiserror::Error;

use super::entity::{FileUpdate, NewFile};
use crate::domain::taxonomy::LecturePath;
use crate::domain::DomainError;

/// Extensions accepted for uploaded files
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    ".pdf", ".zip", ".rar", ".doc", ".docx", ".ppt", ".pptx", ".txt", ".mp3", ".m4a", ".mp4",
    ".mkv", ".mov", ".avi",
];

const MAX_DISPLAY_NAME_LENGTH: usize = 200;

/// Errors that can occur during file validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FileValidationError {
    #[error("A file id is required")]
    MissingFileId,

    #[error("Display name cannot be empty")]
    EmptyDisplayName,

    #[error("Display name cannot exceed {0} characters")]
    DisplayNameTooLong(usize),

    #[error("Invalid file type: {0}")]
    ExtensionNotAllowed(String),

    #[error("{0} cannot be empty")]
    EmptySegment(&'static str),
}

impl From<FileValidationError> for DomainError {
    fn from(err: FileValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// Validate a display name
pub fn validate_display_name(name: &str) -> Result<(), FileValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(FileValidationError::EmptyDisplayName);
    }

    if trimmed.chars().count() > MAX_DISPLAY_NAME_LENGTH {
        return Err(FileValidationError::DisplayNameTooLong(
            MAX_DISPLAY_NAME_LENGTH,
        ));
    }

    Ok(())
}

/// Validate the extension of an original file name
///
/// Names without an extension are rejected; comparison is case-insensitive.
pub fn validate_extension(original_name: &str) -> Result<(), FileValidationError> {
    let lower = original_name.trim().to_lowercase();
    let ext = match lower.rfind('.') {
        Some(idx) if idx > 0 => &lower[idx..],
        _ => "",
    };

    if ALLOWED_EXTENSIONS.contains(&ext) {
        Ok(())
    } else {
        Err(FileValidationError::ExtensionNotAllowed(if ext.is_empty() {
            lower
        } else {
            ext.to_string()
        }))
    }
}

/// Validate a new file before it is stored
pub fn validate_new_file(file: &NewFile) -> Result<(), FileValidationError> {
    if file.file_id.trim().is_empty() {
        return Err(FileValidationError::MissingFileId);
    }

    validate_display_name(&file.display_name)?;

    if let Some(original_name) = &file.original_name {
        validate_extension(original_name)?;
    }

    validate_lecture_path(&file.path)
}

/// Validate a partial update
pub fn validate_file_update(update: &FileUpdate) -> Result<(), FileValidationError> {
    if let Some(file_id) = &update.file_id {
        if file_id.trim().is_empty() {
            return Err(FileValidationError::MissingFileId);
        }
    }

    if let Some(path) = &update.path {
        validate_lecture_path(path)?;
    }

    Ok(())
}

/// Validate that every segment of a lecture path is filled in
pub fn validate_lecture_path(path: &LecturePath) -> Result<(), FileValidationError> {
    for (name, value) in [
        ("program", &path.program),
        ("term", &path.term),
        ("subject", &path.subject),
        ("lecture", &path.lecture),
    ] {
        if value.trim().is_empty() {
            return Err(FileValidationError::EmptySegment(name));
        }
    }

    Ok(())
}
