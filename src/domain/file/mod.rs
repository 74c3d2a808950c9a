//! File domain - uploaded file metadata, search and validation

mod entity;
mod repository;
mod validation;

pub use entity::{
    normalize_name, FileRecord, FileSummary, FileUpdate, NewFile, DEFAULT_DISPLAY_NAME,
    DEFAULT_ORIGINAL_NAME, UNKNOWN_FILE_TYPE,
};
pub use repository::in_memory::InMemoryFileRepository;
pub use repository::{
    in_prefix_range, prefix_upper_bound, records_on_path, records_with_prefix, FileRepository,
    SEARCH_LIMIT,
};
pub use validation::{
    validate_display_name, validate_extension, validate_file_update, validate_lecture_path,
    validate_new_file, FileValidationError, ALLOWED_EXTENSIONS,
};

#[cfg(test)]
pub use repository::MockFileRepository;
