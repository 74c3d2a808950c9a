//! Callback actions attached to navigation buttons

use crate::domain::taxonomy::TaxonomyLevel;

const MAIN_MENU: &str = "main_menu";
const SEARCH_START: &str = "search_start";
const FILE_PREFIX: &str = "file";
const REPORT_PREFIX: &str = "report";

/// A parsed button callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    /// `program:<v>`, `term:<v>`, `subject:<v>` or `lecture:<v>`
    Select { level: TaxonomyLevel, value: String },
    /// `file:<id>`
    File(String),
    /// `report:<id>`
    Report(String),
    MainMenu,
    SearchStart,
    Unknown(String),
}

impl CallbackAction {
    pub fn select(level: TaxonomyLevel, value: impl Into<String>) -> Self {
        Self::Select {
            level,
            value: value.into(),
        }
    }

    /// Parses callback data, splitting on the first `:` only
    pub fn parse(data: &str) -> Self {
        match data {
            MAIN_MENU => return Self::MainMenu,
            SEARCH_START => return Self::SearchStart,
            _ => {}
        }

        let Some((prefix, value)) = data.split_once(':') else {
            return Self::Unknown(data.to_string());
        };

        match prefix {
            FILE_PREFIX => Self::File(value.to_string()),
            REPORT_PREFIX => Self::Report(value.to_string()),
            _ => match prefix.parse::<TaxonomyLevel>() {
                Ok(level) => Self::select(level, value),
                Err(_) => Self::Unknown(data.to_string()),
            },
        }
    }
}

impl std::fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Select { level, value } => write!(f, "{}:{}", level, value),
            Self::File(id) => write!(f, "{}:{}", FILE_PREFIX, id),
            Self::Report(id) => write!(f, "{}:{}", REPORT_PREFIX, id),
            Self::MainMenu => f.write_str(MAIN_MENU),
            Self::SearchStart => f.write_str(SEARCH_START),
            Self::Unknown(data) => f.write_str(data),
        }
    }
}

impl From<&str> for CallbackAction {
    fn from(data: &str) -> Self {
        Self::parse(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selections() {
        assert_eq!(
            CallbackAction::parse("program:cs"),
            CallbackAction::select(TaxonomyLevel::Program, "cs")
        );
        assert_eq!(
            CallbackAction::parse("lecture:L1"),
            CallbackAction::select(TaxonomyLevel::Lecture, "L1")
        );
    }

    #[test]
    fn test_parse_splits_on_first_colon() {
        assert_eq!(
            CallbackAction::parse("subject:Math: Part 2"),
            CallbackAction::select(TaxonomyLevel::Subject, "Math: Part 2")
        );
        assert_eq!(
            CallbackAction::parse("file:abc:def"),
            CallbackAction::File("abc:def".to_string())
        );
    }

    #[test]
    fn test_parse_fixed_and_unknown() {
        assert_eq!(CallbackAction::parse("main_menu"), CallbackAction::MainMenu);
        assert_eq!(CallbackAction::parse("search_start"), CallbackAction::SearchStart);
        assert_eq!(
            CallbackAction::parse("report:42"),
            CallbackAction::Report("42".to_string())
        );
        assert_eq!(
            CallbackAction::parse("year:2024"),
            CallbackAction::Unknown("year:2024".to_string())
        );
        assert_eq!(
            CallbackAction::parse("noop"),
            CallbackAction::Unknown("noop".to_string())
        );
    }

    #[test]
    fn test_display_matches_callback_data() {
        for data in ["program:cs", "term:term1", "file:x", "report:y", "main_menu", "search_start"] {
            assert_eq!(CallbackAction::parse(data).to_string(), data);
        }
    }
}
