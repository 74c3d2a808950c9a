//! Rendered navigation screens and per-user session state

use serde::{Deserialize, Serialize};

use super::action::CallbackAction;
use super::messages;
use crate::domain::taxonomy::{TaxonomyLevel, TaxonomyPath};

/// Conversation state of a user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationState {
    #[default]
    SelectProgram,
    SelectTerm,
    SelectSubject,
    SelectLecture,
    SelectFile,
}

impl NavigationState {
    /// State entered after choosing a value at `level`
    pub fn after(level: TaxonomyLevel) -> Self {
        match level {
            TaxonomyLevel::Program => Self::SelectTerm,
            TaxonomyLevel::Term => Self::SelectSubject,
            TaxonomyLevel::Subject => Self::SelectLecture,
            TaxonomyLevel::Lecture => Self::SelectFile,
        }
    }

    /// Deepest level a selection may target in this state
    pub fn deepest_level(&self) -> TaxonomyLevel {
        match self {
            Self::SelectProgram => TaxonomyLevel::Program,
            Self::SelectTerm => TaxonomyLevel::Term,
            Self::SelectSubject => TaxonomyLevel::Subject,
            Self::SelectLecture | Self::SelectFile => TaxonomyLevel::Lecture,
        }
    }

    /// Whether `action` is handled in this state.
    ///
    /// Selections may revisit the current level or any shallower one; every
    /// other action is valid everywhere.
    pub fn accepts(&self, action: &CallbackAction) -> bool {
        match action {
            CallbackAction::Select { level, .. } => *level <= self.deepest_level(),
            CallbackAction::Unknown(_) => false,
            _ => true,
        }
    }
}

/// Navigation session kept between callbacks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationSession {
    pub state: NavigationState,
    pub path: TaxonomyPath,
}

impl NavigationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, action: &CallbackAction) -> Self {
        Self {
            label: label.into(),
            data: action.to_string(),
        }
    }

    pub fn main_menu() -> Self {
        Self::new(messages::BTN_MAIN_MENU, &CallbackAction::MainMenu)
    }
}

/// Side effect the chat adapter performs alongside rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Directive {
    /// Send the stored document to the user
    SendDocument { file_id: String, file_name: String },
    /// Show a short popup without changing the screen
    Alert { text: String },
}

/// What the user sees after an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub text: String,
    pub keyboard: Vec<Vec<Button>>,
    pub state: NavigationState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directive: Option<Directive>,
}

impl Screen {
    pub fn new(text: impl Into<String>, state: NavigationState) -> Self {
        Self {
            text: text.into(),
            keyboard: Vec::new(),
            state,
            directive: None,
        }
    }

    pub fn with_row(mut self, row: Vec<Button>) -> Self {
        self.keyboard.push(row);
        self
    }

    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directive = Some(directive);
        self
    }

    /// Text with a single main-menu button, returning to program selection
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, NavigationState::SelectProgram).with_row(vec![Button::main_menu()])
    }

    /// Every callback attached to the keyboard, row by row
    pub fn callbacks(&self) -> Vec<&str> {
        self.keyboard
            .iter()
            .flatten()
            .map(|b| b.data.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_after_level() {
        assert_eq!(
            NavigationState::after(TaxonomyLevel::Program),
            NavigationState::SelectTerm
        );
        assert_eq!(
            NavigationState::after(TaxonomyLevel::Lecture),
            NavigationState::SelectFile
        );
    }

    #[test]
    fn test_state_gates_selections() {
        let program = CallbackAction::select(TaxonomyLevel::Program, "cs");
        let term = CallbackAction::select(TaxonomyLevel::Term, "term1");
        let lecture = CallbackAction::select(TaxonomyLevel::Lecture, "L1");

        assert!(NavigationState::SelectProgram.accepts(&program));
        assert!(!NavigationState::SelectProgram.accepts(&term));
        assert!(NavigationState::SelectSubject.accepts(&term));
        assert!(!NavigationState::SelectSubject.accepts(&lecture));
        assert!(NavigationState::SelectFile.accepts(&lecture));
        assert!(NavigationState::SelectProgram.accepts(&CallbackAction::MainMenu));
        assert!(NavigationState::SelectProgram.accepts(&CallbackAction::File("x".into())));
        assert!(!NavigationState::SelectFile.accepts(&CallbackAction::Unknown("x".into())));
    }

    #[test]
    fn test_error_screen() {
        let screen = Screen::error(messages::GENERIC_ERROR);

        assert_eq!(screen.state, NavigationState::SelectProgram);
        assert_eq!(screen.callbacks(), vec!["main_menu"]);
        assert!(screen.directive.is_none());
    }

    #[test]
    fn test_directive_serializes_tagged() {
        let json = serde_json::to_value(Directive::SendDocument {
            file_id: "tg-1".to_string(),
            file_name: "a.pdf".to_string(),
        })
        .unwrap();

        assert_eq!(json["type"], "send_document");
        assert_eq!(json["file_id"], "tg-1");
    }
}
