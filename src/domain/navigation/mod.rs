//! Navigation domain - callback actions, screens and session state

mod action;
pub mod messages;
mod screen;

pub use action::CallbackAction;
pub use screen::{Button, Directive, NavigationSession, NavigationState, Screen};
