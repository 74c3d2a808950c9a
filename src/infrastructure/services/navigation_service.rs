//! Navigation service - drives the program → term → subject → lecture menus

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use super::{CatalogService, ReportService};
use crate::config::NavigationConfig;
use crate::domain::navigation::{
    messages, Button, CallbackAction, Directive, NavigationSession, NavigationState, Screen,
};
use crate::domain::taxonomy::{LecturePath, TaxonomyLevel, TaxonomyPath};
use crate::domain::DomainError;

/// Per-user conversation engine.
///
/// Sessions are kept in a moka cache keyed by user id and expire after a
/// period of inactivity; an expired session starts over at program selection.
pub struct NavigationService {
    catalog: Arc<CatalogService>,
    reports: Arc<ReportService>,
    sessions: Cache<i64, NavigationSession>,
}

impl NavigationService {
    pub fn new(
        catalog: Arc<CatalogService>,
        reports: Arc<ReportService>,
        config: &NavigationConfig,
    ) -> Self {
        let sessions = Cache::builder()
            .time_to_idle(Duration::from_secs(config.session_idle_secs))
            .max_capacity(config.max_sessions)
            .build();

        Self {
            catalog,
            reports,
            sessions,
        }
    }

    /// Current session of `user_id`, or a fresh one
    pub async fn session(&self, user_id: i64) -> NavigationSession {
        self.sessions.get(&user_id).await.unwrap_or_default()
    }

    /// Clears the session and shows the program menu
    pub async fn start(&self, user_id: i64) -> Screen {
        let mut session = NavigationSession::new();
        let screen = self.render(user_id, &mut session, CallbackAction::MainMenu).await;
        self.sessions.insert(user_id, session).await;
        screen
    }

    /// Handles a button callback
    pub async fn handle(&self, user_id: i64, data: &str) -> Screen {
        let action = CallbackAction::parse(data);
        let mut session = self.session(user_id).await;

        let action = if session.state.accepts(&action) {
            action
        } else {
            CallbackAction::Unknown(data.to_string())
        };

        let screen = self.render(user_id, &mut session, action).await;
        self.sessions.insert(user_id, session).await;
        screen
    }

    /// Handles a free-text search message
    pub async fn search(&self, user_id: i64, text: &str) -> Screen {
        let session = self.session(user_id).await;
        let query = text.trim();

        let results = match self.catalog.search_files(query).await {
            Ok(results) => results,
            Err(e) => {
                tracing::error!(user_id, query, error = %e, "Search failed");
                return Screen::new(messages::GENERIC_ERROR, session.state)
                    .with_row(vec![Button::main_menu()]);
            }
        };

        if results.is_empty() {
            return Screen::new(messages::SEARCH_NO_RESULTS, session.state)
                .with_row(vec![Button::main_menu()]);
        }

        let mut screen = Screen::new(messages::search_results(query), session.state);
        for hit in results {
            screen = screen.with_row(vec![Button::new(
                hit.display_name,
                &CallbackAction::File(hit.id),
            )]);
        }

        screen.with_row(vec![Button::main_menu()])
    }

    async fn render(
        &self,
        user_id: i64,
        session: &mut NavigationSession,
        action: CallbackAction,
    ) -> Screen {
        let result = match action {
            CallbackAction::MainMenu => {
                session.reset();
                self.programs_menu().await
            }
            CallbackAction::Select {
                level: TaxonomyLevel::Lecture,
                value,
            } => self.lecture_files(session, value).await,
            CallbackAction::Select { level, value } => self.select(session, level, value).await,
            CallbackAction::File(id) => self.send_file(session, &id).await,
            CallbackAction::Report(id) => Ok(self.report(user_id, session, &id).await),
            CallbackAction::SearchStart => Ok(Screen::new(messages::SEARCH_PROMPT, session.state)
                .with_row(vec![Button::main_menu()])),
            CallbackAction::Unknown(data) => {
                tracing::debug!(user_id, data = %data, "Unknown callback");
                session.reset();
                Ok(Screen::error(messages::UNKNOWN_BUTTON))
            }
        };

        match result {
            Ok(screen) => screen,
            Err(e) => {
                session.reset();
                self.fail(user_id, "navigation", e).await
            }
        }
    }

    async fn fail(&self, user_id: i64, step: &'static str, error: DomainError) -> Screen {
        tracing::error!(user_id, step, error = %error, "Navigation step failed");
        self.sessions.invalidate(&user_id).await;
        Screen::error(messages::GENERIC_ERROR)
    }

    async fn programs_menu(&self) -> Result<Screen, DomainError> {
        let programs = self
            .catalog
            .options(&Default::default(), TaxonomyLevel::Program)
            .await?;

        if programs.is_empty() {
            return Ok(Screen::error(messages::NO_PROGRAMS_AVAILABLE));
        }

        let mut screen = Screen::new(messages::SELECT_PROGRAM, NavigationState::SelectProgram);
        for program in programs {
            let action = CallbackAction::select(TaxonomyLevel::Program, program.clone());
            screen = screen.with_row(vec![Button::new(program, &action)]);
        }

        Ok(screen.with_row(vec![Button::new(
            messages::BTN_SEARCH,
            &CallbackAction::SearchStart,
        )]))
    }

    /// Program, term or subject chosen: list the options one level down.
    ///
    /// A program without terms lists its subjects directly; the path then
    /// carries no term and lookup keys skip that segment.
    async fn select(
        &self,
        session: &mut NavigationSession,
        level: TaxonomyLevel,
        value: String,
    ) -> Result<Screen, DomainError> {
        let Some(mut child) = level.next() else {
            return Ok(Screen::error(messages::GENERIC_ERROR));
        };

        session.path.select(level, value);

        let mut options = self.catalog.options(&session.path, child).await?;
        let mut state = NavigationState::after(level);

        if level == TaxonomyLevel::Program && options.is_empty() {
            let subjects = self
                .catalog
                .options(&session.path, TaxonomyLevel::Subject)
                .await?;

            if !subjects.is_empty() {
                child = TaxonomyLevel::Subject;
                options = subjects;
                state = NavigationState::SelectSubject;
            }
        }

        let Some((text, back)) = breadcrumb(level, child, &session.path) else {
            session.reset();
            return Ok(Screen::error(messages::STATE_LOST));
        };

        let mut screen = Screen::new(text, state);
        for option in options {
            let action = CallbackAction::select(child, option.clone());
            screen = screen.with_row(vec![Button::new(option, &action)]);
        }

        session.state = state;

        Ok(screen.with_row(vec![
            Button::new(messages::BTN_BACK, &back),
            Button::main_menu(),
        ]))
    }

    /// Lecture chosen: one card and one download/report row per file
    async fn lecture_files(
        &self,
        session: &mut NavigationSession,
        lecture: String,
    ) -> Result<Screen, DomainError> {
        session.path.select(TaxonomyLevel::Lecture, lecture.clone());

        let (Some(program), Some(subject)) =
            (session.path.program.clone(), session.path.subject.clone())
        else {
            session.reset();
            return Ok(Screen::error(messages::STATE_LOST));
        };

        // Files always carry a full path, so a path without a term has none
        let files: Vec<_> = match LecturePath::from_path(&session.path) {
            Some(path) => self
                .catalog
                .files_on_path(&path)
                .await?
                .into_iter()
                .filter(|f| f.file_id.is_some())
                .collect(),
            None => Vec::new(),
        };

        let mut text = messages::breadcrumb_lecture(
            &program,
            session.path.term.as_deref(),
            &subject,
            &lecture,
        );
        let mut screen = Screen::new(String::new(), NavigationState::SelectFile);

        if files.is_empty() {
            text.push_str(messages::NO_FILES_AVAILABLE);
        } else {
            text.push_str(messages::FILES_AVAILABLE);

            for (index, file) in files.iter().enumerate() {
                let number = index + 1;
                text.push_str(&messages::file_card(number, file.label(), &file.file_type()));

                screen = screen.with_row(vec![
                    Button::new(
                        messages::download_button(number),
                        &CallbackAction::File(file.id.clone()),
                    ),
                    Button::new(messages::BTN_REPORT, &CallbackAction::Report(file.id.clone())),
                ]);
            }
        }

        screen.text = text;
        session.state = NavigationState::SelectFile;

        Ok(screen.with_row(vec![
            Button::new(
                messages::BTN_BACK,
                &CallbackAction::select(TaxonomyLevel::Subject, subject),
            ),
            Button::main_menu(),
        ]))
    }

    async fn send_file(
        &self,
        session: &NavigationSession,
        id: &str,
    ) -> Result<Screen, DomainError> {
        let record = self.catalog.get_file(id).await?;

        let Some((record, file_id)) = record.and_then(|r| r.file_id.clone().map(|f| (r, f))) else {
            return Ok(Screen::new(messages::FILE_NOT_FOUND, session.state));
        };

        let file_name = record.label().to_string();

        Ok(Screen::new(file_name.clone(), session.state)
            .with_directive(Directive::SendDocument { file_id, file_name }))
    }

    async fn report(&self, user_id: i64, session: &NavigationSession, id: &str) -> Screen {
        let text = match self.reports.report_file(user_id, id).await {
            Ok(_) => messages::REPORT_SUCCESS,
            Err(DomainError::RateLimited { .. }) => messages::RATE_LIMIT_EXCEEDED,
            Err(e) => {
                tracing::error!(user_id, file_id = id, error = %e, "Report failed");
                messages::REPORT_ERROR
            }
        };

        Screen::new(String::new(), session.state).with_directive(Directive::Alert {
            text: text.to_string(),
        })
    }
}

/// Header text and back action for the menu listing `child` options after
/// choosing at `level`.
///
/// `None` when an ancestor the header needs is missing from the session.
fn breadcrumb(
    level: TaxonomyLevel,
    child: TaxonomyLevel,
    path: &TaxonomyPath,
) -> Option<(String, CallbackAction)> {
    let program = path.program.as_deref()?;
    let prompt = match child {
        TaxonomyLevel::Term => messages::SELECT_TERM,
        TaxonomyLevel::Subject => messages::SELECT_SUBJECT,
        _ => messages::SELECT_LECTURE,
    };

    match level {
        TaxonomyLevel::Program => Some((
            messages::breadcrumb_program(program, prompt),
            CallbackAction::MainMenu,
        )),
        TaxonomyLevel::Term => {
            let term = path.term.as_deref()?;
            Some((
                messages::breadcrumb_term(program, term, prompt),
                CallbackAction::select(TaxonomyLevel::Program, program),
            ))
        }
        TaxonomyLevel::Subject => {
            let subject = path.subject.as_deref()?;
            let back = match path.term.as_deref() {
                Some(term) => CallbackAction::select(TaxonomyLevel::Term, term),
                None => CallbackAction::select(TaxonomyLevel::Program, program),
            };
            Some((
                messages::breadcrumb_subject(program, path.term.as_deref(), subject, prompt),
                back,
            ))
        }
        TaxonomyLevel::Lecture => None,
    }
}
