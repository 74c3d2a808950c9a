//! User-facing text for navigation screens

pub const SELECT_PROGRAM: &str = "Choose a program";
pub const SELECT_TERM: &str = "Choose a term";
pub const SELECT_SUBJECT: &str = "Choose a subject";
pub const SELECT_LECTURE: &str = "Choose a lecture";

pub const BTN_BACK: &str = "⬅️ Back";
pub const BTN_MAIN_MENU: &str = "🏠 Main menu";
pub const BTN_SEARCH: &str = "🔍 Search files";
pub const BTN_REPORT: &str = "⚠️ Report a problem";

pub const NO_PROGRAMS_AVAILABLE: &str = "No programs are available yet.";
pub const NO_FILES_AVAILABLE: &str = "No files are available for this lecture yet.";
pub const FILES_AVAILABLE: &str = "Available files:\n";
pub const FILE_NOT_FOUND: &str = "Sorry, this file could not be found.";
pub const GENERIC_ERROR: &str = "Something went wrong. Please start again from the main menu.";
pub const STATE_LOST: &str = "Your navigation session has expired. Please start again.";
pub const UNKNOWN_BUTTON: &str = "This button is no longer valid.";

pub const SEARCH_PROMPT: &str = "Send the name of the file you are looking for.";
pub const SEARCH_NO_RESULTS: &str = "No files matched your search.";

pub const REPORT_SUCCESS: &str = "Thanks, the problem has been reported.";
pub const RATE_LIMIT_EXCEEDED: &str = "You have sent too many reports. Please try again later.";
pub const REPORT_ERROR: &str = "The report could not be sent. Please try again later.";

/// Default label for files without a name
pub const FILE_LABEL: &str = "File";

pub fn download_button(number: usize) -> String {
    format!("⬇️ Download ({})", number)
}

pub fn search_results(query: &str) -> String {
    format!("🔍 Results for \"{}\":", query)
}

pub fn breadcrumb_program(program: &str, prompt: &str) -> String {
    format!("Program: *{}*\n\n{}", program, prompt)
}

pub fn breadcrumb_term(program: &str, term: &str, prompt: &str) -> String {
    format!("{} > Term: *{}*\n\n{}", program, term, prompt)
}

pub fn breadcrumb_subject(
    program: &str,
    term: Option<&str>,
    subject: &str,
    prompt: &str,
) -> String {
    format!("{} > Subject: *{}*\n\n{}", trail(program, term), subject, prompt)
}

pub fn breadcrumb_lecture(
    program: &str,
    term: Option<&str>,
    subject: &str,
    lecture: &str,
) -> String {
    format!("{} > {} > Lecture: *{}*\n\n", trail(program, term), subject, lecture)
}

/// `program > term`, or just the program when it has no terms
fn trail(program: &str, term: Option<&str>) -> String {
    match term {
        Some(term) => format!("{} > {}", program, term),
        None => program.to_string(),
    }
}

/// One card line of the lecture file list
pub fn file_card(number: usize, name: &str, file_type: &str) -> String {
    format!("\n---\n{}. {} [{}]\n", number, name, file_type)
}
