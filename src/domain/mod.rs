//! Domain layer - Core business logic and entities

pub mod error;
pub mod file;
pub mod mailbox;
pub mod navigation;
pub mod taxonomy;

pub use error::DomainError;
pub use file::{FileRecord, FileRepository, FileSummary, FileUpdate, NewFile};
pub use mailbox::{MailboxEntry, MailboxRepository, MailboxUpdate};
pub use navigation::{CallbackAction, NavigationSession, NavigationState, Screen};
pub use taxonomy::{
    LecturePath, TaxonomyDocument, TaxonomyDocumentId, TaxonomyLevel, TaxonomyPath,
    TaxonomyRepository, TaxonomyUpdate,
};
