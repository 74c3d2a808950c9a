//! Mailbox domain - last file received in the admin upload channel

mod entity;
mod repository;

pub use entity::{MailboxEntry, MailboxUpdate};
pub use repository::in_memory::InMemoryMailboxRepository;
pub use repository::MailboxRepository;

#[cfg(test)]
pub use repository::MockMailboxRepository;
