use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::MailboxEntry;
use crate::domain::DomainError;

/// Single-slot store for the admin mailbox
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MailboxRepository: Send + Sync {
    /// Current entry; an empty entry when nothing has been received yet
    async fn get(&self) -> Result<MailboxEntry, DomainError>;

    /// Overwrites the entry
    async fn set(&self, entry: MailboxEntry) -> Result<(), DomainError>;
}

pub mod in_memory {
    use super::*;
    use std::sync::RwLock;

    #[derive(Debug, Default)]
    pub struct InMemoryMailboxRepository {
        entry: RwLock<MailboxEntry>,
    }

    impl InMemoryMailboxRepository {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl MailboxRepository for InMemoryMailboxRepository {
        async fn get(&self) -> Result<MailboxEntry, DomainError> {
            let entry = self
                .entry
                .read()
                .map_err(|e| DomainError::storage(format!("Failed to acquire mailbox lock: {}", e)))?;
            Ok(entry.clone())
        }

        async fn set(&self, entry: MailboxEntry) -> Result<(), DomainError> {
            let mut slot = self
                .entry
                .write()
                .map_err(|e| DomainError::storage(format!("Failed to acquire mailbox lock: {}", e)))?;
            *slot = entry;
            Ok(())
        }
    }

}
