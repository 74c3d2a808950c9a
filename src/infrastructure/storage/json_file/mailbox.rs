use std::path::Path;

use async_trait::async_trait;

use super::JsonFile;
use crate::domain::mailbox::{MailboxEntry, MailboxRepository};
use crate::domain::DomainError;

const FILE_NAME: &str = "mailbox.json";

#[derive(Debug)]
pub struct JsonMailboxRepository {
    file: JsonFile<MailboxEntry>,
}

impl JsonMailboxRepository {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            file: JsonFile::new(data_dir.as_ref().join(FILE_NAME)),
        }
    }
}

#[async_trait]
impl MailboxRepository for JsonMailboxRepository {
    async fn get(&self) -> Result<MailboxEntry, DomainError> {
        self.file.read().await
    }

    async fn set(&self, entry: MailboxEntry) -> Result<(), DomainError> {
        self.file
            .modify(move |stored| {
                *stored = entry;
                Ok(((), true))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mailbox::MailboxUpdate;

    #[tokio::test]
    async fn test_mailbox_persists() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonMailboxRepository::new(dir.path());

        assert!(repo.get().await.unwrap().is_empty());

        let entry = MailboxUpdate {
            file_id: "tg-5".to_string(),
            file_name: Some("week5.pdf".to_string()),
        }
        .into_entry(chrono::Utc::now());
        repo.set(entry.clone()).await.unwrap();

        assert_eq!(JsonMailboxRepository::new(dir.path()).get().await.unwrap(), entry);
    }
}
