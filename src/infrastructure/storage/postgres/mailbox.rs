use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::Row;

use super::query_error;
use crate::domain::mailbox::{MailboxEntry, MailboxRepository};
use crate::domain::DomainError;

const MAILBOX_KEY: &str = "mailbox";

/// Mailbox stored as a single row of `bot_state`
#[derive(Debug, Clone)]
pub struct PostgresMailboxRepository {
    pool: PgPool,
}

impl PostgresMailboxRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MailboxRepository for PostgresMailboxRepository {
    async fn get(&self) -> Result<MailboxEntry, DomainError> {
        let row = sqlx::query("SELECT data FROM bot_state WHERE key = $1")
            .bind(MAILBOX_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("read mailbox"))?;

        match row {
            Some(row) => {
                let data: serde_json::Value = row.get("data");
                serde_json::from_value(data).map_err(|e| {
                    DomainError::storage(format!("Failed to deserialize mailbox: {}", e))
                })
            }
            None => Ok(MailboxEntry::default()),
        }
    }

    async fn set(&self, entry: MailboxEntry) -> Result<(), DomainError> {
        let data = serde_json::to_value(&entry)
            .map_err(|e| DomainError::storage(format!("Failed to serialize mailbox: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO bot_state (key, data)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            "#,
        )
        .bind(MAILBOX_KEY)
        .bind(&data)
        .execute(&self.pool)
        .await
        .map_err(query_error("write mailbox"))?;

        Ok(())
    }
}
