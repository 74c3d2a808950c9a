use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use super::query_error;
use crate::domain::file::{prefix_upper_bound, FileRecord, FileRepository, FileSummary};
use crate::domain::taxonomy::LecturePath;
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct PostgresFileRepository {
    pool: PgPool,
}

impl PostgresFileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn decode(row: &PgRow) -> Result<FileRecord, DomainError> {
        let data: serde_json::Value = row.get("data");
        serde_json::from_value(data)
            .map_err(|e| DomainError::storage(format!("Failed to deserialize file record: {}", e)))
    }

    fn encode(record: &FileRecord) -> Result<serde_json::Value, DomainError> {
        serde_json::to_value(record)
            .map_err(|e| DomainError::storage(format!("Failed to serialize file record: {}", e)))
    }
}

#[async_trait]
impl FileRepository for PostgresFileRepository {
    async fn get(&self, id: &str) -> Result<Option<FileRecord>, DomainError> {
        let row = sqlx::query("SELECT data FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("read file"))?;

        row.as_ref().map(Self::decode).transpose()
    }

    async fn find_by_path(&self, path: &LecturePath) -> Result<Vec<FileRecord>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT data FROM files
            WHERE program = $1 AND term = $2 AND subject = $3 AND lecture = $4
            ORDER BY created_at, id
            "#,
        )
        .bind(&path.program)
        .bind(&path.term)
        .bind(&path.subject)
        .bind(&path.lecture)
        .fetch_all(&self.pool)
        .await
        .map_err(query_error("query files by path"))?;

        rows.iter().map(Self::decode).collect()
    }

    async fn search_prefix(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<FileSummary>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT data FROM files
            WHERE name_lower COLLATE "C" >= $1 AND name_lower COLLATE "C" <= $2
            ORDER BY name_lower COLLATE "C", id
            LIMIT $3
            "#,
        )
        .bind(prefix)
        .bind(prefix_upper_bound(prefix))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(query_error("search files"))?;

        rows.iter()
            .map(|row| Self::decode(row).map(|record| record.summary()))
            .collect()
    }

    async fn create(&self, record: FileRecord) -> Result<FileRecord, DomainError> {
        let data = Self::encode(&record)?;

        sqlx::query(
            r#"
            INSERT INTO files (id, program, term, subject, lecture, name_lower, data, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&record.id)
        .bind(&record.path.program)
        .bind(&record.path.term)
        .bind(&record.path.subject)
        .bind(&record.path.lecture)
        .bind(&record.name_lower)
        .bind(&data)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                DomainError::conflict(format!("File '{}' already exists", record.id))
            }
            _ => DomainError::storage(format!("Failed to create file: {}", e)),
        })?;

        Ok(record)
    }

    async fn update(&self, record: FileRecord) -> Result<FileRecord, DomainError> {
        let data = Self::encode(&record)?;

        let result = sqlx::query(
            r#"
            UPDATE files
            SET program = $2, term = $3, subject = $4, lecture = $5, name_lower = $6, data = $7
            WHERE id = $1
            "#,
        )
        .bind(&record.id)
        .bind(&record.path.program)
        .bind(&record.path.term)
        .bind(&record.path.subject)
        .bind(&record.path.lecture)
        .bind(&record.name_lower)
        .bind(&data)
        .execute(&self.pool)
        .await
        .map_err(query_error("update file"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "File '{}' not found",
                record.id
            )));
        }

        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(query_error("delete file"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, ids: &[String]) -> Result<usize, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM files WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(query_error("delete files"))?;

        Ok(result.rows_affected() as usize)
    }
}
