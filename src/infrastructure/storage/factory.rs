//! Storage factory for runtime backend selection

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::StorageConfig;
use crate::domain::file::{FileRepository, InMemoryFileRepository};
use crate::domain::mailbox::{InMemoryMailboxRepository, MailboxRepository};
use crate::domain::taxonomy::{InMemoryTaxonomyRepository, TaxonomyRepository};
use crate::domain::DomainError;

use super::json_file::{JsonFileRepository, JsonMailboxRepository, JsonTaxonomyRepository};
use super::migrations::run_storage_migrations;
use super::postgres::{
    self, PostgresConfig, PostgresFileRepository, PostgresMailboxRepository,
    PostgresTaxonomyRepository,
};

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// Process memory (testing/development)
    InMemory,
    /// JSON files under a data directory
    Json,
    /// PostgreSQL
    Postgres,
}

impl std::str::FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "json" | "file" | "json_file" => Ok(Self::Json),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            _ => Err(DomainError::configuration(format!(
                "Unknown storage type: {}",
                s
            ))),
        }
    }
}

/// Repositories sharing one backend
#[derive(Clone)]
pub struct Repositories {
    pub taxonomy: Arc<dyn TaxonomyRepository>,
    pub files: Arc<dyn FileRepository>,
    pub mailbox: Arc<dyn MailboxRepository>,
}

/// Factory for creating repository sets
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates the repositories selected by `config`
    pub async fn create(config: &StorageConfig) -> Result<Repositories, DomainError> {
        let storage_type: StorageType = config.storage_type.parse()?;

        tracing::info!(storage = ?storage_type, "Initializing storage");

        match storage_type {
            StorageType::InMemory => Ok(Self::in_memory()),
            StorageType::Json => Ok(Self::json(&config.data_dir)),
            StorageType::Postgres => {
                let url = config.database_url.as_deref().ok_or_else(|| {
                    DomainError::configuration("storage.database_url is required for postgres")
                })?;

                let pg_config =
                    PostgresConfig::new(url).with_max_connections(config.max_connections);
                Self::postgres(&pg_config).await
            }
        }
    }

    pub fn in_memory() -> Repositories {
        Repositories {
            taxonomy: Arc::new(InMemoryTaxonomyRepository::new()),
            files: Arc::new(InMemoryFileRepository::new()),
            mailbox: Arc::new(InMemoryMailboxRepository::new()),
        }
    }

    pub fn json(data_dir: impl Into<PathBuf>) -> Repositories {
        let data_dir = data_dir.into();

        Repositories {
            taxonomy: Arc::new(JsonTaxonomyRepository::new(&data_dir)),
            files: Arc::new(JsonFileRepository::new(&data_dir)),
            mailbox: Arc::new(JsonMailboxRepository::new(&data_dir)),
        }
    }

    /// Connects, runs migrations, and builds the Postgres repositories
    pub async fn postgres(config: &PostgresConfig) -> Result<Repositories, DomainError> {
        let pool = postgres::connect(config).await?;
        run_storage_migrations(&pool).await?;

        Ok(Repositories {
            taxonomy: Arc::new(PostgresTaxonomyRepository::new(pool.clone())),
            files: Arc::new(PostgresFileRepository::new(pool.clone())),
            mailbox: Arc::new(PostgresMailboxRepository::new(pool)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::taxonomy::{LecturePath, TaxonomyUpdate};

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!("memory".parse::<StorageType>().unwrap(), StorageType::InMemory);
        assert_eq!("in-memory".parse::<StorageType>().unwrap(), StorageType::InMemory);
        assert_eq!("JSON".parse::<StorageType>().unwrap(), StorageType::Json);
        assert_eq!("postgresql".parse::<StorageType>().unwrap(), StorageType::Postgres);
        assert_eq!("pg".parse::<StorageType>().unwrap(), StorageType::Postgres);
        assert!("firestore".parse::<StorageType>().is_err());
    }

    #[tokio::test]
    async fn test_postgres_requires_url() {
        let config = StorageConfig {
            storage_type: "postgres".to_string(),
            database_url: None,
            ..Default::default()
        };

        let err = StorageFactory::create(&config).await.err().unwrap();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_json_backend_uses_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            storage_type: "json".to_string(),
            data_dir: dir.path().to_string_lossy().into_owned(),
            ..Default::default()
        };

        let repos = StorageFactory::create(&config).await.unwrap();
        repos
            .taxonomy
            .apply_update(&TaxonomyUpdate::for_path(&LecturePath::new("cs", "t", "s", "l")))
            .await
            .unwrap();

        assert!(dir.path().join("taxonomy.json").exists());
    }
}
