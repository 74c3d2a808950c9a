use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;

use super::JsonFile;
use crate::domain::file::{records_on_path, records_with_prefix, FileRecord, FileRepository, FileSummary};
use crate::domain::taxonomy::LecturePath;
use crate::domain::DomainError;

const FILE_NAME: &str = "files.json";

#[derive(Debug)]
pub struct JsonFileRepository {
    file: JsonFile<BTreeMap<String, FileRecord>>,
}

impl JsonFileRepository {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            file: JsonFile::new(data_dir.as_ref().join(FILE_NAME)),
        }
    }
}

#[async_trait]
impl FileRepository for JsonFileRepository {
    async fn get(&self, id: &str) -> Result<Option<FileRecord>, DomainError> {
        let mut records = self.file.read().await?;
        Ok(records.remove(id))
    }

    async fn find_by_path(&self, path: &LecturePath) -> Result<Vec<FileRecord>, DomainError> {
        let records = self.file.read().await?;
        Ok(records_on_path(records.values(), path))
    }

    async fn search_prefix(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<FileSummary>, DomainError> {
        let records = self.file.read().await?;
        Ok(records_with_prefix(records.values(), prefix, limit))
    }

    async fn create(&self, record: FileRecord) -> Result<FileRecord, DomainError> {
        self.file
            .modify(move |records| {
                if records.contains_key(&record.id) {
                    return Err(DomainError::conflict(format!(
                        "File '{}' already exists",
                        record.id
                    )));
                }

                records.insert(record.id.clone(), record.clone());
                Ok((record, true))
            })
            .await
    }

    async fn update(&self, record: FileRecord) -> Result<FileRecord, DomainError> {
        self.file
            .modify(move |records| {
                if !records.contains_key(&record.id) {
                    return Err(DomainError::not_found(format!(
                        "File '{}' not found",
                        record.id
                    )));
                }

                records.insert(record.id.clone(), record.clone());
                Ok((record, true))
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let id = id.to_string();

        self.file
            .modify(move |records| {
                let removed = records.remove(&id).is_some();
                Ok((removed, removed))
            })
            .await
    }

    async fn delete_many(&self, ids: &[String]) -> Result<usize, DomainError> {
        let ids = ids.to_vec();

        self.file
            .modify(move |records| {
                let removed = ids.iter().filter(|id| records.remove(*id).is_some()).count();
                Ok((removed, removed > 0))
            })
            .await
    }
}
