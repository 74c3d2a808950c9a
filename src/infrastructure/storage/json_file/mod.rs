//! JSON-file backend
//!
//! Each store is one pretty-printed JSON file under the data directory.
//! Reads and read-modify-write cycles run on the blocking thread pool; a
//! per-file async mutex serializes writers within the process. Files are
//! replaced through a temporary sibling and a rename.

mod file;
mod mailbox;
mod taxonomy;

pub use file::JsonFileRepository;
pub use mailbox::JsonMailboxRepository;
pub use taxonomy::JsonTaxonomyRepository;

use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::domain::DomainError;

/// A JSON document on disk holding a value of type `T`
#[derive(Debug)]
pub(crate) struct JsonFile<T> {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned + Default + Send + 'static,
{
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
            _phantom: PhantomData,
        }
    }

    #[cfg(test)]
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Current contents; a missing file reads as `T::default()`
    pub(crate) async fn read(&self) -> Result<T, DomainError> {
        let path = self.path.clone();
        let _guard = self.lock.lock().await;

        blocking(move || load(&path)).await
    }

    /// Loads, applies `f`, and writes back when `f` reports a change
    pub(crate) async fn modify<F, R>(&self, f: F) -> Result<R, DomainError>
    where
        F: FnOnce(&mut T) -> Result<(R, bool), DomainError> + Send + 'static,
        R: Send + 'static,
    {
        let path = self.path.clone();
        let _guard = self.lock.lock().await;

        blocking(move || {
            let mut value = load::<T>(&path)?;
            let (result, changed) = f(&mut value)?;

            if changed {
                store(&path, &value)?;
            }

            Ok(result)
        })
        .await
    }
}

async fn blocking<F, R>(f: F) -> Result<R, DomainError>
where
    F: FnOnce() -> Result<R, DomainError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| DomainError::internal(format!("Storage task failed: {}", e)))?
}

fn load<T: DeserializeOwned + Default>(path: &Path) -> Result<T, DomainError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => {
            return Err(DomainError::storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(&bytes).map_err(|e| {
        DomainError::storage(format!("Failed to parse {}: {}", path.display(), e))
    })
}

fn store<T: Serialize>(path: &Path, value: &T) -> Result<(), DomainError> {
    let write_error =
        |e: std::io::Error| DomainError::storage(format!("Failed to write {}: {}", path.display(), e));

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }

    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|e| DomainError::storage(format!("Failed to serialize {}: {}", path.display(), e)))?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, bytes).map_err(write_error)?;
    std::fs::rename(&tmp, path).map_err(write_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_missing_file_reads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let file: JsonFile<BTreeMap<String, u32>> = JsonFile::new(dir.path().join("absent.json"));

        assert!(file.read().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_modify_writes_only_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("counts.json");
        let file: JsonFile<BTreeMap<String, u32>> = JsonFile::new(&path);

        file.modify(|_| Ok(((), false))).await.unwrap();
        assert!(!path.exists());

        file.modify(|map| {
            map.insert("a".to_string(), 1);
            Ok(((), true))
        })
        .await
        .unwrap();

        assert!(path.exists());
        assert_eq!(file.read().await.unwrap().get("a"), Some(&1));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let file: JsonFile<BTreeMap<String, u32>> = JsonFile::new(&path);
        assert!(file.read().await.unwrap_err().is_storage());
    }

    #[tokio::test]
    async fn test_failed_closure_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let file: JsonFile<BTreeMap<String, u32>> = JsonFile::new(dir.path().join("c.json"));

        let err = file
            .modify::<_, ()>(|map| {
                map.insert("x".to_string(), 1);
                Err(DomainError::validation("rejected"))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(!file.path().exists());
    }
}
