use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use crate::error::StorageError;

/// Durable key-value storage used for favorites
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace the whole value stored under `key`
    async fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

/// One JSON file per key inside a directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let dir = self.dir.clone();
        let path = self.path_for(key);
        let value = value.to_vec();

        tokio::task::spawn_blocking(move || write_atomic(&dir, &path, &value))
            .await
            .map_err(io::Error::other)??;

        tracing::debug!("Wrote {}", key);
        Ok(())
    }
}

/// Write through a temp file in the same directory, then rename over the target
fn write_atomic(dir: &Path, path: &Path, value: &[u8]) -> io::Result<()> {
    std::fs::create_dir_all(dir)?;

    let mut temp_file = NamedTempFile::new_in(dir)?;
    temp_file.write_all(value)?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Process-local store, nothing survives a restart
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_store_round_trips_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert!(store.read("favorites").await.unwrap().is_none());

        store.write("favorites", b"[1]").await.unwrap();
        store.write("favorites", b"[1,2]").await.unwrap();

        let bytes = store.read("favorites").await.unwrap().unwrap();
        assert_eq!(bytes, b"[1,2]");
        assert!(store.path_for("favorites").exists());
    }

    #[tokio::test]
    async fn memory_store_keys_are_independent() {
        let store = MemoryStore::new();
        store.write("a", b"1").await.unwrap();

        assert_eq!(store.read("a").await.unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.read("b").await.unwrap(), None);
    }
}
