//! JSON-file-backed key-value store.

use super::service::{KeyValueStore, StoreError, StoreResult};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Persists one namespace as a single JSON object on disk.
///
/// Every write rewrites the whole file through a temporary sibling and an
/// atomic rename. Read-modify-write cycles are serialized by an internal lock,
/// so concurrent writers within one process never lose updates.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens (or prepares) the store at `path`, creating parent directories.
    ///
    /// The file itself is created lazily on first write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConnectionError`] if the parent directory cannot be created.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::ConnectionError(format!(
                    "Failed to create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        info!("Using JSON file store at {}", path.display());

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> StoreResult<Map<String, Value>> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(Map::new()),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                StoreError::SerializationError(format!("{}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Store file {} not found, starting empty", self.path.display());
                Ok(Map::new())
            }
            Err(e) => Err(StoreError::OperationError(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn write_all(&self, entries: &Map<String, Value>) -> StoreResult<()> {
        let contents = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents).await.map_err(|e| {
            StoreError::OperationError(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            StoreError::OperationError(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value);
        self.write_all(&entries).await
    }

    async fn set_many(&self, new_entries: Vec<(String, Value)>) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.extend(new_entries);
        self.write_all(&entries).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        if entries.remove(key).is_some() {
            self.write_all(&entries).await?;
        }
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        self.write_all(&Map::new()).await
    }

    async fn health_check(&self) -> bool {
        let _guard = self.lock.lock().await;
        self.read_all().await.is_ok()
    }
}
