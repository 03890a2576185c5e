//! Key-value storage backing settings and statistics.
//!
//! Provides a [`KeyValueStore`] trait with three implementations:
//! - [`MemoryStore`] - Process-local map, for tests and ephemeral runs
//! - [`JsonFileStore`] - One JSON file per namespace
//! - [`RedisStore`] - One Redis hash per namespace
//!
//! Two namespaces exist, mirroring the browser storage areas: `sync` for
//! settings and `local` for statistics. [`open_stores`] builds both for the
//! configured backend.

mod json_file_store;
mod memory_store;
mod redis_store;
mod service;

pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use service::{KeyValueStore, StoreError, StoreResult};

use crate::config::{Config, StorageBackend};
use std::sync::Arc;

/// Namespace for synced user settings.
pub const SYNC_NAMESPACE: &str = "sync";
/// Namespace for local statistics.
pub const LOCAL_NAMESPACE: &str = "local";

/// The two storage areas used by the application.
#[derive(Clone)]
pub struct Stores {
    pub sync: Arc<dyn KeyValueStore>,
    pub local: Arc<dyn KeyValueStore>,
}

impl Stores {
    /// Two fresh in-memory namespaces.
    pub fn in_memory() -> Self {
        Self {
            sync: Arc::new(MemoryStore::new()),
            local: Arc::new(MemoryStore::new()),
        }
    }
}

/// Opens both namespaces for the configured backend.
///
/// # Errors
///
/// Returns [`StoreError::ConnectionError`] if the data directory cannot be
/// prepared or Redis is unreachable. There is no fallback: running against
/// a different store than configured would silently split settings.
pub async fn open_stores(config: &Config) -> StoreResult<Stores> {
    match config.storage_backend {
        StorageBackend::Memory => Ok(Stores::in_memory()),
        StorageBackend::File => {
            let sync = JsonFileStore::open(config.data_dir.join("settings.json")).await?;
            let local = JsonFileStore::open(config.data_dir.join("stats.json")).await?;
            Ok(Stores {
                sync: Arc::new(sync),
                local: Arc::new(local),
            })
        }
        StorageBackend::Redis => {
            let redis_url = config.redis_url.as_deref().ok_or_else(|| {
                StoreError::ConnectionError("Redis backend selected without REDIS_URL".to_string())
            })?;
            let sync = RedisStore::connect(redis_url, SYNC_NAMESPACE).await?;
            let local = RedisStore::connect(redis_url, LOCAL_NAMESPACE).await?;
            Ok(Stores {
                sync: Arc::new(sync),
                local: Arc::new(local),
            })
        }
    }
}
