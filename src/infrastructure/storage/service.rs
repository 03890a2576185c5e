//! Key-value store trait and error types.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// Errors that can occur during store operations.
#[derive(Debug)]
pub enum StoreError {
    ConnectionError(String),
    OperationError(String),
    SerializationError(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Store connection error: {}", e),
            Self::OperationError(e) => write!(f, "Store operation error: {}", e),
            Self::SerializationError(e) => write!(f, "Store serialization error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A namespace of JSON values addressed by string keys.
///
/// Mirrors the browser extension storage areas: one instance backs the synced
/// settings, another the local statistics. Unlike a cache, errors are returned
/// to the caller; the repositories map them to [`crate::error::AppError::Storage`]
/// and the handlers decide how to degrade.
///
/// # Implementations
///
/// - [`crate::infrastructure::storage::MemoryStore`] - Process-local map
/// - [`crate::infrastructure::storage::JsonFileStore`] - One JSON file per namespace
/// - [`crate::infrastructure::storage::RedisStore`] - One Redis hash per namespace
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` if the key is set
    /// - `Ok(None)` if it is not
    async fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Value) -> StoreResult<()>;

    /// Stores several entries in one operation.
    ///
    /// Used when keys must change together (e.g. selected charity and its tag).
    async fn set_many(&self, entries: Vec<(String, Value)>) -> StoreResult<()>;

    /// Removes `key` if present.
    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// Removes every key in the namespace.
    async fn clear(&self) -> StoreResult<()>;

    /// Checks if the backend is reachable.
    async fn health_check(&self) -> bool;
}
