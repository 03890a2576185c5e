//! Redis-backed key-value store.

use super::service::{KeyValueStore, StoreError, StoreResult};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use serde_json::Value;
use tracing::{debug, error, info};

/// Keeps one namespace as a Redis hash.
///
/// Each key is a hash field holding a JSON string, so clearing the namespace
/// is a single `DEL`. Uses `ConnectionManager` for automatic reconnection.
pub struct RedisStore {
    client: ConnectionManager,
    hash_key: String,
}

impl RedisStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `namespace` - Storage area name, e.g. `"sync"` or `"local"`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, namespace: &str) -> StoreResult<Self> {
        info!("Connecting to Redis store '{}'", namespace);

        let client = Client::open(redis_url).map_err(|e| {
            StoreError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            StoreError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis store '{}'", namespace);

        Ok(Self {
            client: manager,
            hash_key: format!("shopforgood:{}", namespace),
        })
    }

    fn encode(value: &Value) -> StoreResult<String> {
        serde_json::to_string(value).map_err(|e| StoreError::SerializationError(e.to_string()))
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let mut conn = self.client.clone();

        let raw = conn
            .hget::<_, _, Option<String>>(&self.hash_key, key)
            .await
            .map_err(|e| {
                error!("Redis HGET error for {}: {}", key, e);
                StoreError::OperationError(e.to_string())
            })?;

        match raw {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StoreError::SerializationError(format!("{}: {}", key, e))),
            None => {
                debug!("Redis store MISS: {}", key);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        let encoded = Self::encode(&value)?;
        let mut conn = self.client.clone();

        conn.hset::<_, _, _, ()>(&self.hash_key, key, encoded)
            .await
            .map_err(|e| {
                error!("Redis HSET error for {}: {}", key, e);
                StoreError::OperationError(e.to_string())
            })
    }

    async fn set_many(&self, entries: Vec<(String, Value)>) -> StoreResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let encoded = entries
            .iter()
            .map(|(k, v)| Self::encode(v).map(|s| (k.clone(), s)))
            .collect::<StoreResult<Vec<(String, String)>>>()?;
        let mut conn = self.client.clone();

        conn.hset_multiple::<_, _, _, ()>(&self.hash_key, &encoded[..])
            .await
            .map_err(|e| {
                error!("Redis HSET (multiple) error: {}", e);
                StoreError::OperationError(e.to_string())
            })
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let mut conn = self.client.clone();

        conn.hdel::<_, _, ()>(&self.hash_key, key)
            .await
            .map_err(|e| StoreError::OperationError(e.to_string()))
    }

    async fn clear(&self) -> StoreResult<()> {
        let mut conn = self.client.clone();

        conn.del::<_, ()>(&self.hash_key)
            .await
            .map_err(|e| StoreError::OperationError(e.to_string()))
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
