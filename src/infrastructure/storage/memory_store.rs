//! In-memory key-value store.

use super::service::{KeyValueStore, StoreResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// A store that keeps everything in a process-local map.
///
/// Contents are lost when the process exits.
///
/// # Use Cases
///
/// - Tests
/// - Ephemeral sessions (`STORAGE_BACKEND=memory`)
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        debug!("Using MemoryStore (nothing is persisted)");
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn set_many(&self, entries: Vec<(String, Value)>) -> StoreResult<()> {
        self.entries.write().await.extend(entries);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        self.entries.write().await.clear();
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_missing() {
        let store = MemoryStore::new();
        assert!(store.get("enabled").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();
        store.set("enabled", json!(false)).await.unwrap();
        assert_eq!(store.get("enabled").await.unwrap(), Some(json!(false)));

        store.remove("enabled").await.unwrap();
        assert!(store.get("enabled").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_many_and_clear() {
        let store = MemoryStore::new();
        store
            .set_many(vec![
                ("a".to_string(), json!(1)),
                ("b".to_string(), json!("two")),
            ])
            .await
            .unwrap();

        assert_eq!(store.get("b").await.unwrap(), Some(json!("two")));

        store.clear().await.unwrap();
        assert!(store.get("a").await.unwrap().is_none());
        assert!(store.health_check().await);
    }
}
