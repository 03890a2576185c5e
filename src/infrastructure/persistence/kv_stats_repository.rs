//! Key-value implementation of the statistics repository.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entities::{CONVERSIONS_KEY, ConversionRecord};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;
use crate::infrastructure::storage::KeyValueStore;

/// Conversion log stored as one JSON array under `conversions`.
///
/// Appends are read-modify-write cycles; an internal lock keeps appends from
/// the same process from overwriting each other.
pub struct KvStatsRepository {
    store: Arc<dyn KeyValueStore>,
    append_lock: Mutex<()>,
}

impl KvStatsRepository {
    /// Creates a new repository over `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            append_lock: Mutex::new(()),
        }
    }

    async fn read_log(&self) -> Result<Vec<ConversionRecord>, AppError> {
        match self.store.get(CONVERSIONS_KEY).await? {
            Some(value) => serde_json::from_value(value).map_err(|e| {
                AppError::storage(
                    "Malformed conversion log",
                    json!({ "reason": e.to_string() }),
                )
            }),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl StatsRepository for KvStatsRepository {
    async fn append_conversion(&self, record: ConversionRecord) -> Result<(), AppError> {
        let _guard = self.append_lock.lock().await;

        let mut log = self.read_log().await?;
        log.push(record);

        let value: Value = serde_json::to_value(&log).map_err(|e| {
            AppError::storage(
                "Failed to encode conversion log",
                json!({ "reason": e.to_string() }),
            )
        })?;
        self.store.set(CONVERSIONS_KEY, value).await?;
        Ok(())
    }

    async fn list_conversions(&self) -> Result<Vec<ConversionRecord>, AppError> {
        self.read_log().await
    }

    async fn clear(&self) -> Result<(), AppError> {
        let _guard = self.append_lock.lock().await;
        self.store.clear().await?;
        Ok(())
    }
}
