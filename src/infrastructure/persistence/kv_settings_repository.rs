//! Key-value implementation of the settings repository.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::domain::entities::{
    AFFILIATE_ID_KEY, AffiliateTag, ENABLED_KEY, SELECTED_CHARITY_KEY, Settings,
};
use crate::domain::repositories::SettingsRepository;
use crate::error::AppError;
use crate::infrastructure::storage::KeyValueStore;

/// Settings stored as individual keys in the synced namespace.
///
/// Unset keys fall back to defaults; the affiliate fallback is injected so it
/// can follow configuration.
pub struct KvSettingsRepository {
    store: Arc<dyn KeyValueStore>,
    fallback_tag: AffiliateTag,
}

impl KvSettingsRepository {
    /// Creates a new repository over `store`.
    pub fn new(store: Arc<dyn KeyValueStore>, fallback_tag: AffiliateTag) -> Self {
        Self {
            store,
            fallback_tag,
        }
    }

    async fn read(&self, key: &str) -> Result<Option<Value>, AppError> {
        Ok(self.store.get(key).await?)
    }
}

fn malformed(key: &str, value: &Value) -> AppError {
    AppError::storage(
        "Malformed settings value",
        json!({ "key": key, "value": value }),
    )
}

#[async_trait]
impl SettingsRepository for KvSettingsRepository {
    async fn load(&self) -> Result<Settings, AppError> {
        let mut settings = Settings::with_fallback(self.fallback_tag.clone());

        if let Some(value) = self.read(ENABLED_KEY).await? {
            settings.enabled = value
                .as_bool()
                .ok_or_else(|| malformed(ENABLED_KEY, &value))?;
        }

        if let Some(value) = self.read(AFFILIATE_ID_KEY).await? {
            settings.affiliate_id = value
                .as_str()
                .and_then(|s| AffiliateTag::new(s).ok())
                .ok_or_else(|| malformed(AFFILIATE_ID_KEY, &value))?;
        }

        if let Some(value) = self.read(SELECTED_CHARITY_KEY).await? {
            settings.selected_charity_id = value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| malformed(SELECTED_CHARITY_KEY, &value))?;
        }

        Ok(settings)
    }

    async fn set_enabled(&self, enabled: bool) -> Result<(), AppError> {
        self.store.set(ENABLED_KEY, Value::Bool(enabled)).await?;
        Ok(())
    }

    async fn set_selected_charity(
        &self,
        charity_id: &str,
        affiliate_id: &AffiliateTag,
    ) -> Result<(), AppError> {
        self.store
            .set_many(vec![
                (SELECTED_CHARITY_KEY.to_string(), json!(charity_id)),
                (AFFILIATE_ID_KEY.to_string(), json!(affiliate_id.as_str())),
            ])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::MemoryStore;

    fn repo_with_store() -> (KvSettingsRepository, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let repo = KvSettingsRepository::new(store.clone(), AffiliateTag::default());
        (repo, store)
    }

    #[tokio::test]
    async fn test_load_defaults_from_empty_store() {
        let (repo, _) = repo_with_store();
        let settings = repo.load().await.unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn test_load_uses_configured_fallback() {
        let store = Arc::new(MemoryStore::new());
        let repo = KvSettingsRepository::new(store, AffiliateTag::new("fallback-21").unwrap());

        let settings = repo.load().await.unwrap();
        assert_eq!(settings.affiliate_id.as_str(), "fallback-21");
    }

    #[tokio::test]
    async fn test_set_enabled_roundtrip() {
        let (repo, store) = repo_with_store();
        repo.set_enabled(false).await.unwrap();

        assert_eq!(store.get(ENABLED_KEY).await.unwrap(), Some(json!(false)));
        assert!(!repo.load().await.unwrap().enabled);
    }

    #[tokio::test]
    async fn test_set_selected_charity_writes_both_keys() {
        let (repo, store) = repo_with_store();
        repo.set_selected_charity("charity3", &AffiliateTag::new("food-20").unwrap())
            .await
            .unwrap();

        assert_eq!(
            store.get(SELECTED_CHARITY_KEY).await.unwrap(),
            Some(json!("charity3"))
        );
        let settings = repo.load().await.unwrap();
        assert_eq!(settings.affiliate_id.as_str(), "food-20");
        assert_eq!(settings.selected_charity_id, "charity3");
    }

    #[tokio::test]
    async fn test_malformed_value_is_storage_error() {
        let (repo, store) = repo_with_store();
        store.set(ENABLED_KEY, json!("yes")).await.unwrap();

        let result = repo.load().await;
        assert!(matches!(result, Err(AppError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_empty_affiliate_id_is_storage_error() {
        let (repo, store) = repo_with_store();
        store.set(AFFILIATE_ID_KEY, json!("")).await.unwrap();

        assert!(repo.load().await.is_err());
    }
}
