mod common;

use std::sync::Arc;

use serde_json::json;
use shop_for_good::AppError;
use shop_for_good::domain::entities::{AffiliateTag, Settings};
use shop_for_good::domain::repositories::SettingsRepository;
use shop_for_good::infrastructure::persistence::KvSettingsRepository;
use shop_for_good::infrastructure::storage::{JsonFileStore, KeyValueStore, MemoryStore};

#[tokio::test]
async fn test_select_charity_persists_to_file() {
    let path = common::temp_data_dir("settings-file").join("settings.json");
    let _ = tokio::fs::remove_file(&path).await;

    {
        let store = JsonFileStore::open(path.clone()).await.unwrap();
        let repo = KvSettingsRepository::new(Arc::new(store), AffiliateTag::default());
        repo.set_selected_charity("charity3", &AffiliateTag::new("food-20").unwrap())
            .await
            .unwrap();
        repo.set_enabled(false).await.unwrap();
    }

    let store = JsonFileStore::open(path.clone()).await.unwrap();
    let repo = KvSettingsRepository::new(Arc::new(store), AffiliateTag::default());
    let settings = repo.load().await.unwrap();

    assert!(!settings.enabled);
    assert_eq!(settings.selected_charity_id, "charity3");
    assert_eq!(settings.affiliate_id.as_str(), "food-20");

    common::remove_data_dir("settings-file").await;
}

#[tokio::test]
async fn test_empty_store_reads_defaults() {
    let repo = KvSettingsRepository::new(Arc::new(MemoryStore::new()), AffiliateTag::default());
    assert_eq!(repo.load().await.unwrap(), Settings::default());
}

#[tokio::test]
async fn test_malformed_value_is_storage_error() {
    let store = Arc::new(MemoryStore::new());
    store.set("enabled", json!("yes")).await.unwrap();

    let repo = KvSettingsRepository::new(store, AffiliateTag::default());
    let result = repo.load().await;

    assert!(matches!(result, Err(AppError::Storage { .. })));
}
