#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use shop_for_good::application::services::{AnchorRewriteMode, SettingsService, StatsService};
use shop_for_good::config::{Config, StorageBackend};
use shop_for_good::domain::entities::AffiliateTag;
use shop_for_good::infrastructure::persistence::{KvSettingsRepository, KvStatsRepository};
use shop_for_good::infrastructure::storage::Stores;

pub const PRODUCT_URL: &str = "https://amazon.com/gp/product/B07XYZ1234?ref=abc&tag=old-20";
pub const CANONICAL_URL: &str = "https://amazon.com/dp/B07XYZ1234?tag=shopforgood-20";

pub fn test_config() -> Config {
    Config {
        storage_backend: StorageBackend::Memory,
        data_dir: PathBuf::from("./data"),
        redis_url: None,
        default_affiliate_id: AffiliateTag::default(),
        anchor_rewrite_mode: AnchorRewriteMode::Preserve,
        event_queue_capacity: 16,
        log_level: "info".to_string(),
        log_format: "text".to_string(),
    }
}

pub fn settings_repository(stores: &Stores) -> Arc<KvSettingsRepository> {
    Arc::new(KvSettingsRepository::new(
        stores.sync.clone(),
        AffiliateTag::default(),
    ))
}

pub fn stats_repository(stores: &Stores) -> Arc<KvStatsRepository> {
    Arc::new(KvStatsRepository::new(stores.local.clone()))
}

pub fn settings_service(stores: &Stores) -> SettingsService<KvSettingsRepository> {
    SettingsService::new(settings_repository(stores))
}

pub fn stats_service(stores: &Stores) -> StatsService<KvStatsRepository> {
    StatsService::new(stats_repository(stores))
}

/// Fresh per-test directory under the system temp dir.
pub fn temp_data_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("shop-for-good-it-{}-{}", std::process::id(), name))
}

/// Removes a directory created by [`temp_data_dir`].
pub async fn remove_data_dir(name: &str) {
    let _ = tokio::fs::remove_dir_all(temp_data_dir(name)).await;
}
