//! Repository implementations on top of the key-value stores.
//!
//! # Repositories
//!
//! - [`KvSettingsRepository`] - Synced settings, one key per field
//! - [`KvStatsRepository`] - Conversion log as a single JSON array

pub mod kv_settings_repository;
pub mod kv_stats_repository;

pub use kv_settings_repository::KvSettingsRepository;
pub use kv_stats_repository::KvStatsRepository;
