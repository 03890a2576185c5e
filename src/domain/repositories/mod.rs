//! Repository trait definitions for the domain layer.
//!
//! Settings and statistics are persisted through these traits. Concrete
//! implementations live in `crate::infrastructure::persistence` and sit on
//! top of a generic key-value store.
//!
//! - [`SettingsRepository`] - Synced user settings
//! - [`StatsRepository`] - Append-only conversion log
//!
//! Mock implementations are auto-generated via `mockall` for unit tests.

pub mod settings_repository;
pub mod stats_repository;

pub use settings_repository::SettingsRepository;
pub use stats_repository::StatsRepository;

#[cfg(test)]
pub use settings_repository::MockSettingsRepository;
#[cfg(test)]
pub use stats_repository::MockStatsRepository;
