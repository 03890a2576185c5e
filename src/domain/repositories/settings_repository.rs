//! Repository trait for synced user settings.

use crate::domain::entities::{AffiliateTag, Settings};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the synced settings namespace.
///
/// The rewriting core only ever calls [`SettingsRepository::load`]; the write
/// methods belong to the options surface.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::KvSettingsRepository`] - Backed by any key-value store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Reads a settings snapshot, filling unset keys with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the store cannot be read or holds
    /// malformed values.
    async fn load(&self) -> Result<Settings, AppError>;

    /// Turns rewriting on or off.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on write failure.
    async fn set_enabled(&self, enabled: bool) -> Result<(), AppError>;

    /// Stores the selected charity together with its affiliate tag.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on write failure.
    async fn set_selected_charity(
        &self,
        charity_id: &str,
        affiliate_id: &AffiliateTag,
    ) -> Result<(), AppError>;
}
