//! Settings and charity selection for the options surface.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::domain::entities::{AffiliateTag, CHARITIES, Charity, Settings, find_charity};
use crate::domain::repositories::SettingsRepository;
use crate::error::AppError;

/// Service for reading and changing the synced settings.
pub struct SettingsService<R: SettingsRepository> {
    repository: Arc<R>,
}

impl<R: SettingsRepository> SettingsService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Reads the current settings snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on store failure.
    pub async fn snapshot(&self) -> Result<Settings, AppError> {
        self.repository.load().await
    }

    /// Turns rewriting on or off.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on store failure.
    pub async fn set_enabled(&self, enabled: bool) -> Result<(), AppError> {
        self.repository.set_enabled(enabled).await?;
        info!(enabled, "Rewriting toggled");
        Ok(())
    }

    pub fn list_charities(&self) -> &'static [Charity] {
        CHARITIES
    }

    /// Selects a charity and makes its tag the active affiliate id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an id outside the catalog.
    /// Returns [`AppError::Storage`] on store failure.
    pub async fn select_charity(&self, charity_id: &str) -> Result<&'static Charity, AppError> {
        let charity = find_charity(charity_id).ok_or_else(|| {
            AppError::not_found("Charity not found", json!({ "charity_id": charity_id }))
        })?;
        let tag = AffiliateTag::new(charity.affiliate_id)?;

        self.repository.set_selected_charity(charity.id, &tag).await?;
        info!(charity = charity.id, affiliate_id = %tag, "Charity selected");

        Ok(charity)
    }

    /// Resolves the currently selected charity, if it is still in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on store failure.
    pub async fn selected_charity(&self) -> Result<Option<&'static Charity>, AppError> {
        let settings = self.repository.load().await?;
        Ok(find_charity(&settings.selected_charity_id))
    }
}
