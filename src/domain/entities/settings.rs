//! User settings snapshot.

use super::charity::DEFAULT_CHARITY_ID;
use super::product::AffiliateTag;

pub const ENABLED_KEY: &str = "enabled";
pub const AFFILIATE_ID_KEY: &str = "affiliateId";
pub const SELECTED_CHARITY_KEY: &str = "selectedCharityId";

/// A point-in-time read of the synced settings.
///
/// Handlers fetch one snapshot per activation and pass it along explicitly,
/// so a concurrent write from the options surface is only observed by the
/// next activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub enabled: bool,
    pub affiliate_id: AffiliateTag,
    pub selected_charity_id: String,
}

impl Settings {
    /// Defaults for an empty store, using `fallback` as the affiliate tag.
    pub fn with_fallback(fallback: AffiliateTag) -> Self {
        Self {
            enabled: true,
            affiliate_id: fallback,
            selected_charity_id: DEFAULT_CHARITY_ID.to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_fallback(AffiliateTag::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert!(settings.enabled);
        assert_eq!(settings.affiliate_id.as_str(), "shopforgood-20");
        assert_eq!(settings.selected_charity_id, "charity1");
    }

    #[test]
    fn test_settings_with_fallback() {
        let settings = Settings::with_fallback(AffiliateTag::new("custom-21").unwrap());
        assert_eq!(settings.affiliate_id.as_str(), "custom-21");
    }
}
