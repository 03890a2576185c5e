//! Conversion log entries and their aggregate counts.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Statistics store key holding the ordered conversion log.
pub const CONVERSIONS_KEY: &str = "conversions";

/// One successful whole-page rewrite.
///
/// Appended to the conversion log after a tab redirect has been issued.
/// Records are never mutated or deduplicated once written.
///
/// Serialized as `{ "timestamp": <epoch ms>, "originalUrl": .., "affiliateUrl": .. }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRecord {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub original_url: String,
    pub affiliate_url: String,
}

impl ConversionRecord {
    /// Creates a record stamped with the current time.
    pub fn new(original_url: impl Into<String>, affiliate_url: impl Into<String>) -> Self {
        Self::at(Utc::now(), original_url, affiliate_url)
    }

    /// Creates a record with an explicit timestamp.
    pub fn at(
        timestamp: DateTime<Utc>,
        original_url: impl Into<String>,
        affiliate_url: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            original_url: original_url.into(),
            affiliate_url: affiliate_url.into(),
        }
    }
}

/// Simple count aggregation over the conversion log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionSummary {
    pub total: usize,
    pub last_24h: usize,
    pub last_week: usize,
}

impl ConversionSummary {
    /// Counts records relative to `now`.
    ///
    /// A record falls into a window when its age is strictly less than the
    /// window length. Records stamped in the future count as recent.
    pub fn from_records(records: &[ConversionRecord], now: DateTime<Utc>) -> Self {
        let day = Duration::hours(24);
        let week = Duration::days(7);

        let younger_than = |window: Duration| {
            records
                .iter()
                .filter(|r| now.signed_duration_since(r.timestamp) < window)
                .count()
        };

        Self {
            total: records.len(),
            last_24h: younger_than(day),
            last_week: younger_than(week),
        }
    }
}
