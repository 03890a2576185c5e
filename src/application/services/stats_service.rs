//! Conversion statistics service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::entities::{ConversionRecord, ConversionSummary};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

/// Service for reading, exporting and clearing the conversion log.
///
/// The rewriting core appends through the repository directly; this service
/// backs the options surface.
pub struct StatsService<R: StatsRepository> {
    repository: Arc<R>,
}

impl<R: StatsRepository> StatsService<R> {
    /// Creates a new statistics service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Appends a conversion stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on store failure.
    pub async fn record_conversion(
        &self,
        original_url: &str,
        affiliate_url: &str,
    ) -> Result<ConversionRecord, AppError> {
        let record = ConversionRecord::new(original_url, affiliate_url);
        self.repository.append_conversion(record.clone()).await?;
        Ok(record)
    }

    /// Returns the full log in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on store failure.
    pub async fn conversions(&self) -> Result<Vec<ConversionRecord>, AppError> {
        self.repository.list_conversions().await
    }

    /// Counts conversions in total, over the last day and over the last week.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on store failure.
    pub async fn summary(&self, now: DateTime<Utc>) -> Result<ConversionSummary, AppError> {
        let records = self.repository.list_conversions().await?;
        Ok(ConversionSummary::from_records(&records, now))
    }

    /// Serializes the log as a pretty-printed JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on store failure.
    pub async fn export_json(&self) -> Result<String, AppError> {
        let records = self.repository.list_conversions().await?;
        serde_json::to_string_pretty(&records).map_err(|e| {
            AppError::storage(
                "Failed to serialize conversions",
                json!({ "reason": e.to_string() }),
            )
        })
    }

    /// Drops every record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on store failure.
    pub async fn clear(&self) -> Result<(), AppError> {
        self.repository.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockStatsRepository;
    use chrono::Duration;

    #[tokio::test]
    async fn test_record_conversion() {
        let mut mock_repo = MockStatsRepository::new();
        mock_repo
            .expect_append_conversion()
            .withf(|r| r.original_url == "https://a" && r.affiliate_url == "https://b")
            .times(1)
            .returning(|_| Ok(()));

        let service = StatsService::new(Arc::new(mock_repo));
        let record = service.record_conversion("https://a", "https://b").await.unwrap();

        assert_eq!(record.affiliate_url, "https://b");
    }

    #[tokio::test]
    async fn test_summary_counts_windows() {
        let now = Utc::now();
        let records = vec![
            ConversionRecord::at(now - Duration::hours(1), "a", "b"),
            ConversionRecord::at(now - Duration::days(2), "a", "b"),
            ConversionRecord::at(now - Duration::days(10), "a", "b"),
        ];

        let mut mock_repo = MockStatsRepository::new();
        mock_repo
            .expect_list_conversions()
            .times(1)
            .returning(move || Ok(records.clone()));

        let service = StatsService::new(Arc::new(mock_repo));
        let summary = service.summary(now).await.unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.last_24h, 1);
        assert_eq!(summary.last_week, 2);
    }

    #[tokio::test]
    async fn test_export_json_is_array() {
        let mut mock_repo = MockStatsRepository::new();
        mock_repo.expect_list_conversions().times(1).returning(|| {
            Ok(vec![ConversionRecord::new(
                "https://amazon.com/gp/product/B07XYZ1234",
                "https://amazon.com/dp/B07XYZ1234?tag=gwf-20",
            )])
        });

        let service = StatsService::new(Arc::new(mock_repo));
        let exported = service.export_json().await.unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&exported).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
        assert_eq!(
            parsed[0]["affiliateUrl"],
            "https://amazon.com/dp/B07XYZ1234?tag=gwf-20"
        );
    }

    #[tokio::test]
    async fn test_export_empty_log() {
        let mut mock_repo = MockStatsRepository::new();
        mock_repo
            .expect_list_conversions()
            .returning(|| Ok(Vec::new()));

        let service = StatsService::new(Arc::new(mock_repo));
        assert_eq!(service.export_json().await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_storage_error_propagates() {
        let mut mock_repo = MockStatsRepository::new();
        mock_repo
            .expect_clear()
            .times(1)
            .returning(|| Err(AppError::storage("down", json!({}))));

        let service = StatsService::new(Arc::new(mock_repo));
        let result = service.clear().await;

        assert!(matches!(result, Err(AppError::Storage { .. })));
    }
}
