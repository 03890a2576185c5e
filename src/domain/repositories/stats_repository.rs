//! Repository trait for the conversion log.

use crate::domain::entities::ConversionRecord;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the local statistics namespace.
///
/// The log is append-only from the core's point of view; only the options
/// surface reads or clears it.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::KvStatsRepository`] - Backed by any key-value store
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_stats.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Appends a record to the end of the log.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on read or write failure.
    async fn append_conversion(&self, record: ConversionRecord) -> Result<(), AppError>;

    /// Returns the full log in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on read failure or malformed data.
    async fn list_conversions(&self) -> Result<Vec<ConversionRecord>, AppError>;

    /// Drops every record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on write failure.
    async fn clear(&self) -> Result<(), AppError>;
}
