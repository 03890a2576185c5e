//! Application error taxonomy.
//!
//! Every failure the rewriting core can hit falls into one of a few buckets.
//! None of them are fatal: handlers catch them at their boundary, log them and
//! fall back to the least destructive outcome (unchanged URL, skipped element,
//! no redirect).

use serde_json::{Value, json};

use crate::infrastructure::storage::StoreError;
use crate::utils::url_rewriter::RewriteError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or unsupported URL.
    #[error("parse error: {message}")]
    Parse { message: String, details: Value },

    /// Settings or statistics store read/write failure.
    #[error("storage error: {message}")]
    Storage { message: String, details: Value },

    /// Unexpected element shape while touching the document.
    #[error("DOM mutation error: {message}")]
    DomMutation { message: String, details: Value },

    /// Lookup of a catalog entry (e.g. a charity) that does not exist.
    #[error("not found: {message}")]
    NotFound { message: String, details: Value },

    /// The host side of a port (e.g. the tab redirect channel) is gone or full.
    #[error("unavailable: {message}")]
    Unavailable { message: String, details: Value },
}

impl AppError {
    pub fn parse(message: impl Into<String>, details: Value) -> Self {
        Self::Parse {
            message: message.into(),
            details,
        }
    }
    pub fn storage(message: impl Into<String>, details: Value) -> Self {
        Self::Storage {
            message: message.into(),
            details,
        }
    }
    pub fn dom_mutation(message: impl Into<String>, details: Value) -> Self {
        Self::DomMutation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable code, used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Parse { .. } => "parse_error",
            AppError::Storage { .. } => "storage_error",
            AppError::DomMutation { .. } => "dom_mutation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Unavailable { .. } => "unavailable",
        }
    }

    pub fn details(&self) -> &Value {
        match self {
            AppError::Parse { details, .. }
            | AppError::Storage { details, .. }
            | AppError::DomMutation { details, .. }
            | AppError::NotFound { details, .. }
            | AppError::Unavailable { details, .. } => details,
        }
    }
}

impl From<RewriteError> for AppError {
    fn from(e: RewriteError) -> Self {
        AppError::parse("Failed to rewrite URL", json!({ "reason": e.to_string() }))
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        map_store_error(e)
    }
}

pub fn map_store_error(e: StoreError) -> AppError {
    match e {
        StoreError::ConnectionError(reason) => {
            AppError::storage("Store unavailable", json!({ "reason": reason }))
        }
        StoreError::OperationError(reason) => {
            AppError::storage("Store operation failed", json!({ "reason": reason }))
        }
        StoreError::SerializationError(reason) => {
            AppError::storage("Stored value is malformed", json!({ "reason": reason }))
        }
    }
}
