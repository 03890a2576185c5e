//! Product identifier and affiliate tag value types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppError;

/// Fallback affiliate tag used when the user never picked one.
pub const DEFAULT_AFFILIATE_ID: &str = "shopforgood-20";

/// Length of a storefront product code.
pub const PRODUCT_ID_LENGTH: usize = 10;

/// A storefront's canonical product code (`^[A-Z0-9]{10}$`).
///
/// Normally obtained from [`crate::utils::product_id::extract_product_id`];
/// the checked [`TryFrom`] conversion exists for values read back from
/// storage or typed by a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductIdentifier(String);

impl ProductIdentifier {
    /// Wraps a code that the caller has already matched against the pattern.
    pub(crate) fn new_unchecked(code: &str) -> Self {
        Self(code.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ProductIdentifier {
    type Error = AppError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let valid = value.len() == PRODUCT_ID_LENGTH
            && value
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());

        if !valid {
            return Err(AppError::parse(
                "Product identifier must be 10 uppercase alphanumeric characters",
                json!({ "value": value }),
            ));
        }

        Ok(Self(value.to_string()))
    }
}

impl fmt::Display for ProductIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The referral value written into the `tag` query parameter.
///
/// Never empty and never contains whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AffiliateTag(String);

impl AffiliateTag {
    /// Validates and wraps a user-configured tag.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Parse`] if the tag is empty or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, AppError> {
        let value = value.into();

        if value.is_empty() || value.chars().any(char::is_whitespace) {
            return Err(AppError::parse(
                "Affiliate tag must be non-empty and contain no whitespace",
                json!({ "value": value }),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AffiliateTag {
    fn default() -> Self {
        Self(DEFAULT_AFFILIATE_ID.to_string())
    }
}

impl TryFrom<String> for AffiliateTag {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AffiliateTag> for String {
    fn from(tag: AffiliateTag) -> Self {
        tag.0
    }
}

impl fmt::Display for AffiliateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
