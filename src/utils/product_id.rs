//! Product identifier extraction from storefront URLs.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::domain::entities::ProductIdentifier;

static DP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/dp/([A-Z0-9]{10})").expect("valid /dp/ pattern"));

static GP_PRODUCT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/gp/product/([A-Z0-9]{10})").expect("valid /gp/product/ pattern")
});

/// Extracts the product identifier from a URL.
///
/// Recognized path shapes:
///
/// - `/dp/<ID>`
/// - `/gp/product/<ID>`
///
/// where `<ID>` is 10 uppercase alphanumeric characters. `/dp/` wins when both
/// shapes are present. Only the path is inspected, so an identifier-looking
/// segment inside the query string is ignored.
///
/// Returns `None` for unparsable input instead of failing.
///
/// # Examples
///
/// ```ignore
/// let id = extract_product_id("https://amazon.com/gp/product/B07XYZ1234?ref=abc").unwrap();
/// assert_eq!(id.as_str(), "B07XYZ1234");
///
/// assert!(extract_product_id("https://amazon.com/dp/b07xyz1234").is_none());
/// ```
pub fn extract_product_id(url: &str) -> Option<ProductIdentifier> {
    let parsed = Url::parse(url).ok()?;
    extract_from_path(parsed.path())
}

/// Same as [`extract_product_id`] for an already-parsed path.
pub fn extract_from_path(path: &str) -> Option<ProductIdentifier> {
    DP_PATTERN
        .captures(path)
        .or_else(|| GP_PRODUCT_PATTERN.captures(path))
        .and_then(|caps| caps.get(1))
        .map(|m| ProductIdentifier::new_unchecked(m.as_str()))
}

/// Whether the path has one of the product path prefixes, regardless of
/// whether a well-formed identifier follows.
pub fn has_product_path(path: &str) -> bool {
    path.contains("/dp/") || path.contains("/gp/product/")
}
