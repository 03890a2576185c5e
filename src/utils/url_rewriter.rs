//! Affiliate URL rewriting.
//!
//! Two rewrite shapes exist:
//!
//! - [`rewrite_url`] canonicalizes a whole-page URL to
//!   `https://<host>/dp/<id>?tag=<tag>`, dropping every other query parameter.
//! - [`retag_in_place`] keeps the URL as-is and only sets the `tag` parameter.
//!   In-page anchors use it by default.

use tracing::debug;
use url::Url;

use crate::domain::entities::AffiliateTag;
use crate::utils::domain_matcher::is_supported_host;
use crate::utils::product_id::extract_from_path;

/// Query parameter carrying the affiliate tag.
pub const TAG_PARAM: &str = "tag";

/// Errors that can occur while rewriting a URL.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,

    #[error("Failed to build rewritten URL: {0}")]
    RewriteFailed(String),
}

/// Outcome of a rewrite attempt.
///
/// `Rewritten` is only produced for a supported storefront URL carrying a
/// product identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteResult {
    Unchanged(String),
    Rewritten(String),
}

impl RewriteResult {
    pub fn is_rewritten(&self) -> bool {
        matches!(self, RewriteResult::Rewritten(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            RewriteResult::Unchanged(url) | RewriteResult::Rewritten(url) => url,
        }
    }

    pub fn into_url(self) -> String {
        match self {
            RewriteResult::Unchanged(url) | RewriteResult::Rewritten(url) => url,
        }
    }
}

fn parse_http_url(input: &str) -> Result<Url, RewriteError> {
    let url = Url::parse(input).map_err(|e| RewriteError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(RewriteError::UnsupportedProtocol),
    }
}

/// Rewrites a storefront product URL into its canonical affiliate form.
///
/// # Rules
///
/// 1. **Protocol**: forced to HTTPS
/// 2. **Host**: preserved (port dropped)
/// 3. **Path**: replaced by `/dp/<identifier>`
/// 4. **Query**: replaced by a single `tag=<affiliate tag>`
/// 5. **Fragment**: dropped
///
/// URLs on unsupported hosts, or without an identifier, come back as
/// [`RewriteResult::Unchanged`]. Applying the function to its own output with
/// the same tag yields the same output.
///
/// # Errors
///
/// Returns [`RewriteError::InvalidFormat`] for malformed URLs,
/// [`RewriteError::UnsupportedProtocol`] for non-HTTP(S) schemes and
/// [`RewriteError::MissingHost`] for host-less URLs.
///
/// # Examples
///
/// ```ignore
/// let tag = AffiliateTag::new("shopforgood-20").unwrap();
/// let result = rewrite_url("https://amazon.com/gp/product/B07XYZ1234?ref=abc&tag=old-20", &tag).unwrap();
/// assert_eq!(
///     result,
///     RewriteResult::Rewritten("https://amazon.com/dp/B07XYZ1234?tag=shopforgood-20".to_string())
/// );
/// ```
pub fn rewrite_url(input: &str, tag: &AffiliateTag) -> Result<RewriteResult, RewriteError> {
    let url = parse_http_url(input)?;
    let host = url.host_str().ok_or(RewriteError::MissingHost)?;

    if !is_supported_host(host) {
        return Ok(RewriteResult::Unchanged(input.to_string()));
    }

    let Some(product_id) = extract_from_path(url.path()) else {
        return Ok(RewriteResult::Unchanged(input.to_string()));
    };

    let mut rewritten = Url::parse(&format!("https://{host}"))
        .map_err(|e| RewriteError::RewriteFailed(e.to_string()))?;
    rewritten.set_path(&format!("/dp/{product_id}"));
    rewritten
        .query_pairs_mut()
        .append_pair(TAG_PARAM, tag.as_str());

    Ok(RewriteResult::Rewritten(rewritten.to_string()))
}

/// Infallible wrapper around [`rewrite_url`]: any error yields the input unchanged.
pub fn rewrite_or_unchanged(input: &str, tag: &AffiliateTag) -> RewriteResult {
    rewrite_url(input, tag).unwrap_or_else(|e| {
        debug!(url = %input, error = %e, "URL left unchanged");
        RewriteResult::Unchanged(input.to_string())
    })
}

/// Sets the `tag` query parameter on `input`, leaving everything else in place.
///
/// An existing `tag` keeps its position and gets the new value; duplicate
/// `tag` pairs are removed. Without one, `tag` is appended.
///
/// # Errors
///
/// Returns [`RewriteError::InvalidFormat`] or [`RewriteError::UnsupportedProtocol`]
/// when `input` is not an HTTP(S) URL.
pub fn retag_in_place(input: &str, tag: &AffiliateTag) -> Result<String, RewriteError> {
    let mut url = parse_http_url(input)?;

    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut replaced = false;
    for (key, value) in url.query_pairs().into_owned() {
        if key != TAG_PARAM {
            pairs.push((key, value));
        } else if !replaced {
            pairs.push((key, tag.to_string()));
            replaced = true;
        }
    }
    if !replaced {
        pairs.push((TAG_PARAM.to_string(), tag.to_string()));
    }

    url.query_pairs_mut().clear().extend_pairs(pairs.iter());

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(value: &str) -> AffiliateTag {
        AffiliateTag::new(value).unwrap()
    }

    #[test]
    fn test_rewrite_gp_product_example() {
        let result = rewrite_url(
            "https://amazon.com/gp/product/B07XYZ1234?ref=abc&tag=old-20",
            &tag("shopforgood-20"),
        )
        .unwrap();

        assert_eq!(
            result,
            RewriteResult::Rewritten(
                "https://amazon.com/dp/B07XYZ1234?tag=shopforgood-20".to_string()
            )
        );
    }

    #[test]
    fn test_rewrite_no_identifier_unchanged() {
        let result = rewrite_url("https://amazon.com/some/page", &tag("gwf-20")).unwrap();
        assert_eq!(
            result,
            RewriteResult::Unchanged("https://amazon.com/some/page".to_string())
        );
    }

    #[test]
    fn test_rewrite_forces_https_and_drops_port_and_fragment() {
        let result = rewrite_url(
            "http://www.amazon.de:8080/Buch/dp/3453317823/ref=sr_1?keywords=x#reviews",
            &tag("edu-20"),
        )
        .unwrap();

        assert_eq!(result.as_str(), "https://www.amazon.de/dp/3453317823?tag=edu-20");
    }

    #[test]
    fn test_rewrite_unsupported_domain_unchanged() {
        let input = "https://notamazon.com/dp/B000123456";
        let result = rewrite_url(input, &tag("gwf-20")).unwrap();
        assert_eq!(result, RewriteResult::Unchanged(input.to_string()));
    }

    #[test]
    fn test_rewrite_is_fixed_point() {
        let t = tag("food-20");
        let first = rewrite_url("https://www.amazon.ca/x/dp/B0ABCDEF12?th=1", &t)
            .unwrap()
            .into_url();
        let second = rewrite_url(&first, &t).unwrap();

        assert!(second.is_rewritten());
        assert_eq!(second.as_str(), first);
    }

    #[test]
    fn test_rewrite_encodes_tag() {
        let result = rewrite_url("https://amazon.com/dp/B000123456", &tag("a&b=c")).unwrap();
        assert_eq!(result.as_str(), "https://amazon.com/dp/B000123456?tag=a%26b%3Dc");
    }

    #[test]
    fn test_rewrite_invalid_url() {
        let result = rewrite_url("not a url", &tag("gwf-20"));
        assert!(matches!(result, Err(RewriteError::InvalidFormat(_))));
    }

    #[test]
    fn test_rewrite_unsupported_protocol() {
        let result = rewrite_url("ftp://amazon.com/dp/B000123456", &tag("gwf-20"));
        assert!(matches!(result, Err(RewriteError::UnsupportedProtocol)));
    }

    #[test]
    fn test_rewrite_or_unchanged_swallows_errors() {
        let result = rewrite_or_unchanged("javascript:alert(1)", &tag("gwf-20"));
        assert_eq!(
            result,
            RewriteResult::Unchanged("javascript:alert(1)".to_string())
        );
    }

    #[test]
    fn test_retag_appends_tag() {
        let result = retag_in_place(
            "https://www.amazon.de/Some-Name/dp/B111111111?ref=x",
            &tag("gwf-20"),
        )
        .unwrap();
        assert_eq!(
            result,
            "https://www.amazon.de/Some-Name/dp/B111111111?ref=x&tag=gwf-20"
        );
    }

    #[test]
    fn test_retag_overwrites_in_position() {
        let result = retag_in_place(
            "https://amazon.com/dp/B000123456?tag=old-20&ref=x&tag=older-21",
            &tag("edu-20"),
        )
        .unwrap();
        assert_eq!(result, "https://amazon.com/dp/B000123456?tag=edu-20&ref=x");
    }

    #[test]
    fn test_retag_keeps_fragment_and_scheme() {
        let result = retag_in_place("http://amazon.com/dp/B000123456#top", &tag("edu-20")).unwrap();
        assert_eq!(result, "http://amazon.com/dp/B000123456?tag=edu-20#top");
    }

    #[test]
    fn test_retag_rejects_non_http() {
        assert!(retag_in_place("mailto:someone@amazon.com", &tag("edu-20")).is_err());
    }
}
