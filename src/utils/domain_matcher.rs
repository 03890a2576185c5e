//! Supported storefront detection.

use url::Url;

/// Storefront hosts whose product URLs are rewritten.
pub const SUPPORTED_DOMAINS: &[&str] = &[
    "amazon.com",
    "amazon.co.uk",
    "amazon.de",
    "amazon.fr",
    "amazon.it",
    "amazon.es",
    "amazon.ca",
];

/// Host label that marks a storefront link inside a page.
const STOREFRONT_LABEL: &str = "amazon";

/// Whether the URL's host belongs to a supported storefront.
///
/// Only the host is inspected. A supported domain appearing in the path or
/// query never matches, and neither does a look-alike host such as
/// `notamazon.com`. Unparsable input is not supported.
pub fn is_supported_url(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(is_supported_host))
        .unwrap_or(false)
}

/// Exact or label-boundary suffix match of `host` against [`SUPPORTED_DOMAINS`].
pub fn is_supported_host(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();

    SUPPORTED_DOMAINS.iter().any(|domain| {
        host == *domain
            || host
                .strip_suffix(domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// Looser check used for in-page anchors: any host label equal to `amazon`.
///
/// Accepts regional storefronts outside [`SUPPORTED_DOMAINS`]
/// (e.g. `amazon.com.au`) while still rejecting `notamazon.com`.
pub fn has_storefront_marker(host: &str) -> bool {
    host.trim_end_matches('.')
        .split('.')
        .any(|label| label.eq_ignore_ascii_case(STOREFRONT_LABEL))
}
