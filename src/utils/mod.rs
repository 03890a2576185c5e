//! Pure URL helpers shared by every rewrite path.
//!
//! - [`product_id`] - Product identifier extraction
//! - [`domain_matcher`] - Supported storefront detection
//! - [`url_rewriter`] - Canonical and in-place affiliate rewriting

pub mod domain_matcher;
pub mod product_id;
pub mod url_rewriter;
