//! # Shop For Good
//!
//! Affiliate link rewriting engine. Storefront product URLs are rewritten to
//! carry the affiliate tag of a user-selected charity, both for whole-page
//! navigations and for product links embedded in pages.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Entities, ports and repository traits
//! - **Application Layer** ([`application`]) - Navigation interceptor, link scanner, mutation watcher
//! - **Infrastructure Layer** ([`infrastructure`]) - Key-value stores, repositories, document and tab adapters
//! - **Utilities** ([`utils`]) - Pure identifier extraction, domain matching and URL rewriting
//!
//! ## Quick Start
//!
//! ```bash
//! export STORAGE_BACKEND="file"
//! echo '{"url":"https://amazon.com/gp/product/B07XYZ1234","tabId":1}' | cargo run
//! ```
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod runtime;
pub mod utils;

pub use error::AppError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        AnchorRewriteMode, InterceptOutcome, LinkScanner, MutationWatcher, NavigationInterceptor,
        SettingsService, StatsService,
    };
    pub use crate::domain::entities::{AffiliateTag, ConversionRecord, Settings};
    pub use crate::domain::navigation_event::{NavigationEvent, RedirectCommand, TabId};
    pub use crate::error::AppError;
    pub use crate::infrastructure::storage::Stores;
}
