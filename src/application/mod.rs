//! Application layer services implementing the rewriting behavior.
//!
//! Services consume repository and port traits from the domain layer and
//! never touch a concrete store, document or tab API directly.
//!
//! # Available Services
//!
//! - [`services::navigation_interceptor::NavigationInterceptor`] - Whole-page redirects
//! - [`services::link_scanner::LinkScanner`] - In-page anchor rewriting
//! - [`services::mutation_watcher::MutationWatcher`] - Rescans inserted subtrees
//! - [`services::settings_service::SettingsService`] - Enable toggle and charity selection
//! - [`services::stats_service::StatsService`] - Conversion log queries and export

pub mod services;
