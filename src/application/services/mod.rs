//! Business logic services for the application layer.

pub mod link_scanner;
pub mod mutation_watcher;
pub mod navigation_interceptor;
pub mod settings_service;
pub mod stats_service;

pub use link_scanner::{AnchorRewriteMode, LinkScanner, ScanReport};
pub use mutation_watcher::{MutationWatcher, start_page_session};
pub use navigation_interceptor::{
    IgnoreReason, InterceptOutcome, InterceptorState, NavigationInterceptor,
};
pub use settings_service::SettingsService;
pub use stats_service::StatsService;
