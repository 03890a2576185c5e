//! Tab redirect port.

use crate::domain::navigation_event::TabId;
use crate::error::AppError;

/// Accepts redirect instructions for browser tabs.
///
/// Fire-and-forget: an `Ok` only means the instruction was handed off, not
/// that the tab navigated.
#[cfg_attr(test, mockall::automock)]
pub trait TabRedirectSink: Send + Sync {
    fn redirect(&self, tab_id: TabId, url: &str) -> Result<(), AppError>;
}
