//! Whole-page navigation rewriting.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::domain::entities::ConversionRecord;
use crate::domain::navigation_event::{NavigationEvent, TabId};
use crate::domain::repositories::{SettingsRepository, StatsRepository};
use crate::domain::tabs::TabRedirectSink;
use crate::error::AppError;
use crate::utils::domain_matcher::is_supported_url;
use crate::utils::url_rewriter::{RewriteResult, rewrite_url};

/// Where the interceptor is in its per-event cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptorState {
    Idle,
    Rewriting,
}

/// Why an event was let through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    UnsupportedDomain,
    Disabled,
}

/// Result of handling one navigation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterceptOutcome {
    Ignored(IgnoreReason),
    /// Supported storefront, but no identifier or already in affiliate form.
    Unchanged,
    Redirected {
        tab_id: TabId,
        affiliate_url: String,
    },
    /// Something went wrong; nothing was redirected.
    Failed,
}

/// Rewrites completed navigations to storefront product pages and redirects the tab.
///
/// Every event is handled to completion before the next one: read settings,
/// rewrite, redirect, then append a conversion record. Failures are logged
/// and end in [`InterceptOutcome::Failed`]; nothing is retried and nothing
/// reaches the user.
pub struct NavigationInterceptor<S, C, T>
where
    S: SettingsRepository,
    C: StatsRepository,
    T: TabRedirectSink,
{
    settings: Arc<S>,
    stats: Arc<C>,
    tabs: Arc<T>,
    state: InterceptorState,
}

impl<S, C, T> NavigationInterceptor<S, C, T>
where
    S: SettingsRepository,
    C: StatsRepository,
    T: TabRedirectSink,
{
    pub fn new(settings: Arc<S>, stats: Arc<C>, tabs: Arc<T>) -> Self {
        Self {
            settings,
            stats,
            tabs,
            state: InterceptorState::Idle,
        }
    }

    pub fn state(&self) -> InterceptorState {
        self.state
    }

    /// Handles one navigation-completed event.
    pub async fn handle(&mut self, event: &NavigationEvent) -> InterceptOutcome {
        if !is_supported_url(&event.url) {
            return InterceptOutcome::Ignored(IgnoreReason::UnsupportedDomain);
        }

        self.state = InterceptorState::Rewriting;
        let outcome = match self.rewrite_and_redirect(event).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(
                    tab_id = %event.tab_id,
                    url = %event.url,
                    code = e.code(),
                    error = %e,
                    "Navigation rewrite failed"
                );
                InterceptOutcome::Failed
            }
        };
        self.state = InterceptorState::Idle;

        outcome
    }

    async fn rewrite_and_redirect(
        &self,
        event: &NavigationEvent,
    ) -> Result<InterceptOutcome, AppError> {
        let settings = self.settings.load().await?;
        if !settings.enabled {
            return Ok(InterceptOutcome::Ignored(IgnoreReason::Disabled));
        }

        let affiliate_url = match rewrite_url(&event.url, &settings.affiliate_id)? {
            RewriteResult::Rewritten(url) if url != event.url => url,
            _ => {
                debug!(url = %event.url, "Nothing to rewrite");
                return Ok(InterceptOutcome::Unchanged);
            }
        };

        self.tabs.redirect(event.tab_id, &affiliate_url)?;
        info!(tab_id = %event.tab_id, from = %event.url, to = %affiliate_url, "Tab redirected");

        let record = ConversionRecord::new(event.url.as_str(), affiliate_url.as_str());
        if let Err(e) = self.stats.append_conversion(record).await {
            warn!(code = e.code(), error = %e, "Conversion not recorded");
        }

        Ok(InterceptOutcome::Redirected {
            tab_id: event.tab_id,
            affiliate_url,
        })
    }

    /// Consumes navigation events until the source closes.
    pub async fn run(mut self, mut rx: mpsc::Receiver<NavigationEvent>) {
        while let Some(event) = rx.recv().await {
            let outcome = self.handle(&event).await;
            debug!(tab_id = %event.tab_id, ?outcome, "Navigation handled");
        }

        info!("Navigation event source closed");
    }
}
