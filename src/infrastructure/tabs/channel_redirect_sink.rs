//! Channel-backed tab redirect sink.

use serde_json::json;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::navigation_event::{RedirectCommand, TabId};
use crate::domain::tabs::TabRedirectSink;
use crate::error::AppError;

/// Hands redirect commands to the host through a bounded channel.
///
/// Never waits: a full or closed channel is reported as
/// [`AppError::Unavailable`] and the command is dropped.
#[derive(Clone)]
pub struct ChannelRedirectSink {
    tx: mpsc::Sender<RedirectCommand>,
}

impl ChannelRedirectSink {
    pub fn new(tx: mpsc::Sender<RedirectCommand>) -> Self {
        Self { tx }
    }
}

impl TabRedirectSink for ChannelRedirectSink {
    fn redirect(&self, tab_id: TabId, url: &str) -> Result<(), AppError> {
        let command = RedirectCommand {
            tab_id,
            url: url.to_string(),
        };

        self.tx.try_send(command).map_err(|e| {
            let reason = match e {
                TrySendError::Full(_) => "redirect queue full",
                TrySendError::Closed(_) => "redirect queue closed",
            };
            AppError::unavailable(
                "Tab redirect not delivered",
                json!({ "tab_id": tab_id.0, "reason": reason }),
            )
        })
    }
}
