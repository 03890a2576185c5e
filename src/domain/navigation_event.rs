//! Navigation events and redirect commands exchanged with the browser host.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle of a browser tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// "Navigation completed" notification delivered by the host.
///
/// Wire shape: `{ "url": "https://...", "tabId": 42 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEvent {
    pub url: String,
    pub tab_id: TabId,
}

impl NavigationEvent {
    pub fn new(url: impl Into<String>, tab_id: TabId) -> Self {
        Self {
            url: url.into(),
            tab_id,
        }
    }
}

/// Instruction to point a tab at a new URL.
///
/// Wire shape: `{ "tabId": 42, "url": "https://..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectCommand {
    pub tab_id: TabId,
    pub url: String,
}
