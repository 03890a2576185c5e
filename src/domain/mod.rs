//! Domain layer: entities, ports and repository contracts.
//!
//! Nothing in here touches storage, the browser or the terminal directly.
//!
//! - [`entities`] - Value types and records
//! - [`repositories`] - Settings and statistics persistence traits
//! - [`navigation_event`] - Navigation notifications and redirect commands
//! - [`dom`] - Document surface used by the link scanner
//! - [`tabs`] - Tab redirect port
//!
//! # Rewrite Flow
//!
//! 1. The host delivers a [`navigation_event::NavigationEvent`]
//! 2. The navigation interceptor reads a [`entities::Settings`] snapshot
//! 3. The URL is rewritten and handed to a [`tabs::TabRedirectSink`]
//! 4. A [`entities::ConversionRecord`] is appended via [`repositories::StatsRepository`]

pub mod dom;
pub mod entities;
pub mod navigation_event;
pub mod repositories;
pub mod tabs;
