//! Infrastructure layer for external integrations.
//!
//! Concrete implementations of the ports defined by the domain layer.
//!
//! # Modules
//!
//! - [`storage`] - Key-value stores (memory, JSON file, Redis)
//! - [`persistence`] - Settings and statistics repositories over those stores
//! - [`dom`] - In-memory document surface
//! - [`tabs`] - Tab redirect sinks

pub mod dom;
pub mod persistence;
pub mod storage;
pub mod tabs;
