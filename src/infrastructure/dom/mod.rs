//! Document implementations.
//!
//! - [`InMemoryDocument`] - Arena-backed element tree used by hosts and tests

mod in_memory_document;

pub use in_memory_document::InMemoryDocument;
