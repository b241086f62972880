//! Core storage for the library GraphQL server.
//!
//! Provides the author and book records, an append-only in-memory
//! table, the seeded `Library` store, and server configuration.

pub mod config;
pub mod error;
pub mod library;
pub mod record;
pub mod table;

pub use library::Library;
pub use record::{Author, Book};
