//! Library error types.

use thiserror::Error;

/// Library store errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    /// The next derived id does not fit in a GraphQL `Int`
    #[error("Table '{table}' has no ids left (length {len})")]
    IdSpaceExhausted { table: &'static str, len: usize },
}
