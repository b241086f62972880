//! Author and book records.

use serde::{Deserialize, Serialize};

/// A row that can be looked up by its integer id.
pub trait Record: Clone {
    /// Returns the record's id.
    fn id(&self) -> i32;
}

/// An author of one or more books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i32,
    pub name: String,
}

/// A book written by an author.
///
/// `author_id` is not checked against the author table; a dangling
/// reference simply resolves to no author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i32,
    pub name: String,
    pub author_id: i32,
}

impl Author {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Book {
    pub fn new(id: i32, name: impl Into<String>, author_id: i32) -> Self {
        Self {
            id,
            name: name.into(),
            author_id,
        }
    }

    /// Returns true if this book was written by `author`.
    pub fn is_by(&self, author: &Author) -> bool {
        self.author_id == author.id
    }
}

impl Record for Author {
    fn id(&self) -> i32 {
        self.id
    }
}

impl Record for Book {
    fn id(&self) -> i32 {
        self.id
    }
}
