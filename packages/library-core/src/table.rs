//! Append-only in-memory table.

use parking_lot::RwLock;

use crate::error::LibraryError;
use crate::record::Record;

/// Append-only table of records kept in insertion order.
///
/// Rows are never updated or removed, so the next id is always
/// `len + 1`. Lookups are linear scans.
#[derive(Debug)]
pub struct Table<R> {
    /// Table name, used in errors and log events
    name: &'static str,
    rows: RwLock<Vec<R>>,
}

impl<R: Record> Table<R> {
    /// Creates an empty table.
    pub fn new(name: &'static str) -> Self {
        Self::with_rows(name, Vec::new())
    }

    /// Creates a table holding `rows` in the given order.
    pub fn with_rows(name: &'static str, rows: Vec<R>) -> Self {
        Self {
            name,
            rows: RwLock::new(rows),
        }
    }

    /// Returns the table name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Returns true if the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// Returns the first row with the given id.
    pub fn find(&self, id: i32) -> Option<R> {
        self.find_by(|row| row.id() == id)
    }

    /// Returns the first row matching `pred`.
    pub fn find_by<F>(&self, pred: F) -> Option<R>
    where
        F: Fn(&R) -> bool,
    {
        self.rows.read().iter().find(|row| pred(row)).cloned()
    }

    /// Returns every row matching `pred`, in insertion order.
    pub fn filter<F>(&self, pred: F) -> Vec<R>
    where
        F: Fn(&R) -> bool,
    {
        self.rows
            .read()
            .iter()
            .filter(|row| pred(row))
            .cloned()
            .collect()
    }

    /// Returns a snapshot of every row, in insertion order.
    pub fn all(&self) -> Vec<R> {
        self.rows.read().clone()
    }

    /// Appends a row built from the next derived id.
    ///
    /// The id is computed and the row pushed under one write guard, so
    /// concurrent appends always receive distinct ids.
    ///
    /// # Returns
    /// `Result<R, LibraryError>` containing a copy of the stored row.
    pub fn append_with<F>(&self, build: F) -> Result<R, LibraryError>
    where
        F: FnOnce(i32) -> R,
    {
        let mut rows = self.rows.write();
        let id = next_id(rows.len()).ok_or(LibraryError::IdSpaceExhausted {
            table: self.name,
            len: rows.len(),
        })?;
        let row = build(id);
        rows.push(row.clone());
        Ok(row)
    }
}

/// Derives the id of the row appended after `len` rows.
pub fn next_id(len: usize) -> Option<i32> {
    len.checked_add(1).and_then(|id| i32::try_from(id).ok())
}
