//! Library store holding the author and book tables.

use crate::error::LibraryError;
use crate::record::{Author, Book};
use crate::table::Table;

/// Authors present at process start, in insertion order.
const SEED_AUTHORS: [(i32, &str); 3] = [
    (1, "J. K. Rowling"),
    (2, "J. R. R. Tolkien"),
    (3, "Brent Weeks"),
];

/// Books present at process start, as `(id, name, author_id)`.
const SEED_BOOKS: [(i32, &str, i32); 8] = [
    (1, "Harry Potter and the Chamber of Secrets", 1),
    (2, "Harry Potter and the Prisoner of Azkaban", 1),
    (3, "Harry Potter and the Goblet of Fire", 1),
    (4, "The Fellowship of the Ring", 2),
    (5, "The Two Towers", 2),
    (6, "The Return of the King", 2),
    (7, "The Way of Shadows", 3),
    (8, "Beyond the Shadows", 3),
];

/// In-memory author and book tables.
///
/// Nothing is persisted: every record added at runtime is lost when
/// the process exits.
#[derive(Debug)]
pub struct Library {
    authors: Table<Author>,
    books: Table<Book>,
}

impl Library {
    /// Creates a library with no authors and no books.
    pub fn new() -> Self {
        Self::with_records(Vec::new(), Vec::new())
    }

    /// Creates a library holding the built-in seed data.
    pub fn seeded() -> Self {
        let authors = SEED_AUTHORS
            .iter()
            .map(|&(id, name)| Author::new(id, name))
            .collect();
        let books = SEED_BOOKS
            .iter()
            .map(|&(id, name, author_id)| Book::new(id, name, author_id))
            .collect();
        Self::with_records(authors, books)
    }

    /// Creates a library from existing records, kept in the given order.
    pub fn with_records(authors: Vec<Author>, books: Vec<Book>) -> Self {
        Self {
            authors: Table::with_rows("authors", authors),
            books: Table::with_rows("books", books),
        }
    }

    /// Returns the first book with the given id.
    pub fn book(&self, id: i32) -> Option<Book> {
        self.books.find(id)
    }

    /// Returns every book, in insertion order.
    pub fn books(&self) -> Vec<Book> {
        self.books.all()
    }

    /// Returns the first author with the given id.
    pub fn author(&self, id: i32) -> Option<Author> {
        self.authors.find(id)
    }

    /// Returns every author, in insertion order.
    pub fn authors(&self) -> Vec<Author> {
        self.authors.all()
    }

    /// Returns the author referenced by `book`, if one exists.
    pub fn author_of(&self, book: &Book) -> Option<Author> {
        self.authors.find(book.author_id)
    }

    /// Returns every book written by `author`, in insertion order.
    pub fn books_by(&self, author: &Author) -> Vec<Book> {
        self.books.filter(|book| book.is_by(author))
    }

    /// Appends a book. The author id is stored as given.
    pub fn add_book(&self, name: String, author_id: i32) -> Result<Book, LibraryError> {
        let book = self
            .books
            .append_with(|id| Book::new(id, name, author_id))?;
        tracing::info!(table = self.books.name(), id = book.id, author_id, "Added book");
        Ok(book)
    }

    /// Appends an author.
    pub fn add_author(&self, name: String) -> Result<Author, LibraryError> {
        let author = self.authors.append_with(|id| Author::new(id, name))?;
        tracing::info!(table = self.authors.name(), id = author.id, "Added author");
        Ok(author)
    }

    /// Returns the number of authors.
    pub fn author_count(&self) -> usize {
        self.authors.len()
    }

    /// Returns the number of books.
    pub fn book_count(&self) -> usize {
        self.books.len()
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}
