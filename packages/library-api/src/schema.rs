//! GraphQL schema and resolvers.

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, ErrorExtensions, Object, Result, Schema};
use library_core::error::LibraryError;
use library_core::{Author, Book, Library};

/// Executable library schema.
pub type LibrarySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the schema with `library` attached as resolver context.
pub fn build_schema(library: Arc<Library>) -> LibrarySchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(library)
        .finish()
}

/// GraphQL `[T]`: both the list and its items are nullable.
type NullableList<T> = Option<Vec<Option<T>>>;

fn library<'a>(ctx: &Context<'a>) -> Result<&'a Arc<Library>> {
    ctx.data::<Arc<Library>>()
}

fn nullable_list<R, T>(rows: Vec<R>, wrap: fn(R) -> T) -> NullableList<T> {
    Some(rows.into_iter().map(|row| Some(wrap(row))).collect())
}

/// Converts a store error into a GraphQL error with a `code` extension.
fn library_error(err: LibraryError) -> async_graphql::Error {
    let code = match err {
        LibraryError::IdSpaceExhausted { .. } => "ID_SPACE_EXHAUSTED",
    };
    async_graphql::Error::new(err.to_string()).extend_with(|_, ext| ext.set("code", code))
}

/// GraphQL view of a [`Book`].
#[derive(Debug, Clone)]
pub struct BookObject(pub Book);

/// GraphQL view of an [`Author`].
#[derive(Debug, Clone)]
pub struct AuthorObject(pub Author);

/// Book written by an author
#[Object(name = "Book")]
impl BookObject {
    async fn id(&self) -> i32 {
        self.0.id
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn author_id(&self) -> i32 {
        self.0.author_id
    }

    /// The author whose id matches this book's authorId
    async fn author(&self, ctx: &Context<'_>) -> Result<Option<AuthorObject>> {
        Ok(library(ctx)?.author_of(&self.0).map(AuthorObject))
    }
}

/// Author of a book
#[Object(name = "Author")]
impl AuthorObject {
    async fn id(&self) -> i32 {
        self.0.id
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    /// Every book written by this author
    async fn books(&self, ctx: &Context<'_>) -> Result<NullableList<BookObject>> {
        Ok(nullable_list(library(ctx)?.books_by(&self.0), BookObject))
    }
}

/// Root Query
pub struct QueryRoot;

#[Object(name = "Query")]
impl QueryRoot {
    /// Single Book
    async fn book(&self, ctx: &Context<'_>, id: Option<i32>) -> Result<Option<BookObject>> {
        let library = library(ctx)?;
        Ok(id.and_then(|id| library.book(id)).map(BookObject))
    }

    /// List of Books
    async fn books(&self, ctx: &Context<'_>) -> Result<NullableList<BookObject>> {
        Ok(nullable_list(library(ctx)?.books(), BookObject))
    }

    /// Single author
    async fn author(&self, ctx: &Context<'_>, id: Option<i32>) -> Result<Option<AuthorObject>> {
        let library = library(ctx)?;
        Ok(id.and_then(|id| library.author(id)).map(AuthorObject))
    }

    /// List of Authors
    async fn authors(&self, ctx: &Context<'_>) -> Result<NullableList<AuthorObject>> {
        Ok(nullable_list(library(ctx)?.authors(), AuthorObject))
    }
}

/// Root Mutation
pub struct MutationRoot;

#[Object(name = "Mutation")]
impl MutationRoot {
    /// add a book
    async fn add_book(
        &self,
        ctx: &Context<'_>,
        name: String,
        author_id: i32,
    ) -> Result<Option<BookObject>> {
        let book = library(ctx)?
            .add_book(name, author_id)
            .map_err(library_error)?;
        Ok(Some(BookObject(book)))
    }

    /// add a author
    async fn add_author(&self, ctx: &Context<'_>, name: String) -> Result<Option<AuthorObject>> {
        let author = library(ctx)?.add_author(name).map_err(library_error)?;
        Ok(Some(AuthorObject(author)))
    }
}
