//! GraphQL-over-HTTP server for the in-memory library.
//!
//! Provides the GraphQL schema and resolvers, the `/graphql` endpoint
//! with its GraphiQL explorer, request routing, and the hyper server.

pub mod handlers;
pub mod router;
pub mod schema;
pub mod server;
