//! HTTP endpoint implementations for the GraphQL route.

pub mod graphql;
pub mod request_utils;
pub mod response;

pub use graphql::{graphql_get, graphql_post};
pub use response::{error_response, ApiError, ErrorResponse};
