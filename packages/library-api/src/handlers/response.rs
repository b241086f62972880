//! Response envelopes and builders.

use hyper::body::Bytes;
use hyper::{header, Response, StatusCode};
use serde::Serialize;

use crate::router::RouterError;

/// Consistent API error response wrapper, used for transport-level
/// failures outside GraphQL execution
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always false for error responses
    pub success: bool,
    /// Error information
    pub error: ApiError,
}

/// Consistent API error body
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error code (HTTP status code as string)
    pub code: String,
    /// Error message
    pub message: String,
    /// Optional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Helper to create error response
pub fn error_response(code: u16, message: String, details: Option<String>) -> ErrorResponse {
    ErrorResponse {
        success: false,
        error: ApiError {
            code: code.to_string(),
            message,
            details,
        },
    }
}

/// GraphQL-shaped error body: `{"errors":[{"message": ...}]}`.
#[derive(Debug, Serialize)]
struct GraphQlErrors<'a> {
    errors: [GraphQlErrorMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct GraphQlErrorMessage<'a> {
    message: &'a str,
}

/// Helper to build an HTTP response with the given content type.
pub fn build_response(
    status: StatusCode,
    content_type: &str,
    body: impl Into<Bytes>,
) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .body(body.into())
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

/// Helper to serialize `value` into a JSON response.
pub fn json_response<T: Serialize>(
    status: StatusCode,
    value: &T,
) -> Result<Response<Bytes>, RouterError> {
    let json = serde_json::to_vec(value)
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;
    build_response(status, "application/json", json)
}

/// Helper to build a GraphQL-shaped error response that never reached
/// the executor.
pub fn graphql_error_response(
    status: StatusCode,
    message: &str,
) -> Result<Response<Bytes>, RouterError> {
    json_response(
        status,
        &GraphQlErrors {
            errors: [GraphQlErrorMessage { message }],
        },
    )
}
