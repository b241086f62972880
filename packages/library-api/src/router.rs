//! Matchit routing configuration.

use std::sync::Arc;

use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};
use matchit::Router as MatchitRouter;
use thiserror::Error;

use crate::handlers;
use crate::schema::LibrarySchema;
use library_core::config::ServerConfig;

/// Path of the GraphQL endpoint.
pub const GRAPHQL_PATH: &str = "/graphql";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Executable GraphQL schema
    pub schema: LibrarySchema,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a new router with the GraphQL route.
    pub fn new(schema: LibrarySchema, config: Arc<ServerConfig>) -> Self {
        let mut router = MatchitRouter::new();

        router
            .insert(GRAPHQL_PATH, RouteHandler::GraphQl)
            .expect("Failed to insert /graphql route");

        Self {
            inner: router,
            state: AppState { schema, config },
        }
    }

    /// Routes an incoming request to the appropriate handler.
    ///
    /// # Arguments
    /// * `req` - HTTP request with any body type
    ///
    /// # Returns
    /// `Result<Response<Bytes>, RouterError>` containing the response or an error.
    pub async fn route<B>(&self, req: Request<B>) -> Result<Response<Bytes>, RouterError>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let path = req.uri().path().to_string();
        tracing::debug!(method = %req.method(), %path, "Routing request");

        match self.inner.at(&path) {
            Ok(matched) => matched.value.handle(req, self.state.clone()).await,
            Err(_) => Err(RouterError::NotFound(format!("No route found for {}", path))),
        }
    }
}

/// Route handler function.
enum RouteHandler {
    GraphQl,
}

impl RouteHandler {
    /// Dispatches a request on its method.
    async fn handle<B>(
        &self,
        req: Request<B>,
        state: AppState,
    ) -> Result<Response<Bytes>, RouterError>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        match self {
            RouteHandler::GraphQl => match *req.method() {
                Method::GET => handlers::graphql_get(req, state).await,
                Method::POST => handlers::graphql_post(req, state).await,
                _ => Err(RouterError::MethodNotAllowed),
            },
        }
    }
}

/// Router error type.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("Internal Error: {0}")]
    InternalError(String),
    #[error("Request Timeout")]
    Timeout,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Payload Too Large: body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },
}

impl RouterError {
    /// HTTP status reported for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RouterError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RouterError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RouterError::Timeout => StatusCode::REQUEST_TIMEOUT,
            RouterError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RouterError::NotFound(_) => StatusCode::NOT_FOUND,
            RouterError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let status = err.status();
        let message = status
            .canonical_reason()
            .unwrap_or("Error")
            .to_string();
        let details = match &err {
            RouterError::MethodNotAllowed | RouterError::Timeout => None,
            _ => Some(err.to_string()),
        };

        let error_response = handlers::error_response(status.as_u16(), message, details);
        let body = serde_json::to_vec(&error_response)
            .unwrap_or_else(|e| format!("{{\"success\":false,\"error\":{{\"code\":\"500\",\"message\":\"Failed to serialize error: {}\"}}}}", e).into_bytes());

        let mut builder = Response::builder()
            .status(status)
            .header(hyper::header::CONTENT_TYPE, "application/json");
        if let RouterError::MethodNotAllowed = err {
            builder = builder.header(hyper::header::ALLOW, "GET, POST");
        }
        builder.body(Bytes::from(body)).unwrap_or_else(|_| {
            let mut fallback = Response::new(Bytes::from("Internal Server Error"));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
    }
}
