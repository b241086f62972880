//! `/graphql` endpoint: GraphiQL page, GET and POST execution.

use async_graphql::http::GraphiQLSource;
use async_graphql::parser::parse_query;
use async_graphql::parser::types::{DocumentOperations, OperationType};
use async_graphql::Variables;
use hyper::body::{Body, Bytes};
use hyper::{header, Request, Response, StatusCode};
use serde::Deserialize;

use super::request_utils::{
    accepts_html, content_type, parse_query_params, read_request_body_with_timeout,
};
use super::response::{build_response, graphql_error_response, json_response};
use crate::router::{AppState, RouterError, GRAPHQL_PATH};

const MISSING_QUERY: &str = "Must provide query string.";
const MUTATION_OVER_GET: &str = "Can only perform a mutation operation from a POST request.";

/// JSON body of a GraphQL POST request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlBody {
    query: Option<String>,
    operation_name: Option<String>,
    /// Either a JSON object or a string holding one
    variables: Option<serde_json::Value>,
}

/// Serves GraphiQL or executes a query from the URL.
///
/// # Endpoint
/// `GET /graphql?query=...&operationName=...&variables=...`
///
/// # Response
/// - **200 OK**: GraphiQL page for browsers, otherwise the GraphQL response
///
/// # Errors
/// - **400 Bad Request**: No query, or variables are not valid JSON
/// - **405 Method Not Allowed**: The selected operation is a mutation
///
/// # Notes
/// - Add `raw` to the query string to get JSON from a browser
///
/// # Example
/// ```bash
/// curl 'http://localhost:5000/graphql?query=%7Bbooks%7Bname%7D%7D'
/// ```
pub async fn graphql_get<B>(req: Request<B>, state: AppState) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let params = parse_query_params(req.uri().query());

    if state.config.graphiql && !params.contains_key("raw") && accepts_html(req.headers()) {
        return build_response(StatusCode::OK, "text/html; charset=utf-8", graphiql_page());
    }

    let body = GraphQlBody {
        query: params.get("query").cloned(),
        operation_name: params.get("operationName").cloned(),
        variables: params
            .get("variables")
            .map(|raw| serde_json::Value::String(raw.clone())),
    };
    let Some(request) = into_graphql_request(body)? else {
        return graphql_error_response(StatusCode::BAD_REQUEST, MISSING_QUERY);
    };

    if selects_mutation(&request) {
        let mut response = graphql_error_response(StatusCode::METHOD_NOT_ALLOWED, MUTATION_OVER_GET)?;
        response
            .headers_mut()
            .insert(header::ALLOW, header::HeaderValue::from_static("POST"));
        return Ok(response);
    }

    execute(request, &state).await
}

/// Executes a query sent in the request body.
///
/// # Endpoint
/// `POST /graphql`
///
/// # Request Body
/// `application/json`:
/// ```json
/// { "query": "mutation { addAuthor(name: \"New Author\") { id } }" }
/// ```
/// or `application/graphql` with the raw document.
///
/// # Response
/// - **200 OK**: The GraphQL response, `data` and/or `errors`
///
/// # Errors
/// - **400 Bad Request**: No query, malformed JSON, or unsupported content type
/// - **408 Request Timeout**: Body not received in time
/// - **413 Payload Too Large**: Body exceeds the configured limit
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:5000/graphql \
///   -H 'Content-Type: application/json' \
///   -d '{"query":"{ author(id: 2) { name books { name } } }"}'
/// ```
pub async fn graphql_post<B>(req: Request<B>, state: AppState) -> Result<Response<Bytes>, RouterError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let media_type = content_type(req.headers());
    let bytes = read_request_body_with_timeout(
        req.into_body(),
        state.config.request_timeout_ms,
        state.config.max_body_bytes,
    )
    .await?;

    let body = match media_type.as_deref() {
        Some("application/graphql") => GraphQlBody {
            query: Some(
                String::from_utf8(bytes.to_vec())
                    .map_err(|e| RouterError::BadRequest(format!("Body is not UTF-8: {}", e)))?,
            ),
            ..Default::default()
        },
        None | Some("application/json") => decode_json_body(&bytes)?,
        Some(other) => {
            return Err(RouterError::BadRequest(format!(
                "Unsupported content type '{}'",
                other
            )))
        }
    };

    let Some(request) = into_graphql_request(body)? else {
        return graphql_error_response(StatusCode::BAD_REQUEST, MISSING_QUERY);
    };
    execute(request, &state).await
}

/// Runs `request` against the schema. Execution errors stay in the body.
async fn execute(
    request: async_graphql::Request,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let response = state.schema.execute(request).await;
    if !response.errors.is_empty() {
        tracing::debug!(errors = response.errors.len(), "GraphQL execution reported errors");
    }
    json_response(StatusCode::OK, &response)
}

fn decode_json_body(bytes: &[u8]) -> Result<GraphQlBody, RouterError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(GraphQlBody::default());
    }
    serde_json::from_slice(bytes)
        .map_err(|e| RouterError::BadRequest(format!("POST body sent invalid JSON: {}", e)))
}

/// Builds an executable request, or `None` when there is no query.
fn into_graphql_request(body: GraphQlBody) -> Result<Option<async_graphql::Request>, RouterError> {
    let Some(query) = body.query.filter(|q| !q.trim().is_empty()) else {
        return Ok(None);
    };

    let mut request = async_graphql::Request::new(query);
    if let Some(name) = body.operation_name.filter(|n| !n.is_empty()) {
        request = request.operation_name(name);
    }
    if let Some(variables) = parse_variables(body.variables)? {
        request = request.variables(variables);
    }
    Ok(Some(request))
}

fn parse_variables(raw: Option<serde_json::Value>) -> Result<Option<Variables>, RouterError> {
    let value = match raw {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(serde_json::Value::String(text)) if text.trim().is_empty() => return Ok(None),
        Some(serde_json::Value::String(text)) => serde_json::from_str(&text)
            .map_err(|_| RouterError::BadRequest("Variables are invalid JSON.".to_string()))?,
        Some(value) => value,
    };
    if !value.is_object() {
        return Err(RouterError::BadRequest(
            "Variables must be a JSON object.".to_string(),
        ));
    }
    Ok(Some(Variables::from_json(value)))
}

/// Returns true if the operation `request` would run is a mutation.
///
/// Unparseable documents return false so the executor reports them.
fn selects_mutation(request: &async_graphql::Request) -> bool {
    let Ok(document) = parse_query(&request.query) else {
        return false;
    };
    let operation = match &document.operations {
        DocumentOperations::Single(operation) => Some(operation),
        DocumentOperations::Multiple(operations) => match request.operation_name.as_deref() {
            Some(wanted) => operations
                .iter()
                .find(|(name, _)| name.as_str() == wanted)
                .map(|(_, operation)| operation),
            // A lone named operation runs without an operationName.
            None if operations.len() == 1 => operations.values().next(),
            None => None,
        },
    };
    operation.is_some_and(|operation| operation.node.ty == OperationType::Mutation)
}

fn graphiql_page() -> String {
    GraphiQLSource::build()
        .endpoint(GRAPHQL_PATH)
        .title("Library GraphiQL")
        .finish()
}
