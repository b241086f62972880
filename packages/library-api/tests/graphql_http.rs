//! End-to-end tests for the `/graphql` endpoint.
//!
//! Requests are fed straight into the router with in-memory bodies.

use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{header, Method, Request, Response, StatusCode};
use serde_json::{json, Value};

use library_api::router::Router;
use library_api::schema::build_schema;
use library_core::config::ServerConfig;
use library_core::Library;

fn router_with(config: ServerConfig) -> Router {
    let library = Arc::new(Library::seeded());
    Router::new(build_schema(library), Arc::new(config))
}

fn router() -> Router {
    router_with(ServerConfig::default())
}

async fn send(router: &Router, req: Request<Full<Bytes>>) -> Response<Bytes> {
    match router.route(req).await {
        Ok(response) => response,
        Err(err) => err.into(),
    }
}

fn json_body(response: &Response<Bytes>) -> Value {
    serde_json::from_slice(response.body()).unwrap()
}

fn post_request(content_type: &str, body: impl Into<Bytes>) -> Request<Full<Bytes>> {
    Request::builder()
        .method(Method::POST)
        .uri("/graphql")
        .header(header::CONTENT_TYPE, content_type)
        .body(Full::new(body.into()))
        .unwrap()
}

fn get_request(uri: &str, accept: &str) -> Request<Full<Bytes>> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::ACCEPT, accept)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

async fn post_query(router: &Router, query: &str) -> Value {
    let body = serde_json::to_vec(&json!({ "query": query })).unwrap();
    let response = send(router, post_request("application/json", body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body(&response)
}

#[tokio::test]
async fn books_returns_seed_in_insertion_order() {
    let body = post_query(&router(), "{ books { id name authorId } }").await;
    let books = body["data"]["books"].as_array().unwrap();
    assert_eq!(books.len(), 8);
    let ids: Vec<i64> = books.iter().map(|b| b["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(
        books[7],
        json!({"id": 8, "name": "Beyond the Shadows", "authorId": 3})
    );
}

#[tokio::test]
async fn single_book_by_id() {
    let body = post_query(&router(), "{ book(id: 1) { id name authorId } }").await;
    assert_eq!(
        body,
        json!({"data": {"book": {
            "id": 1,
            "name": "Harry Potter and the Chamber of Secrets",
            "authorId": 1
        }}})
    );
}

#[tokio::test]
async fn author_with_nested_books() {
    let body = post_query(&router(), "{ author(id: 2) { name books { id name } } }").await;
    assert_eq!(
        body["data"]["author"],
        json!({
            "name": "J. R. R. Tolkien",
            "books": [
                {"id": 4, "name": "The Fellowship of the Ring"},
                {"id": 5, "name": "The Two Towers"},
                {"id": 6, "name": "The Return of the King"}
            ]
        })
    );
}

#[tokio::test]
async fn book_with_nested_author() {
    let body = post_query(&router(), "{ book(id: 5) { author { id name } } }").await;
    assert_eq!(
        body["data"]["book"]["author"],
        json!({"id": 2, "name": "J. R. R. Tolkien"})
    );
}

#[tokio::test]
async fn add_book_is_visible_to_later_queries() {
    let router = router();
    let added = post_query(
        &router,
        r#"mutation { addBook(name: "New Book", authorId: 1) { id name authorId } }"#,
    )
    .await;
    assert_eq!(
        added,
        json!({"data": {"addBook": {"id": 9, "name": "New Book", "authorId": 1}}})
    );

    let body = post_query(&router, "{ books { id name } }").await;
    let books = body["data"]["books"].as_array().unwrap();
    assert_eq!(books.len(), 9);
    assert_eq!(books[8], json!({"id": 9, "name": "New Book"}));
}

#[tokio::test]
async fn add_author_returns_next_id() {
    let body = post_query(
        &router(),
        r#"mutation { addAuthor(name: "New Author") { id name } }"#,
    )
    .await;
    assert_eq!(
        body,
        json!({"data": {"addAuthor": {"id": 4, "name": "New Author"}}})
    );
}

#[tokio::test]
async fn unknown_book_is_null_not_an_error() {
    let body = post_query(&router(), "{ book(id: 999) { id name } }").await;
    assert_eq!(body, json!({"data": {"book": null}}));
}

#[tokio::test]
async fn variables_and_operation_name_are_honoured() {
    let router = router();
    let payload = json!({
        "query": "query A { authors { id } } query B($id: Int) { author(id: $id) { name } }",
        "operationName": "B",
        "variables": {"id": 3}
    });
    let response = send(
        &router,
        post_request("application/json", serde_json::to_vec(&payload).unwrap()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(&response),
        json!({"data": {"author": {"name": "Brent Weeks"}}})
    );
}

#[tokio::test]
async fn raw_graphql_body_is_executed() {
    let response = send(
        &router(),
        post_request("application/graphql", "{ authors { name } }"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(&response)["data"]["authors"][0],
        json!({"name": "J. K. Rowling"})
    );
}

#[tokio::test]
async fn validation_errors_stay_in_graphql_response() {
    let body = post_query(&router(), "{ books { title } }").await;
    assert!(body["errors"].as_array().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn missing_query_is_bad_request() {
    let response = send(&router(), post_request("application/json", "{}")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(&response),
        json!({"errors": [{"message": "Must provide query string."}]})
    );
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let response = send(&router(), post_request("application/json", "{\"query\":")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&response)["success"], json!(false));
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let router = router_with(ServerConfig {
        max_body_bytes: 8,
        ..Default::default()
    });
    let response = send(
        &router,
        post_request("application/json", r#"{"query":"{ books { id } }"}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn get_executes_query_string() {
    let response = send(
        &router(),
        get_request(
            "/graphql?query=%7B%20book(id%3A%203)%20%7B%20name%20%7D%20%7D",
            "application/json",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(&response),
        json!({"data": {"book": {"name": "Harry Potter and the Goblet of Fire"}}})
    );
}

#[tokio::test]
async fn get_rejects_mutations() {
    let router = router();
    let response = send(
        &router,
        get_request(
            "/graphql?query=mutation%20%7B%20addAuthor(name%3A%20%22X%22)%20%7B%20id%20%7D%20%7D",
            "application/json",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "POST");
    assert_eq!(
        json_body(&response),
        json!({"errors": [{"message": "Can only perform a mutation operation from a POST request."}]})
    );

    let body = post_query(&router, "{ authors { id } }").await;
    assert_eq!(body["data"]["authors"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn get_rejects_lone_named_mutation() {
    let library = Arc::new(Library::seeded());
    let router = Router::new(
        build_schema(Arc::clone(&library)),
        Arc::new(ServerConfig::default()),
    );
    let response = send(
        &router,
        get_request(
            "/graphql?query=mutation%20M%20%7B%20addAuthor(name%3A%22X%22)%20%7B%20id%20%7D%20%7D",
            "application/json",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(library.author_count(), 3);
}

#[tokio::test]
async fn browsers_get_graphiql() {
    let response = send(&router(), get_request("/graphql", "text/html,*/*")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let page = String::from_utf8(response.body().to_vec()).unwrap();
    assert!(page.contains("graphiql"));
}

#[tokio::test]
async fn raw_parameter_skips_graphiql() {
    let response = send(
        &router(),
        get_request("/graphql?raw&query=%7Bauthors%7Bid%7D%7D", "text/html"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(&response)["data"]["authors"][2], json!({"id": 3}));
}

#[tokio::test]
async fn graphiql_can_be_disabled() {
    let router = router_with(ServerConfig {
        graphiql: false,
        ..Default::default()
    });
    let response = send(&router, get_request("/graphql", "text/html")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let response = send(&router(), get_request("/books", "application/json")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(&response);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("404"));
}

#[tokio::test]
async fn other_methods_are_not_allowed() {
    let req = Request::builder()
        .method(Method::PUT)
        .uri("/graphql")
        .body(Full::new(Bytes::new()))
        .unwrap();
    let response = send(&router(), req).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "GET, POST");
}
