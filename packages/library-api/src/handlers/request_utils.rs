//! Request utilities for HTTP endpoints.

use std::collections::HashMap;

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{header, HeaderMap};
use percent_encoding::percent_decode_str;
use tokio::time;

use crate::router::RouterError;

/// Helper function to read request body with timeout and size limit
pub async fn read_request_body_with_timeout<B>(
    body: B,
    timeout_ms: u64,
    max_bytes: usize,
) -> Result<Bytes, RouterError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    let body = time::timeout(timeout_duration, Limited::new(body, max_bytes).collect())
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| {
            if e.downcast_ref::<LengthLimitError>().is_some() {
                RouterError::PayloadTooLarge { limit: max_bytes }
            } else {
                RouterError::InternalError(format!("Failed to read request body: {}", e))
            }
        })?;
    Ok(body.to_bytes())
}

/// Parses a URL query string into decoded key/value pairs.
///
/// `+` is treated as a space, as in form encoding. Later duplicates win.
pub fn parse_query_params(query_str: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    let Some(query_str) = query_str else {
        return params;
    };

    for pair in query_str.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.insert(decode_component(key), decode_component(value));
    }
    params
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Returns the media type of the request without parameters, lowercased.
pub fn content_type(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    let essence = value.split(';').next().unwrap_or(value).trim();
    Some(essence.to_ascii_lowercase())
}

/// Returns true if the client will accept an HTML response.
pub fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains("text/html"))
}
