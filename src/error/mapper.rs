//! Error mapping utilities for HTTP status codes and API error payloads.

use std::collections::HashMap;
use serde::Deserialize;
use serde_json::Value;
use super::categories::RequestError;
use super::types::GeminiError;

/// Structured API error envelope returned by both backends.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub(crate) error: ApiErrorDetail,
}

/// Detailed error information from the API.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub(crate) message: Option<String>,
    #[serde(default)]
    pub(crate) status: Option<String>,
}

/// Header names that may carry a request identifier.
const REQUEST_ID_HEADERS: [&str; 3] = ["x-request-id", "x-goog-request-id", "request-id"];

/// Maps a non-success HTTP status and its body to a `GeminiError`.
///
/// The body is kept verbatim as the error payload. The human-readable message
/// is taken from the Google error envelope when one is present, either as an
/// object or wrapped in a single-element array as Vertex AI streams it.
pub fn map_http_status(status: u16, headers: &HashMap<String, String>, body: &[u8]) -> GeminiError {
    let payload = String::from_utf8_lossy(body).to_string();
    let message = extract_error_message(body).unwrap_or_else(|| {
        let trimmed = payload.trim();
        if trimmed.is_empty() {
            format!("the server responded with status {}", status)
        } else {
            trimmed.to_string()
        }
    });

    GeminiError::Request(RequestError::HttpStatus {
        status,
        message,
        payload,
        request_id: extract_request_id(headers),
    })
}

/// Extracts `error.message` from an API error body.
///
/// Accepts the envelope as an object or as the first element of an array.
pub fn extract_error_message(body: &[u8]) -> Option<String> {
    let envelope = match serde_json::from_slice::<Value>(body).ok()? {
        Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
        value @ Value::Object(_) => value,
        _ => return None,
    };

    let response: ApiErrorResponse = serde_json::from_value(envelope).ok()?;
    describe(response.error)
}

fn describe(detail: ApiErrorDetail) -> Option<String> {
    match (detail.message, detail.status) {
        (Some(message), Some(status)) => Some(format!("{} ({})", message, status)),
        (Some(message), None) => Some(message),
        (None, Some(status)) => Some(status),
        (None, None) => None,
    }
}

/// Extracts the request ID from response headers, case-insensitively.
pub fn extract_request_id(headers: &HashMap<String, String>) -> Option<String> {
    headers.iter().find_map(|(key, value)| {
        let key = key.to_lowercase();
        REQUEST_ID_HEADERS
            .contains(&key.as_str())
            .then(|| value.clone())
    })
}
