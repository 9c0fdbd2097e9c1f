//! HTTP response parser for the Gemini API.

use crate::error::{map_http_status, GeminiError};
use crate::response::ResponseBody;
use super::http::HttpResponse;

/// Parser for complete (non-streamed) HTTP responses from the Gemini API.
pub struct ResponseParser;

impl ResponseParser {
    /// Turns a successful response into a [`ResponseBody`].
    ///
    /// An empty body becomes `ResponseBody::Empty`, a body that is one JSON
    /// value becomes `ResponseBody::Json`, anything else is kept as text for
    /// later normalization. A non-success status becomes an error.
    pub fn parse_body(response: HttpResponse) -> Result<ResponseBody, GeminiError> {
        if !response.is_success() {
            return Err(Self::parse_error_response(&response));
        }

        if response.body.is_empty() {
            return Ok(ResponseBody::Empty);
        }

        match serde_json::from_slice(&response.body) {
            Ok(value) => Ok(ResponseBody::Json(value)),
            Err(_) => Ok(ResponseBody::Text(
                String::from_utf8_lossy(&response.body).into_owned(),
            )),
        }
    }

    /// Maps an error response to a `GeminiError`, logging its body.
    pub fn parse_error_response(response: &HttpResponse) -> GeminiError {
        let error = map_http_status(response.status, &response.headers, &response.body);

        tracing::error!(
            status = response.status,
            body = %String::from_utf8_lossy(&response.body),
            "Gemini API returned an error response"
        );

        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use serde_json::json;
    use std::collections::HashMap;

    fn create_response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    #[test]
    fn test_parse_json_body() {
        let body = ResponseParser::parse_body(create_response(200, r#"{"candidates":[]}"#)).unwrap();
        assert_eq!(body, ResponseBody::Json(json!({"candidates": []})));
    }

    #[test]
    fn test_parse_empty_body() {
        let body = ResponseParser::parse_body(create_response(200, "")).unwrap();
        assert_eq!(body, ResponseBody::Empty);
    }

    #[test]
    fn test_parse_newline_delimited_body_kept_as_text() {
        let raw = "{\"a\":1}\n{\"a\":2}";
        let body = ResponseParser::parse_body(create_response(200, raw)).unwrap();
        assert_eq!(body, ResponseBody::Text(raw.to_string()));
    }

    #[test]
    fn test_parse_error_status() {
        let error = ResponseParser::parse_body(create_response(
            429,
            r#"{"error":{"code":429,"message":"Resource exhausted"}}"#,
        ))
        .unwrap_err();

        assert_eq!(error.status(), Some(429));
        assert!(error.payload().unwrap().contains("Resource exhausted"));
    }
}
