//! Assembly of complete response bodies into JSON documents.

use serde_json::Value;

use crate::error::{GeminiResult, ResponseError};

/// A complete response body, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// No body.
    Empty,
    /// A body already parsed as a single JSON value.
    Json(Value),
    /// Raw text, possibly several newline-delimited JSON documents.
    Text(String),
}

/// Normalizes a complete body.
///
/// Structured and empty bodies are returned unchanged. Text is read as a
/// sequence of JSON objects separated by `}\n{` and parsed as one array.
///
/// # Example
///
/// ```
/// use integrations_gemini_ai::response::{normalize_body, ResponseBody};
/// use serde_json::json;
///
/// let body = ResponseBody::Text("{\"a\":1}\n{\"a\":2}".to_string());
/// assert_eq!(
///     normalize_body(body).unwrap(),
///     ResponseBody::Json(json!([{"a": 1}, {"a": 2}]))
/// );
/// ```
pub fn normalize_body(body: ResponseBody) -> GeminiResult<ResponseBody> {
    let text = match body {
        ResponseBody::Text(text) if !text.is_empty() => text,
        other => return Ok(other),
    };

    let joined = format!("[{}]", text.replace("}\n{", "},{"));

    serde_json::from_str(&joined)
        .map(ResponseBody::Json)
        .map_err(|e| {
            ResponseError::MalformedDocument {
                message: e.to_string(),
                body: text,
            }
            .into()
        })
}

impl ResponseBody {
    /// Response documents held by the body.
    ///
    /// Arrays are flattened, recursively, so that a streamed-format body
    /// yields one entry per document.
    pub fn into_documents(self) -> Vec<Value> {
        let mut documents = Vec::new();
        if let ResponseBody::Json(value) = self {
            flatten_into(value, &mut documents);
        }
        documents
    }
}

fn flatten_into(value: Value, documents: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten_into(item, documents);
            }
        }
        other => documents.push(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeminiError;
    use crate::response::extract_text_from_documents;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_structured_body_is_unchanged() {
        let body = ResponseBody::Json(json!({"candidates": []}));
        let once = normalize_body(body.clone()).unwrap();
        let twice = normalize_body(once.clone()).unwrap();

        assert_eq!(once, body);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_empty_bodies_are_unchanged() {
        assert_eq!(normalize_body(ResponseBody::Empty).unwrap(), ResponseBody::Empty);
        assert_eq!(
            normalize_body(ResponseBody::Text(String::new())).unwrap(),
            ResponseBody::Text(String::new())
        );
    }

    #[test]
    fn test_newline_delimited_documents() {
        let text = concat!(
            "{\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hi\"}]}}]}\n",
            "{\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"there\"}]}}]}"
        );

        let documents = normalize_body(ResponseBody::Text(text.to_string()))
            .unwrap()
            .into_documents();

        assert_eq!(documents.len(), 2);
        assert_eq!(extract_text_from_documents(&documents, " ").unwrap(), "Hi there");
    }

    #[test]
    fn test_malformed_text_is_fatal() {
        let result = normalize_body(ResponseBody::Text("{\"candidates\": [".to_string()));

        match result {
            Err(GeminiError::Response(ResponseError::MalformedDocument { body, .. })) => {
                assert_eq!(body, "{\"candidates\": [");
            }
            other => panic!("Expected MalformedDocument, got {:?}", other),
        }
    }

    #[test]
    fn test_into_documents_flattens_arrays() {
        let body = ResponseBody::Json(json!([[{"a": 1}], {"a": 2}]));
        assert_eq!(body.into_documents(), vec![json!({"a": 1}), json!({"a": 2})]);
        assert!(ResponseBody::Empty.into_documents().is_empty());
    }
}
