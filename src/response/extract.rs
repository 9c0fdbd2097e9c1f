//! Text extraction from response documents.

use serde_json::Value;

use crate::error::{GeminiResult, ResponseError};

/// Separator used between parts and candidates unless told otherwise.
pub const DEFAULT_JOIN_SEPARATOR: &str = " ";

/// Extracts the text of every candidate of one document.
///
/// Each candidate contributes the `text` of its `content.parts` joined with
/// `separator`; candidates are then joined with the same separator. Parts
/// without text contribute an empty string, and a candidate without parts an
/// empty string. A document without `candidates` is rejected.
///
/// # Example
///
/// ```
/// use integrations_gemini_ai::response::extract_text;
/// use serde_json::json;
///
/// let document = json!({
///     "candidates": [{"content": {"parts": [{"text": "Hello"}, {"text": "world"}]}}]
/// });
/// assert_eq!(extract_text(&document, " ").unwrap(), "Hello world");
/// ```
pub fn extract_text(document: &Value, separator: &str) -> GeminiResult<String> {
    let candidates = candidates_of(document)?;
    Ok(join_candidates(candidates.iter(), separator))
}

/// Extracts the text of every candidate across a sequence of documents.
///
/// Candidates of all documents are collected first and then joined, so the
/// result for `[a, b]` equals the result for `a` and for `b` joined with
/// `separator`.
pub fn extract_text_from_documents(documents: &[Value], separator: &str) -> GeminiResult<String> {
    let mut candidates = Vec::new();
    for document in documents {
        candidates.extend(candidates_of(document)?.iter());
    }
    Ok(join_candidates(candidates.into_iter(), separator))
}

fn candidates_of(document: &Value) -> GeminiResult<&Vec<Value>> {
    let candidates = document.get("candidates").ok_or_else(|| ResponseError::MissingField {
        field: "candidates".to_string(),
    })?;

    candidates.as_array().ok_or_else(|| {
        ResponseError::MalformedDocument {
            message: "`candidates` is not an array".to_string(),
            body: document.to_string(),
        }
        .into()
    })
}

fn join_candidates<'a>(candidates: impl Iterator<Item = &'a Value>, separator: &str) -> String {
    candidates
        .map(|candidate| candidate_text(candidate, separator))
        .collect::<Vec<_>>()
        .join(separator)
}

fn candidate_text(candidate: &Value, separator: &str) -> String {
    let Some(parts) = candidate
        .get("content")
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
    else {
        return String::new();
    };

    parts
        .iter()
        .map(|part| part.get("text").and_then(Value::as_str).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeminiError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn document(texts: &[&str]) -> Value {
        let parts: Vec<Value> = texts.iter().map(|t| json!({"text": t})).collect();
        json!({"candidates": [{"content": {"role": "model", "parts": parts}}]})
    }

    #[test]
    fn test_single_candidate() {
        assert_eq!(extract_text(&document(&["Hi", "there"]), " ").unwrap(), "Hi there");
    }

    #[test]
    fn test_multiple_candidates() {
        let doc = json!({
            "candidates": [
                {"content": {"parts": [{"text": "a"}]}},
                {"content": {"parts": [{"text": "b"}, {"text": "c"}]}}
            ]
        });
        assert_eq!(extract_text(&doc, "|").unwrap(), "a|b|c");
    }

    #[test]
    fn test_candidate_without_parts_yields_empty_string() {
        let doc = json!({
            "candidates": [
                {"content": {"parts": []}},
                {"finishReason": "SAFETY"},
                {"content": {"parts": [{"text": "x"}]}}
            ]
        });
        assert_eq!(extract_text(&doc, ",").unwrap(), ",,x");
    }

    #[test]
    fn test_non_text_part_contributes_empty_string() {
        let doc = json!({
            "candidates": [{"content": {"parts": [
                {"text": "a"},
                {"functionCall": {"name": "lookup", "args": {}}},
                {"text": "b"}
            ]}}]
        });
        assert_eq!(extract_text(&doc, "-").unwrap(), "a--b");
    }

    #[test]
    fn test_missing_candidates_is_rejected() {
        let result = extract_text(&json!({"promptFeedback": {"blockReason": "SAFETY"}}), " ");
        assert_eq!(
            result,
            Err(GeminiError::Response(ResponseError::MissingField {
                field: "candidates".to_string()
            }))
        );
    }

    #[test]
    fn test_candidates_not_an_array() {
        let result = extract_text(&json!({"candidates": "nope"}), " ");
        assert!(matches!(
            result,
            Err(GeminiError::Response(ResponseError::MalformedDocument { .. }))
        ));
    }

    #[test]
    fn test_documents_concatenate_with_separator() {
        let d1 = document(&["Hi"]);
        let d2 = document(&["there"]);

        let combined = extract_text_from_documents(&[d1.clone(), d2.clone()], " ").unwrap();
        let separate = format!(
            "{} {}",
            extract_text(&d1, " ").unwrap(),
            extract_text(&d2, " ").unwrap()
        );

        assert_eq!(combined, "Hi there");
        assert_eq!(combined, separate);
    }

    #[test]
    fn test_empty_document_list() {
        assert_eq!(extract_text_from_documents(&[], " ").unwrap(), "");
    }
}
