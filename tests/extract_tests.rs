//! Integration tests for body normalization and text extraction.

use integrations_gemini_ai::error::{GeminiError, ResponseError};
use integrations_gemini_ai::fixtures::{load_fixture, load_json_fixture};
use integrations_gemini_ai::response::{
    extract_text, extract_text_from_documents, normalize_body, ResponseBody,
};
use integrations_gemini_ai::types::{FinishReason, GenerateContentResponse};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn document(texts: &[&str]) -> Value {
    let parts: Vec<Value> = texts.iter().map(|t| json!({ "text": t })).collect();
    json!({"candidates": [{"content": {"parts": parts, "role": "model"}}]})
}

#[test]
fn test_success_fixture_text() {
    // Arrange
    let body: Value = load_json_fixture("content/success_response.json");

    // Act
    let text = extract_text(&body, " ").unwrap();

    // Assert
    assert_eq!(text, "The capital of France is Paris.");
}

#[test]
fn test_success_fixture_typed_view() {
    let response: GenerateContentResponse = load_json_fixture("content/success_response.json");

    assert_eq!(response.finish_reasons(), vec![&FinishReason::Stop]);
    let candidate = &response.candidates.as_ref().unwrap()[0];
    assert_eq!(candidate.texts().collect::<Vec<_>>(), vec!["The capital of France is", "Paris."]);
    assert_eq!(response.usage_metadata.unwrap().total_token_count, 15);
}

#[test]
fn test_newline_delimited_documents() {
    // Arrange
    let body = ResponseBody::Text("{\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hi\"}]}}]}\n{\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"there\"}]}}]}".to_string());

    // Act
    let documents = normalize_body(body).unwrap().into_documents();
    let text = extract_text_from_documents(&documents, " ").unwrap();

    // Assert
    assert_eq!(documents.len(), 2);
    assert_eq!(text, "Hi there");
}

#[test]
fn test_ndjson_fixture() {
    let body = ResponseBody::Text(load_fixture("content/multi_document.ndjson").trim_end().to_string());

    let documents = normalize_body(body).unwrap().into_documents();

    assert_eq!(documents.len(), 2);
    assert_eq!(
        extract_text_from_documents(&documents, " ").unwrap(),
        "Once upon a time."
    );
}

#[test]
fn test_documents_join_like_their_parts() {
    // Arrange
    let first = document(&["a", "b"]);
    let second = document(&["c"]);

    for separator in [" ", "", "\n", ", "] {
        // Act
        let joined = extract_text_from_documents(&[first.clone(), second.clone()], separator).unwrap();
        let expected = format!(
            "{}{}{}",
            extract_text(&first, separator).unwrap(),
            separator,
            extract_text(&second, separator).unwrap()
        );

        // Assert
        assert_eq!(joined, expected);
    }
}

#[test]
fn test_candidates_are_joined() {
    let body = json!({
        "candidates": [
            {"content": {"parts": [{"text": "one"}]}},
            {"content": {"parts": [{"text": "two"}, {"text": "three"}]}}
        ]
    });

    assert_eq!(extract_text(&body, "|").unwrap(), "one|two|three");
}

#[test]
fn test_parts_without_text_contribute_empty_strings() {
    let body = json!({
        "candidates": [{
            "content": {"parts": [
                {"text": "see"},
                {"inlineData": {"mimeType": "image/png", "data": "AAAA"}},
                {"text": "image"}
            ]}
        }]
    });

    assert_eq!(extract_text(&body, " ").unwrap(), "see  image");
}

#[test]
fn test_candidate_without_content() {
    let body = json!({"candidates": [{"finishReason": "SAFETY"}]});
    assert_eq!(extract_text(&body, " ").unwrap(), "");
}

#[test]
fn test_empty_candidates() {
    let body = json!({"candidates": []});
    assert_eq!(extract_text(&body, " ").unwrap(), "");
}

#[test]
fn test_missing_candidates_is_an_error() {
    let body = json!({"promptFeedback": {"blockReason": "SAFETY"}});

    let result = extract_text(&body, " ");

    assert!(matches!(
        result,
        Err(GeminiError::Response(ResponseError::MissingField { ref field })) if field == "candidates"
    ));
}

#[test]
fn test_normalize_is_idempotent_on_structured_input() {
    // Arrange
    let inputs = vec![
        ResponseBody::Empty,
        ResponseBody::Json(json!({"candidates": []})),
        ResponseBody::Json(json!([{"candidates": []}, {"candidates": []}])),
        ResponseBody::Text(String::new()),
    ];

    for input in inputs {
        // Act
        let once = normalize_body(input.clone()).unwrap();
        let twice = normalize_body(once.clone()).unwrap();

        // Assert
        assert_eq!(once, input);
        assert_eq!(twice, once);
    }
}

#[test]
fn test_malformed_text_body() {
    let raw = "{\"candidates\": [";

    let result = normalize_body(ResponseBody::Text(raw.to_string()));

    match result {
        Err(GeminiError::Response(ResponseError::MalformedDocument { body, .. })) => {
            assert_eq!(body, raw);
        }
        other => panic!("Expected MalformedDocument, got {:?}", other),
    }
}

#[test]
fn test_nested_arrays_are_flattened() {
    let body = ResponseBody::Json(json!([[document(&["a"])], document(&["b"])]));

    let documents = body.into_documents();

    assert_eq!(documents.len(), 2);
    assert_eq!(extract_text_from_documents(&documents, " ").unwrap(), "a b");
}
