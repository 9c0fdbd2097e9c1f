//! Integration tests for the content generation service.

use std::sync::Arc;

use integrations_gemini_ai::config::Backend;
use integrations_gemini_ai::error::{ConfigurationError, GeminiError, NetworkError};
use integrations_gemini_ai::fixtures::{load_bytes_fixture, load_fixture};
use integrations_gemini_ai::mocks::{MockHttpTransport, MockTokenProvider};
use integrations_gemini_ai::observability::{NoopLogger, NoopTracer};
use integrations_gemini_ai::streaming::DecodedResult;
use integrations_gemini_ai::transport::{HttpMethod, TransportError};
use integrations_gemini_ai::types::GenerateContentRequest;
use integrations_gemini_ai::{CallOptions, GeminiClient, GeminiClientBuilder, GeminiClientImpl};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;

/// Helper to create a client over a mock transport.
fn create_test_client(transport: Arc<MockHttpTransport>) -> GeminiClientImpl {
    GeminiClientBuilder::new()
        .api_key(SecretString::new("test-key".into()))
        .default_model("gemini-1.5-flash")
        .transport(transport)
        .logger(Arc::new(NoopLogger))
        .tracer(Arc::new(NoopTracer))
        .build()
        .unwrap()
}

fn payload() -> serde_json::Value {
    GenerateContentRequest::from_text("Tell me a story").to_payload().unwrap()
}

#[tokio::test]
async fn test_generate_content_success() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(200, &load_fixture("content/success_response.json"));
    let client = create_test_client(transport.clone());

    // Act
    let output = client
        .content()
        .generate_content(payload(), CallOptions::new())
        .await
        .unwrap();

    // Assert
    assert_eq!(output.text().unwrap(), "The capital of France is Paris.");
    let responses = output.responses().unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].usage_metadata.as_ref().unwrap().total_token_count, 15);

    transport.verify_request_count(1);
    transport.verify_request(0, HttpMethod::Post, "/v1/models/gemini-1.5-flash:generateContent");
    transport.verify_header(0, "x-goog-api-key", "test-key");
    transport.verify_header(0, "Content-Type", "application/json");
}

#[tokio::test]
async fn test_request_body_is_the_payload() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(200, r#"{"candidates":[]}"#);
    let client = create_test_client(transport.clone());

    // Act
    client
        .content()
        .generate_content(payload(), CallOptions::new())
        .await
        .unwrap();

    // Assert
    let request = transport.last_request().unwrap();
    let sent: serde_json::Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
    assert_eq!(sent, json!({"contents": [{"role": "user", "parts": [{"text": "Tell me a story"}]}]}));
    assert!(request.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_stream_generate_content_with_callback() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    let body = load_bytes_fixture("streaming/two_documents.sse");
    let (first, second) = body.split_at(body.len() / 2);
    transport.enqueue_streaming_response(200, vec![first.to_vec(), second.to_vec()]);
    let client = create_test_client(transport.clone());

    let mut received = Vec::new();
    let mut callback = |result: &DecodedResult| received.push(result.text.clone());

    // Act
    let output = client
        .content()
        .stream_generate_content(payload(), CallOptions::new(), Some(&mut callback))
        .await
        .unwrap();

    // Assert
    assert_eq!(received, vec!["Hello".to_string(), "world!".to_string()]);
    assert_eq!(output.documents().len(), 2);
    assert_eq!(output.text().unwrap(), "Hello world!");
    transport.verify_request(0, HttpMethod::Post, ":streamGenerateContent?alt=sse");
    transport.verify_header(0, "Accept", "text/event-stream");
}

#[tokio::test]
async fn test_stream_without_callback_still_collects_documents() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_streaming_response(200, vec![load_bytes_fixture("streaming/crlf_with_comments.sse")]);
    let client = create_test_client(transport);

    let output = client
        .content()
        .stream_generate_content(payload(), CallOptions::new(), None)
        .await
        .unwrap();

    assert_eq!(output.text_with("/").unwrap(), "Bonjour/le monde");
}

#[tokio::test]
async fn test_generate_content_with_server_sent_events() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_streaming_response(200, vec![load_bytes_fixture("streaming/two_documents.sse")]);
    let client = create_test_client(transport.clone());
    let mut count = 0;
    let mut callback = |_: &DecodedResult| count += 1;

    let output = client
        .content()
        .stream_generate_content(
            payload(),
            CallOptions::new().server_sent_events(true).model("gemini-1.5-pro"),
            Some(&mut callback),
        )
        .await
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(output.documents().len(), 2);
    transport.verify_request(0, HttpMethod::Post, "/models/gemini-1.5-pro:streamGenerateContent");
}

#[tokio::test]
async fn test_generate_content_sse_opt_in() {
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_streaming_response(200, vec![load_bytes_fixture("streaming/two_documents.sse")]);
    let client = create_test_client(transport.clone());

    let output = client
        .content()
        .generate_content(payload(), CallOptions::new().server_sent_events(true))
        .await
        .unwrap();

    assert_eq!(output.text().unwrap(), "Hello world!");
    transport.verify_request(0, HttpMethod::Post, ":generateContent?alt=sse");
}

#[tokio::test]
async fn test_stream_without_server_sent_events_reads_ndjson() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(200, load_fixture("content/multi_document.ndjson").trim_end());
    let client = create_test_client(transport.clone());

    // Act
    let output = client
        .content()
        .stream_generate_content(payload(), CallOptions::new().server_sent_events(false), None)
        .await
        .unwrap();

    // Assert
    assert_eq!(output.documents().len(), 2);
    assert_eq!(output.text().unwrap(), "Once upon a time.");
    let request = transport.last_request().unwrap();
    assert!(!request.url.contains("alt=sse"));
    assert!(!request.headers.contains_key("Accept"));
}

#[tokio::test]
async fn test_callback_rejected_without_server_sent_events() {
    let transport = Arc::new(MockHttpTransport::new());
    let client = create_test_client(transport.clone());
    let mut callback = |_: &DecodedResult| {};

    let result = client
        .content()
        .stream_generate_content(
            payload(),
            CallOptions::new().server_sent_events(false),
            Some(&mut callback),
        )
        .await;

    assert!(matches!(
        result,
        Err(GeminiError::Configuration(ConfigurationError::CallbackWithoutServerSentEvents))
    ));
    transport.verify_request_count(0);
}

#[tokio::test]
async fn test_http_error_on_complete_call() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    let body = load_fixture("errors/internal_error.json");
    transport.enqueue_json_response(500, &body);
    let client = create_test_client(transport);

    // Act
    let error = client
        .content()
        .generate_content(payload(), CallOptions::new())
        .await
        .unwrap_err();

    // Assert
    assert_eq!(error.status(), Some(500));
    assert_eq!(error.payload(), Some(body.as_str()));
}

#[tokio::test]
async fn test_http_error_on_stream_skips_callback() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    let body = load_fixture("errors/vertex_permission_denied.json");
    transport.enqueue_streaming_response(403, vec![body.clone()]);
    let client = create_test_client(transport);
    let mut calls = 0;
    let mut callback = |_: &DecodedResult| calls += 1;

    // Act
    let error = client
        .content()
        .stream_generate_content(payload(), CallOptions::new(), Some(&mut callback))
        .await
        .unwrap_err();

    // Assert
    assert_eq!(calls, 0);
    assert_eq!(error.status(), Some(403));
    assert!(error.to_string().contains("PERMISSION_DENIED"));
}

#[tokio::test]
async fn test_interrupted_stream_keeps_delivered_documents_in_callback() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_interrupted_stream(
        vec!["data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"partial\"}]}}]}\n\n"],
        TransportError::Stream("connection reset".into()),
    );
    let client = create_test_client(transport);
    let mut received = Vec::new();
    let mut callback = |result: &DecodedResult| received.push(result.text.clone());

    // Act
    let result = client
        .content()
        .stream_generate_content(payload(), CallOptions::new(), Some(&mut callback))
        .await;

    // Assert
    assert!(matches!(
        result,
        Err(GeminiError::Network(NetworkError::StreamInterrupted { .. }))
    ));
    assert_eq!(received, vec!["partial".to_string()]);
}

#[tokio::test]
async fn test_vertex_backend_with_token_provider() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(200, r#"{"candidates":[]}"#);
    transport.enqueue_json_response(200, r#"{"candidates":[]}"#);
    let provider = Arc::new(MockTokenProvider::new());
    let client = GeminiClientBuilder::new()
        .backend(Backend::vertex_ai("europe-west4", "my-project"))
        .token_provider(provider.clone())
        .default_model("gemini-1.5-pro")
        .transport(transport.clone())
        .logger(Arc::new(NoopLogger))
        .tracer(Arc::new(NoopTracer))
        .build()
        .unwrap();

    // Act
    for _ in 0..2 {
        client
            .content()
            .generate_content(payload(), CallOptions::new())
            .await
            .unwrap();
    }

    // Assert
    transport.verify_request(
        0,
        HttpMethod::Post,
        "https://europe-west4-aiplatform.googleapis.com/v1/projects/my-project/locations/europe-west4/publishers/google/models/gemini-1.5-pro:generateContent",
    );
    transport.verify_header(1, "Authorization", "Bearer mock-token-1");
    assert_eq!(provider.fetch_count(), 1);
}
