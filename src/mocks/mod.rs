//! Mock implementations for testing.
//!
//! This module provides mock implementations of transport and authentication
//! components for testing the Gemini API client in isolation.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use secrecy::SecretString;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::auth::{AccessToken, AuthManager, TokenProvider};
use crate::error::GeminiResult;
use crate::transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, StreamingResponse, TransportError,
    TransportInfo,
};

enum MockResponse {
    Complete(HttpResponse),
    Streaming {
        info: TransportInfo,
        chunks: Vec<Result<Bytes, TransportError>>,
    },
    Failure(TransportError),
}

/// Mock HTTP transport for testing.
///
/// Responses are returned in the order they were enqueued, whichever of
/// `send` or `send_streaming` is called. A complete response served to
/// `send_streaming` arrives as one chunk; a streaming response served to
/// `send` has its chunks concatenated.
///
/// # Example
///
/// ```
/// use integrations_gemini_ai::mocks::MockHttpTransport;
/// use integrations_gemini_ai::transport::{HttpMethod, HttpRequest, HttpTransport};
/// use std::collections::HashMap;
///
/// # #[tokio::main]
/// # async fn main() {
/// let transport = MockHttpTransport::new();
/// transport.enqueue_json_response(200, r#"{"candidates": []}"#);
///
/// let request = HttpRequest {
///     method: HttpMethod::Post,
///     url: "https://example.com".to_string(),
///     headers: HashMap::new(),
///     body: None,
/// };
///
/// let response = transport.send(request).await.unwrap();
/// assert_eq!(response.status, 200);
/// transport.verify_request_count(1);
/// # }
/// ```
pub struct MockHttpTransport {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockHttpTransport {
    /// Create a new mock HTTP transport.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn enqueue(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Enqueue a complete response.
    pub fn enqueue_response(&self, response: HttpResponse) {
        self.enqueue(MockResponse::Complete(response));
    }

    /// Enqueue a JSON response with the given status code and body.
    pub fn enqueue_json_response(&self, status: u16, body: &str) {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        self.enqueue_response(HttpResponse {
            status,
            headers,
            body: Bytes::from(body.to_string()),
        });
    }

    /// Enqueue a transport failure.
    pub fn enqueue_error(&self, error: TransportError) {
        self.enqueue(MockResponse::Failure(error));
    }

    /// Enqueue a streaming response delivering `chunks` one read at a time.
    pub fn enqueue_streaming_response<B: Into<Bytes>>(&self, status: u16, chunks: Vec<B>) {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "text/event-stream".to_string());

        self.enqueue(MockResponse::Streaming {
            info: TransportInfo { status, headers },
            chunks: chunks.into_iter().map(|chunk| Ok(chunk.into())).collect(),
        });
    }

    /// Enqueue a streaming response that fails after delivering `chunks`.
    pub fn enqueue_interrupted_stream<B: Into<Bytes>>(&self, chunks: Vec<B>, error: TransportError) {
        let mut chunks: Vec<Result<Bytes, TransportError>> =
            chunks.into_iter().map(|chunk| Ok(chunk.into())).collect();
        chunks.push(Err(error));

        self.enqueue(MockResponse::Streaming {
            info: TransportInfo::new(200),
            chunks,
        });
    }

    /// Get all requests that were made.
    pub fn get_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Get the last request that was made.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Verify that exactly `expected` requests were made.
    pub fn verify_request_count(&self, expected: usize) {
        let actual = self.requests.lock().unwrap().len();
        assert_eq!(actual, expected, "Expected {} requests, got {}", expected, actual);
    }

    /// Verify that a request was made with the expected method and URL.
    pub fn verify_request(&self, index: usize, method: HttpMethod, url_contains: &str) {
        let requests = self.requests.lock().unwrap();
        assert!(index < requests.len(), "No request at index {}", index);

        let request = &requests[index];
        assert_eq!(request.method, method, "Expected method {:?}, got {:?}", method, request.method);
        assert!(
            request.url.contains(url_contains),
            "Expected URL to contain '{}', got '{}'",
            url_contains,
            request.url
        );
    }

    /// Verify that a request contains a specific header.
    pub fn verify_header(&self, index: usize, header_name: &str, header_value: &str) {
        let requests = self.requests.lock().unwrap();
        assert!(index < requests.len(), "No request at index {}", index);

        let actual_value = requests[index].headers.get(header_name);
        assert_eq!(
            actual_value,
            Some(&header_value.to_string()),
            "Expected header '{}' to be '{}', got {:?}",
            header_name,
            header_value,
            actual_value
        );
    }

    fn next_response(&self, request: HttpRequest) -> Result<MockResponse, TransportError> {
        self.requests.lock().unwrap().push(request);

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::Connection("No response configured in MockHttpTransport".into()))
    }
}

impl Default for MockHttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        match self.next_response(request)? {
            MockResponse::Complete(response) => Ok(response),
            MockResponse::Streaming { info, chunks } => {
                let mut body = Vec::new();
                for chunk in chunks {
                    body.extend_from_slice(&chunk?);
                }
                Ok(HttpResponse {
                    status: info.status,
                    headers: info.headers,
                    body: Bytes::from(body),
                })
            }
            MockResponse::Failure(error) => Err(error),
        }
    }

    async fn send_streaming(&self, request: HttpRequest) -> Result<StreamingResponse, TransportError> {
        let (info, chunks) = match self.next_response(request)? {
            MockResponse::Complete(response) => (
                TransportInfo {
                    status: response.status,
                    headers: response.headers,
                },
                vec![Ok(response.body)],
            ),
            MockResponse::Streaming { info, chunks } => (info, chunks),
            MockResponse::Failure(error) => return Err(error),
        };

        Ok(StreamingResponse {
            info,
            body: Box::pin(stream::iter(chunks)),
        })
    }
}

/// Mock authentication manager for testing.
///
/// # Example
///
/// ```
/// use integrations_gemini_ai::mocks::MockAuthManager;
/// use integrations_gemini_ai::auth::AuthManager;
///
/// let auth = MockAuthManager::with_query_param("test-api-key");
/// assert_eq!(auth.auth_query_param(), Some(("key".to_string(), "test-api-key".to_string())));
/// ```
#[derive(Clone)]
pub struct MockAuthManager {
    api_key: String,
    use_header: bool,
}

impl MockAuthManager {
    /// Create a new mock auth manager with the given API key.
    /// By default, uses header authentication.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            use_header: true,
        }
    }

    /// Create a mock auth manager that uses query parameter authentication.
    pub fn with_query_param(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            use_header: false,
        }
    }
}

#[async_trait]
impl AuthManager for MockAuthManager {
    async fn auth_header(&self) -> GeminiResult<Option<(String, String)>> {
        Ok(self
            .use_header
            .then(|| ("x-goog-api-key".to_string(), self.api_key.clone())))
    }

    fn auth_query_param(&self) -> Option<(String, String)> {
        (!self.use_header).then(|| ("key".to_string(), self.api_key.clone()))
    }
}

/// Mock token provider counting how often a token was fetched.
pub struct MockTokenProvider {
    fetches: AtomicUsize,
    lifetime: Option<Duration>,
}

impl MockTokenProvider {
    /// Create a provider whose tokens never expire.
    pub fn new() -> Self {
        Self {
            fetches: AtomicUsize::new(0),
            lifetime: None,
        }
    }

    /// Create a provider whose tokens expire after `lifetime`.
    pub fn expiring_after(lifetime: Duration) -> Self {
        Self {
            fetches: AtomicUsize::new(0),
            lifetime: Some(lifetime),
        }
    }

    /// Number of tokens fetched so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Default for MockTokenProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenProvider for MockTokenProvider {
    async fn fetch_token(&self) -> GeminiResult<AccessToken> {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        let token = SecretString::new(format!("mock-token-{}", n));

        Ok(match self.lifetime {
            Some(lifetime) => AccessToken::expiring_in(token, lifetime),
            None => AccessToken::new(token),
        })
    }
}
