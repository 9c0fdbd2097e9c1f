//! # Google Gemini API Client
//!
//! Rust client for content generation with Google Gemini models, served either
//! by the Generative Language API or by Vertex AI.
//!
//! ## Features
//!
//! - `generateContent` and `streamGenerateContent` calls with JSON payloads
//! - Incremental Server-Sent Events decoding with a per-document callback
//! - Text extraction across candidates, parts and documents
//! - API key (header or query parameter) and refreshable bearer token authentication
//! - Structured logging and tracing through the `tracing` crate
//! - Secure credential handling with `SecretString`
//! - Mock transport and fixtures for testing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use integrations_gemini_ai::{create_client, CallOptions, DecodedResult, GeminiConfig};
//! use secrecy::SecretString;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GeminiConfig::builder()
//!         .api_key(SecretString::new("your-api-key".into()))
//!         .default_model("gemini-1.5-flash")
//!         .build()?;
//!
//!     let client = create_client(config)?;
//!     let payload = json!({"contents": [{"role": "user", "parts": [{"text": "Tell me a story"}]}]});
//!
//!     let mut print = |result: &DecodedResult| print!("{}", result.text);
//!     let output = client
//!         .content()
//!         .stream_generate_content(payload, CallOptions::new(), Some(&mut print))
//!         .await?;
//!
//!     println!("\n{} documents", output.documents().len());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - `client` - Main client interface and factory functions
//! - `config` - Configuration types, backends and builder
//! - `auth` - API key and bearer token authentication
//! - `transport` - HTTP transport layer and request construction
//! - `streaming` - SSE parsing and stream decoding
//! - `response` - Body normalization and text extraction
//! - `error` - Error types and taxonomy
//! - `types` - Typed request and response documents
//! - `services` - Content generation service

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod observability;
pub mod response;
pub mod services;
pub mod streaming;
pub mod transport;
pub mod types;

// Development/testing modules - always available for integration tests
pub mod mocks;
pub mod fixtures;

// Re-exports for convenience
pub use auth::{
    AccessToken, ApiKeyAuthManager, AuthManager, BearerTokenAuthManager, ServiceAccountKey,
    ServiceAccountTokenProvider, StaticTokenProvider, TokenProvider,
};
pub use client::{
    create_client, create_client_from_env, DefaultClientFactory, GeminiClient,
    GeminiClientBuilder, GeminiClientFactory, GeminiClientImpl,
};
pub use config::{
    AuthMethod, Backend, Credentials, GeminiConfig, GeminiConfigBuilder, LogLevel, ServiceName,
    DEFAULT_API_VERSION, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS,
};
pub use error::{
    // Main error types
    GeminiError,
    GeminiResult,
    // Error categories
    AuthenticationError,
    ConfigurationError,
    NetworkError,
    RequestError,
    ResponseError,
    // Error mapping utilities
    map_http_status,
};
pub use transport::{
    ChunkedStream, GenerateMethod, HttpMethod, HttpRequest, HttpResponse, HttpTransport,
    ReqwestTransport, RequestBuilder, ResponseParser, StreamingResponse, TransportError,
    TransportInfo,
};

// Streaming and response re-exports
pub use response::{
    extract_text, extract_text_from_documents, normalize_body, ResponseBody,
    DEFAULT_JOIN_SEPARATOR,
};
pub use streaming::{DecodedResult, RawChunk, SseEvent, SseParser, StreamDecoder};

// Type re-exports
pub use types::{
    // Content types
    Blob, Content, FileData, FunctionCall, FunctionResponse, Part, Role,
    // Safety types
    HarmBlockThreshold, HarmCategory, HarmProbability, SafetyRating, SafetySetting,
    // Generation types
    BlockReason, Candidate, CitationMetadata, CitationSource, FinishReason, GenerationConfig,
    PromptFeedback, UsageMetadata,
    // Request/Response types
    GenerateContentRequest, GenerateContentResponse,
};

// Service re-exports
pub use services::{CallOptions, ContentService, ContentServiceImpl, GenerationOutput, StreamCallback};

// Observability re-exports
pub use observability::{
    // Logging
    Logger, NoopLogger, StructuredLogger,
    // Tracing
    NoopTracer, Span, SpanStatus, Tracer, TracingSpan, TracingTracer,
    // Factory functions
    create_default_stack, create_noop_stack,
};
