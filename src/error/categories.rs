//! Error category types for granular error handling.

use std::time::Duration;
use thiserror::Error;

/// Configuration-related errors.
///
/// These are raised while building a client or preparing a call, never while a
/// stream is being decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Missing credentials: provide an API key or a bearer token")]
    MissingCredentials,

    #[error("Unsupported service: {service}")]
    UnsupportedService { service: String },

    #[error("A region is required for the Vertex AI service")]
    MissingRegion,

    #[error("Could not determine project_id, which is required for the Vertex AI service")]
    MissingProjectId,

    #[error("No model given for the call and no default model configured")]
    MissingModel,

    #[error("Invalid base URL: {url}")]
    InvalidBaseUrl { url: String },

    #[error("A stream callback requires server-sent events to be enabled")]
    CallbackWithoutServerSentEvents,

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Authentication-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Access token unavailable: {message}")]
    TokenUnavailable { message: String },

    #[error("Invalid credentials: {message}")]
    InvalidCredentials { message: String },
}

/// Errors reported by the API through a non-success HTTP status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The transport answered with a non-success status. `payload` holds the
    /// response body (or the chunk that carried the status on a stream).
    #[error("HTTP {status}: {message}")]
    HttpStatus {
        status: u16,
        message: String,
        payload: String,
        request_id: Option<String>,
    },
}

impl RequestError {
    /// The HTTP status code of the failed request.
    pub fn status(&self) -> u16 {
        match self {
            RequestError::HttpStatus { status, .. } => *status,
        }
    }

    /// The raw error payload returned by the API.
    pub fn payload(&self) -> &str {
        match self {
            RequestError::HttpStatus { payload, .. } => payload,
        }
    }
}

/// Network-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timed out after {duration:?}")]
    Timeout { duration: Duration },

    #[error("Stream interrupted: {message}")]
    StreamInterrupted { message: String },
}

/// Response parsing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseError {
    #[error("Malformed response document: {message}")]
    MalformedDocument { message: String, body: String },

    #[error("Response document is missing required field `{field}`")]
    MissingField { field: String },
}
