//! Main error type for the Gemini API client.

use thiserror::Error;
use super::categories::*;

/// Result type alias for Gemini operations.
pub type GeminiResult<T> = Result<T, GeminiError>;

/// Top-level error type for the Gemini integration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeminiError {
    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Credentials could not be obtained or were rejected.
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    /// The API answered with a non-success status.
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// The transport failed.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// A response document could not be read.
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),
}

impl GeminiError {
    /// Returns the HTTP status for errors raised by a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            GeminiError::Request(e) => Some(e.status()),
            _ => None,
        }
    }

    /// Returns the offending payload for HTTP status errors.
    pub fn payload(&self) -> Option<&str> {
        match self {
            GeminiError::Request(e) => Some(e.payload()),
            GeminiError::Response(ResponseError::MalformedDocument { body, .. }) => Some(body),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GeminiError {
    fn from(err: serde_json::Error) -> Self {
        GeminiError::Response(ResponseError::MalformedDocument {
            message: err.to_string(),
            body: String::new(),
        })
    }
}
