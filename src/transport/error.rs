//! Transport layer error types.

use std::time::Duration;

use crate::error::{GeminiError, NetworkError};

/// Transport error.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The connection could not be established or was reset.
    #[error("Connection error: {0}")]
    Connection(String),
    /// The request timed out.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    /// The request could not be sent.
    #[error("Request error: {0}")]
    Request(String),
    /// Reading the response body failed.
    #[error("Stream error: {0}")]
    Stream(String),
}

impl From<TransportError> for GeminiError {
    fn from(err: TransportError) -> Self {
        let network = match err {
            TransportError::Connection(message) | TransportError::Request(message) => {
                NetworkError::ConnectionFailed { message }
            }
            TransportError::Timeout(duration) => NetworkError::Timeout { duration },
            TransportError::Stream(message) => NetworkError::StreamInterrupted { message },
        };
        GeminiError::Network(network)
    }
}
