//! Client trait definitions for Gemini API.

use std::sync::Arc;

use crate::config::GeminiConfig;
use crate::error::GeminiError;
use crate::services::ContentService;

/// Main client for interacting with Google Gemini API.
pub trait GeminiClient: Send + Sync {
    /// Access the content generation service.
    fn content(&self) -> &dyn ContentService;

    /// The configuration the client was built with.
    fn config(&self) -> &GeminiConfig;
}

/// Factory for creating Gemini clients.
pub trait GeminiClientFactory: Send + Sync {
    /// Create a new client with the given configuration.
    fn create(&self, config: GeminiConfig) -> Result<Arc<dyn GeminiClient>, GeminiError>;
}
