//! Content generation service for Gemini API.

mod output;
mod service;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GeminiResult;
use crate::streaming::DecodedResult;

pub use output::{CallOptions, GenerationOutput};
pub use service::ContentServiceImpl;

/// Callback invoked once per document completed on a stream.
pub type StreamCallback<'a> = &'a mut (dyn FnMut(&DecodedResult) + Send);

/// Service for content generation with Gemini models.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Call `generateContent`.
    ///
    /// Server-sent events are off unless `options` turns them on.
    async fn generate_content(
        &self,
        payload: Value,
        options: CallOptions,
    ) -> GeminiResult<GenerationOutput>;

    /// Call `streamGenerateContent`.
    ///
    /// Server-sent events are on unless `options` turns them off. With
    /// server-sent events, `callback` receives every document as soon as it is
    /// complete; passing a callback with them turned off is an error.
    async fn stream_generate_content(
        &self,
        payload: Value,
        options: CallOptions,
        callback: Option<StreamCallback<'_>>,
    ) -> GeminiResult<GenerationOutput>;
}
