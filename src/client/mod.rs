//! Client interface and factory for Gemini API.
//!
//! Provides the main `GeminiClient` implementation with builder pattern,
//! a lazily created content service, and factory methods for client creation.

mod builder;
mod client;
mod traits;

// Re-export public API
pub use builder::GeminiClientBuilder;
pub use client::{create_client, create_client_from_env, DefaultClientFactory, GeminiClientImpl};
pub use traits::{GeminiClient, GeminiClientFactory};
