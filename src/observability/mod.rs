//! Observability layer for the Gemini API client.
//!
//! # Overview
//!
//! This module provides trait-based abstractions for:
//! - **Logging**: Structured logging with sensitive data redaction
//! - **Tracing**: Spans with attributes, status and duration
//!
//! Both emit through the `tracing` crate; install a subscriber (for example
//! `tracing-subscriber`) to see the output.
//!
//! # Examples
//!
//! ## Using the Structured Logger
//!
//! ```rust
//! use integrations_gemini_ai::observability::{Logger, StructuredLogger};
//! use integrations_gemini_ai::config::LogLevel;
//! use serde_json::json;
//!
//! let logger = StructuredLogger::new("gemini.content")
//!     .with_level(LogLevel::Debug);
//!
//! logger.info("Starting content generation", json!({
//!     "model": "gemini-pro",
//!     "api_key": "never printed"
//! }));
//! ```
//!
//! ## Using the Tracer
//!
//! ```rust
//! use integrations_gemini_ai::observability::{Tracer, TracingTracer, SpanStatus};
//!
//! let tracer = TracingTracer::new("gemini");
//! let mut span = tracer.start_span("content.stream_generate");
//!
//! span.set_attribute("model", "gemini-pro");
//! span.set_status(SpanStatus::Ok);
//! span.end();
//! ```

pub mod logging;
pub mod tracing;

pub use self::logging::{Logger, NoopLogger, StructuredLogger};
pub use self::tracing::{NoopTracer, Span, SpanStatus, Tracer, TracingSpan, TracingTracer};

use std::sync::Arc;

use crate::config::LogLevel;

/// Create a default observability stack.
///
/// Returns a (logger, tracer) pair emitting through `tracing`.
pub fn create_default_stack(service_name: &str, level: LogLevel) -> (Arc<dyn Logger>, Arc<dyn Tracer>) {
    let logger = Arc::new(StructuredLogger::new(service_name).with_level(level));
    let tracer = Arc::new(TracingTracer::new(service_name));

    (logger, tracer)
}

/// Create a no-op observability stack, suitable for tests.
pub fn create_noop_stack() -> (Arc<dyn Logger>, Arc<dyn Tracer>) {
    (Arc::new(NoopLogger), Arc::new(NoopTracer))
}
