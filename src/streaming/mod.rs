//! Streaming support for Gemini API responses.
//!
//! With `alt=sse`, both backends stream a generation as Server-Sent Events
//! whose `data` fields carry JSON documents:
//!
//! ```text
//! data: {"candidates":[{"content":{"parts":[{"text":"Hel"}]}}]}
//!
//! data: {"candidates":[{"content":{"parts":[{"text":"lo"}]}}]}
//! ```
//!
//! Network reads do not respect event or document boundaries. The
//! [`SseParser`] re-segments bytes into events, and the [`StreamDecoder`]
//! accumulates event data until it forms a complete document, then emits a
//! [`DecodedResult`] carrying the extracted text.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use integrations_gemini_ai::streaming::{RawChunk, StreamDecoder};
//! use integrations_gemini_ai::transport::TransportInfo;
//!
//! let info = Arc::new(TransportInfo::new(200));
//! let mut decoder = StreamDecoder::new();
//! let mut texts = Vec::new();
//!
//! for part in ["data: {\"candidates\":[", "{\"content\":{\"parts\":[{\"text\":\"ok\"}]}}]}\n\n"] {
//!     decoder.feed(&RawChunk::new(part, Arc::clone(&info)), |result| texts.push(result.text)).unwrap();
//! }
//! decoder.finish();
//!
//! assert_eq!(texts, vec!["ok".to_string()]);
//! ```

mod decoder;
mod sse;

pub use decoder::{DecodedResult, RawChunk, StreamDecoder};
pub use sse::{SseEvent, SseParser};
