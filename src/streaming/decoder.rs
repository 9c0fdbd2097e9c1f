//! Decoder turning raw SSE chunks into complete response documents.

use std::borrow::Cow;
use std::sync::Arc;

use bytes::Bytes;
use serde_json::Value;

use crate::error::{map_http_status, GeminiResult};
use crate::response::{extract_text, DEFAULT_JOIN_SEPARATOR};
use crate::transport::TransportInfo;
use super::sse::{SseEvent, SseParser};

/// One network read of a streamed response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChunk {
    /// The bytes as received.
    pub bytes: Bytes,
    /// Status and headers of the response the chunk belongs to.
    pub info: Arc<TransportInfo>,
}

impl RawChunk {
    /// Create a chunk.
    pub fn new(bytes: impl Into<Bytes>, info: Arc<TransportInfo>) -> Self {
        Self {
            bytes: bytes.into(),
            info,
        }
    }

    /// The chunk as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

/// A response document completed on the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedResult {
    /// Text of all candidate parts, joined by the decoder's separator.
    pub text: String,
    /// The parsed document.
    pub document: Value,
    /// The SSE event whose data completed the document.
    pub event: SseEvent,
    /// The chunk that carried that event.
    pub raw: RawChunk,
}

/// Decodes one streaming call.
///
/// Event data is accumulated until it parses as a complete JSON document.
/// Each document is handed to the callback exactly once, after which the
/// accumulator starts over. A decoder must not be reused across calls.
#[derive(Debug)]
pub struct StreamDecoder {
    parser: SseParser,
    partial_json: String,
    separator: String,
    finish_reason_seen: bool,
    emitted: usize,
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamDecoder {
    /// Create a decoder joining text with a single space.
    pub fn new() -> Self {
        Self::with_separator(DEFAULT_JOIN_SEPARATOR)
    }

    /// Create a decoder joining text with `separator`.
    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            parser: SseParser::new(),
            partial_json: String::new(),
            separator: separator.into(),
            finish_reason_seen: false,
            emitted: 0,
        }
    }

    /// Feed one chunk, invoking `callback` for every document it completes.
    ///
    /// Returns the number of documents emitted for this chunk. A chunk whose
    /// transport status is not a success is not parsed: its content becomes
    /// the payload of the returned error.
    pub fn feed<F>(&mut self, chunk: &RawChunk, mut callback: F) -> GeminiResult<usize>
    where
        F: FnMut(DecodedResult),
    {
        if !chunk.info.is_success() {
            tracing::warn!(
                status = chunk.info.status,
                body = %chunk.text(),
                "Stream chunk received with an error status"
            );
            return Err(map_http_status(chunk.info.status, &chunk.info.headers, &chunk.bytes));
        }

        let mut emitted = 0;

        for event in self.parser.feed(&chunk.bytes) {
            self.partial_json.push_str(&event.data);

            let Some(document) = parse_partial_json(&self.partial_json) else {
                continue;
            };
            self.partial_json.clear();

            let text = extract_text(&document, &self.separator)?;
            let has_finish_reason = has_finish_reason(&document);

            callback(DecodedResult {
                text,
                document,
                event,
                raw: chunk.clone(),
            });

            emitted += 1;

            if has_finish_reason {
                self.finish_reason_seen = true;
                tracing::debug!("Candidate finish reason received");
            }
        }

        self.emitted += emitted;
        if emitted > 0 {
            tracing::debug!(documents = emitted, total = self.emitted, "Stream documents decoded");
        }

        Ok(emitted)
    }

    /// Feed one chunk and collect the documents it completes.
    pub fn feed_collect(&mut self, chunk: &RawChunk) -> GeminiResult<Vec<DecodedResult>> {
        let mut results = Vec::new();
        self.feed(chunk, |result| results.push(result))?;
        Ok(results)
    }

    /// Signal the end of the stream.
    ///
    /// Data that never formed a complete document is discarded.
    pub fn finish(&mut self) {
        if !self.partial_json.trim().is_empty() || self.parser.has_pending() {
            tracing::warn!(
                buffered = self.partial_json.len(),
                "Stream ended with incomplete data, discarding it"
            );
        }
        self.partial_json.clear();
    }

    /// Whether any emitted document carried a candidate finish reason.
    pub fn finish_reason_seen(&self) -> bool {
        self.finish_reason_seen
    }

    /// Number of documents emitted so far.
    pub fn documents_emitted(&self) -> usize {
        self.emitted
    }
}

/// Parses the accumulator if it holds a complete JSON object or array.
fn parse_partial_json(partial: &str) -> Option<Value> {
    let trimmed = partial.trim_start();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

fn has_finish_reason(document: &Value) -> bool {
    document
        .get("candidates")
        .and_then(Value::as_array)
        .is_some_and(|candidates| {
            candidates.iter().any(|candidate| {
                candidate
                    .get("finishReason")
                    .and_then(Value::as_str)
                    .is_some_and(|reason| !reason.is_empty())
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GeminiError, ResponseError};
    use serde_json::json;

    fn ok_info() -> Arc<TransportInfo> {
        Arc::new(TransportInfo::new(200))
    }

    fn chunk(text: &str) -> RawChunk {
        RawChunk::new(text.to_string(), ok_info())
    }

    #[test]
    fn test_complete_event_emits_document() {
        let mut decoder = StreamDecoder::new();
        let results = decoder
            .feed_collect(&chunk(
                "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hello\"}]}}]}\n\n",
            ))
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "Hello");
        assert_eq!(results[0].document["candidates"][0]["content"]["parts"][0]["text"], "Hello");
        assert_eq!(results[0].raw.info.status, 200);
    }

    #[test]
    fn test_document_completed_by_second_event() {
        let mut decoder = StreamDecoder::new();

        let first = decoder.feed_collect(&chunk("data: {\"candidates\":\n\n")).unwrap();
        assert!(first.is_empty());

        let second = decoder
            .feed_collect(&chunk("data: [{\"content\":{\"parts\":[{\"text\":\"ok\"}]}}]}\n\n"))
            .unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].text, "ok");
        assert_eq!(second[0].event.data, "[{\"content\":{\"parts\":[{\"text\":\"ok\"}]}}]}");
    }

    #[test]
    fn test_non_json_data_is_ignored() {
        let mut decoder = StreamDecoder::new();
        let results = decoder.feed_collect(&chunk("data: hello\n\n")).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_error_status_intercepted_before_parsing() {
        let mut decoder = StreamDecoder::new();
        let info = Arc::new(TransportInfo::new(500));
        let body = "data: {\"candidates\":[]}\n\n";
        let mut calls = 0;

        let result = decoder.feed(&RawChunk::new(body.to_string(), info), |_| calls += 1);

        let error = result.unwrap_err();
        assert_eq!(error.status(), Some(500));
        assert_eq!(error.payload(), Some(body));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_missing_candidates_is_an_error() {
        let mut decoder = StreamDecoder::new();
        let result = decoder.feed_collect(&chunk("data: {\"usageMetadata\":{}}\n\n"));

        assert!(matches!(
            result,
            Err(GeminiError::Response(ResponseError::MissingField { .. }))
        ));
    }

    #[test]
    fn test_decoder_recovers_after_rejected_document() {
        let mut decoder = StreamDecoder::new();
        assert!(decoder
            .feed_collect(&chunk("data: {\"usageMetadata\":{}}\n\n"))
            .is_err());

        let results = decoder
            .feed_collect(&chunk(
                "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"next\"}]}}]}\n\n",
            ))
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "next");
    }

    #[test]
    fn test_finish_reason_is_observed_without_changing_output() {
        let mut decoder = StreamDecoder::new();
        let document = json!({
            "candidates": [{"content": {"parts": [{"text": "done"}]}, "finishReason": "STOP"}]
        });

        let results = decoder
            .feed_collect(&chunk(&format!("data: {}\n\n", document)))
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document, document);
        assert!(decoder.finish_reason_seen());
    }

    #[test]
    fn test_custom_separator() {
        let mut decoder = StreamDecoder::with_separator("");
        let results = decoder
            .feed_collect(&chunk(
                "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"a\"},{\"text\":\"b\"}]}}]}\n\n",
            ))
            .unwrap();

        assert_eq!(results[0].text, "ab");
    }

    #[test]
    fn test_finish_discards_partial_data() {
        let mut decoder = StreamDecoder::new();
        decoder.feed_collect(&chunk("data: {\"candidates\":\n\n")).unwrap();
        decoder.finish();

        let results = decoder
            .feed_collect(&chunk("data: {\"candidates\":[]}\n\n"))
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(decoder.documents_emitted(), 1);
    }
}
