//! Per-call options and call results.

use serde_json::Value;

use crate::error::GeminiResult;
use crate::response::{extract_text_from_documents, DEFAULT_JOIN_SEPARATOR};
use crate::types::GenerateContentResponse;

/// Options for a single generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Model to call; falls back to the configured default model.
    pub model: Option<String>,
    /// Request server-sent events (`alt=sse`); the default depends on the method.
    pub server_sent_events: Option<bool>,
    /// Separator used when joining extracted text.
    pub join_separator: Option<String>,
}

impl CallOptions {
    /// Options with every value left to its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Turn server-sent events on or off.
    pub fn server_sent_events(mut self, enabled: bool) -> Self {
        self.server_sent_events = Some(enabled);
        self
    }

    /// Set the text separator.
    pub fn join_separator(mut self, separator: impl Into<String>) -> Self {
        self.join_separator = Some(separator.into());
        self
    }
}

/// The documents returned by a generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutput {
    documents: Vec<Value>,
    separator: String,
}

impl GenerationOutput {
    /// Wrap documents, joining their text with `separator`.
    pub fn new(documents: Vec<Value>, separator: impl Into<String>) -> Self {
        Self {
            documents,
            separator: separator.into(),
        }
    }

    /// The response documents in the order they were received.
    pub fn documents(&self) -> &[Value] {
        &self.documents
    }

    /// Consume the output and return its documents.
    pub fn into_documents(self) -> Vec<Value> {
        self.documents
    }

    /// Whether no document was received.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Text of all candidates of all documents, joined with the call's separator.
    pub fn text(&self) -> GeminiResult<String> {
        extract_text_from_documents(&self.documents, &self.separator)
    }

    /// Text of all candidates of all documents, joined with `separator`.
    pub fn text_with(&self, separator: &str) -> GeminiResult<String> {
        extract_text_from_documents(&self.documents, separator)
    }

    /// Typed views of the documents.
    pub fn responses(&self) -> GeminiResult<Vec<GenerateContentResponse>> {
        self.documents
            .iter()
            .map(|document| Ok(serde_json::from_value(document.clone())?))
            .collect()
    }
}

impl Default for GenerationOutput {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_JOIN_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn output() -> GenerationOutput {
        GenerationOutput::new(
            vec![
                json!({"candidates": [{"content": {"parts": [{"text": "Hi"}]}}]}),
                json!({"candidates": [{"content": {"parts": [{"text": "there"}]}, "finishReason": "STOP"}]}),
            ],
            " ",
        )
    }

    #[test]
    fn test_text_and_text_with() {
        let output = output();
        assert_eq!(output.text().unwrap(), "Hi there");
        assert_eq!(output.text_with("").unwrap(), "Hithere");
    }

    #[test]
    fn test_typed_responses() {
        let responses = output().responses().unwrap();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[1].finish_reasons().len(), 1);
    }

    #[test]
    fn test_call_options_builder() {
        let options = CallOptions::new()
            .model("gemini-pro")
            .server_sent_events(false)
            .join_separator("\n");

        assert_eq!(options.model.as_deref(), Some("gemini-pro"));
        assert_eq!(options.server_sent_events, Some(false));
        assert_eq!(options.join_separator.as_deref(), Some("\n"));
    }

    #[test]
    fn test_default_output_is_empty() {
        let output = GenerationOutput::default();
        assert!(output.is_empty());
        assert_eq!(output.text().unwrap(), "");
    }
}
