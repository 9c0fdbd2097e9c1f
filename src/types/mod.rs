//! Typed views of Gemini request and response documents.
//!
//! Calls accept and return plain `serde_json::Value` documents; these types
//! are a convenience for building payloads and reading responses.

pub mod content;
pub mod generation;
pub mod safety;

pub use content::{Blob, Content, FileData, FunctionCall, FunctionResponse, Part, Role};

pub use generation::{
    BlockReason, Candidate, CitationMetadata, CitationSource, FinishReason,
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, PromptFeedback,
    UsageMetadata,
};

pub use safety::{HarmBlockThreshold, HarmCategory, HarmProbability, SafetyRating, SafetySetting};
