//! Response documents: body normalization and text extraction.
//!
//! A non-streamed `streamGenerateContent` call may answer with several JSON
//! documents separated by newlines. [`normalize_body`] turns such a body into
//! one JSON array. [`extract_text`] and [`extract_text_from_documents`]
//! project documents to the text of their candidates.

mod assemble;
mod extract;

pub use assemble::{normalize_body, ResponseBody};
pub use extract::{extract_text, extract_text_from_documents, DEFAULT_JOIN_SEPARATOR};
