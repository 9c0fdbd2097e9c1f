//! Service implementations for the Gemini API.

pub mod content;

pub use content::*;
