//! Test fixtures for the Gemini API client.
//!
//! Fixtures live under `src/fixtures/`:
//! - `content/` complete response bodies, including newline-delimited ones
//! - `streaming/` raw `text/event-stream` bodies
//! - `errors/` error envelopes as returned by both backends

use std::path::PathBuf;

/// Get the path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("src")
        .join("fixtures")
        .join(relative_path)
}

/// Load a fixture file as a string.
pub fn load_fixture(relative_path: &str) -> String {
    std::fs::read_to_string(fixture_path(relative_path))
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", relative_path, e))
}

/// Load a fixture file as raw bytes, line endings untouched.
pub fn load_bytes_fixture(relative_path: &str) -> Vec<u8> {
    std::fs::read(fixture_path(relative_path))
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", relative_path, e))
}

/// Load a JSON fixture and parse it.
pub fn load_json_fixture<T: serde::de::DeserializeOwned>(relative_path: &str) -> T {
    let content = load_fixture(relative_path);
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse JSON fixture {}: {}", relative_path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_json_fixture() {
        let json: serde_json::Value = load_json_fixture("content/success_response.json");
        assert!(json.get("candidates").is_some());
        assert!(json.get("usageMetadata").is_some());
    }

    #[test]
    fn test_sse_fixture_keeps_crlf() {
        let bytes = load_bytes_fixture("streaming/crlf_with_comments.sse");
        assert!(bytes.windows(2).any(|pair| pair == b"\r\n"));
    }
}
