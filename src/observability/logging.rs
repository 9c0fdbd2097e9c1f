//! Structured logging implementation for the Gemini API client.
//!
//! Provides trait-based logging with structured field support.

use serde_json::Value;
use crate::config::LogLevel;

const REDACTED: &str = "***REDACTED***";

/// Field names whose values are never logged.
const SENSITIVE_KEYS: [&str; 12] = [
    "api_key", "apiKey", "key", "x-goog-api-key",
    "token", "access_token", "accessToken",
    "secret", "password", "credential",
    "authorization", "auth",
];

/// Logger trait for structured logging.
///
/// This trait provides methods for logging messages with structured context data.
pub trait Logger: Send + Sync {
    /// Log a debug message with structured context.
    fn debug(&self, message: &str, fields: Value);

    /// Log an info message with structured context.
    fn info(&self, message: &str, fields: Value);

    /// Log a warning message with structured context.
    fn warn(&self, message: &str, fields: Value);

    /// Log an error message with structured context.
    fn error(&self, message: &str, fields: Value);
}

/// Structured logger implementation using the tracing crate.
///
/// Fields are redacted and emitted as a JSON string on the event.
pub struct StructuredLogger {
    name: String,
    level: LogLevel,
}

impl StructuredLogger {
    /// Create a new structured logger with the given name.
    ///
    /// # Example
    /// ```
    /// use integrations_gemini_ai::observability::StructuredLogger;
    ///
    /// let logger = StructuredLogger::new("gemini.content");
    /// ```
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            level: LogLevel::Info,
        }
    }

    /// Set the minimum log level for this logger.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Check if a given level should be logged.
    fn should_log(&self, level: LogLevel) -> bool {
        level <= self.level
    }

    /// Redact sensitive fields from log data, at any depth.
    fn redact_sensitive_fields(&self, fields: Value) -> Value {
        match fields {
            Value::Object(obj) => Value::Object(
                obj.into_iter()
                    .map(|(key, value)| {
                        if SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(&key)) {
                            (key, Value::String(REDACTED.to_string()))
                        } else {
                            (key, self.redact_sensitive_fields(value))
                        }
                    })
                    .collect(),
            ),
            Value::Array(items) => Value::Array(
                items.into_iter().map(|item| self.redact_sensitive_fields(item)).collect(),
            ),
            other => other,
        }
    }
}

impl Logger for StructuredLogger {
    fn debug(&self, message: &str, fields: Value) {
        if !self.should_log(LogLevel::Debug) {
            return;
        }

        let redacted_fields = self.redact_sensitive_fields(fields);
        tracing::debug!(logger = %self.name, fields = %redacted_fields, "{}", message);
    }

    fn info(&self, message: &str, fields: Value) {
        if !self.should_log(LogLevel::Info) {
            return;
        }

        let redacted_fields = self.redact_sensitive_fields(fields);
        tracing::info!(logger = %self.name, fields = %redacted_fields, "{}", message);
    }

    fn warn(&self, message: &str, fields: Value) {
        if !self.should_log(LogLevel::Warn) {
            return;
        }

        let redacted_fields = self.redact_sensitive_fields(fields);
        tracing::warn!(logger = %self.name, fields = %redacted_fields, "{}", message);
    }

    fn error(&self, message: &str, fields: Value) {
        if !self.should_log(LogLevel::Error) {
            return;
        }

        let redacted_fields = self.redact_sensitive_fields(fields);
        tracing::error!(logger = %self.name, fields = %redacted_fields, "{}", message);
    }
}

/// Logger that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn debug(&self, _message: &str, _fields: Value) {}
    fn info(&self, _message: &str, _fields: Value) {}
    fn warn(&self, _message: &str, _fields: Value) {}
    fn error(&self, _message: &str, _fields: Value) {}
}
