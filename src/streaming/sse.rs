//! Incremental Server-Sent Events parser.
//!
//! Bytes are fed as they arrive from the network. Lines are only decoded once
//! their terminator has been seen, so a multibyte character or a `data:` field
//! split across two network reads is reassembled before it is interpreted.
//!
//! Framing follows the SSE standard:
//! - lines end in LF, CRLF or a lone CR
//! - a leading UTF-8 byte order mark is ignored
//! - lines starting with `:` are comments
//! - `field: value` lines set `event`, `data`, `id` or `retry`; unknown fields are ignored
//! - a blank line dispatches the event, but only if some `data` was received

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// A single dispatched Server-Sent Event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SseEvent {
    /// Value of the `event` field, if one was given.
    pub event_type: Option<String>,
    /// The `data` lines of the event, joined with `\n`.
    pub data: String,
    /// The last event id seen on the stream.
    pub id: Option<String>,
    /// The last reconnection time (milliseconds) seen on the stream.
    pub retry: Option<u64>,
}

/// Stateful SSE parser for one stream.
#[derive(Debug, Default)]
pub struct SseParser {
    /// Bytes of the current, not yet terminated line.
    line: Vec<u8>,
    /// The previous byte was a CR, so an immediately following LF is skipped.
    after_cr: bool,
    /// The first line has been processed and can no longer carry a BOM.
    started: bool,
    event_type: Option<String>,
    data: String,
    has_data: bool,
    last_event_id: Option<String>,
    retry: Option<u64>,
}

impl SseParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes and return every event completed by them, in order.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        let mut events = Vec::new();

        for &byte in bytes {
            if self.after_cr {
                self.after_cr = false;
                if byte == b'\n' {
                    continue;
                }
            }

            match byte {
                b'\r' => {
                    self.after_cr = true;
                    self.end_line(&mut events);
                }
                b'\n' => self.end_line(&mut events),
                _ => self.line.push(byte),
            }
        }

        events
    }

    /// Whether bytes or fields of an unfinished event are buffered.
    pub fn has_pending(&self) -> bool {
        !self.line.is_empty() || self.has_data
    }

    fn end_line(&mut self, events: &mut Vec<SseEvent>) {
        let mut raw = std::mem::take(&mut self.line);

        if !self.started {
            self.started = true;
            if raw.starts_with(BOM) {
                raw.drain(..BOM.len());
            }
        }

        if raw.is_empty() {
            if let Some(event) = self.dispatch() {
                events.push(event);
            }
            return;
        }

        let line = String::from_utf8_lossy(&raw);
        self.process_field(&line);
    }

    fn process_field(&mut self, line: &str) {
        if line.starts_with(':') {
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event_type = Some(value.to_string()),
            "data" => {
                if self.has_data {
                    self.data.push('\n');
                }
                self.data.push_str(value);
                self.has_data = true;
            }
            "id" => {
                if !value.contains('\0') {
                    self.last_event_id = Some(value.to_string());
                }
            }
            "retry" => {
                if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
                    if let Ok(millis) = value.parse() {
                        self.retry = Some(millis);
                    }
                }
            }
            _ => {}
        }
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event_type = self.event_type.take();

        if !self.has_data {
            return None;
        }

        self.has_data = false;
        Some(SseEvent {
            event_type,
            data: std::mem::take(&mut self.data),
            id: self.last_event_id.clone(),
            retry: self.retry,
        })
    }
}
