use serde::{Deserialize, Serialize};

// ─── AnalysisEvent ────────────────────────────────────────────────────────

/// One envelope on the newline-delimited JSON analysis stream,
/// discriminated by the `"type"` field.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisEvent {
    /// Intermediate progress; `stage` names the step the server is on.
    Progress { stage: String },
    /// Terminal payload. At most one per stream.
    Result { data: serde_json::Value },
    /// Terminal failure reported in-band.
    #[serde(rename_all = "camelCase")]
    Error {
        error: String,
        #[serde(default)]
        details: Option<String>,
        #[serde(default)]
        user_message: Option<String>,
    },
}

impl AnalysisEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisEvent::Result { .. } | AnalysisEvent::Error { .. })
    }
}

// ─── LineDecoder ──────────────────────────────────────────────────────────

/// Splits an arbitrarily-chunked byte stream into complete lines.
///
/// Buffers bytes (not chars — a chunk boundary may fall inside a UTF-8
/// sequence) and yields a line only once its newline arrives. The trailing
/// partial line is held across calls; [`LineDecoder::finish`] surfaces it at
/// end-of-stream so a body without a final newline still parses.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buf: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk; returns every line completed by it, in order.
    /// Blank lines are dropped.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw[..raw.len() - 1]);
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
        }
        lines
    }

    /// Consume the decoder, yielding the unterminated tail, if any.
    pub fn finish(self) -> Option<String> {
        let tail = String::from_utf8_lossy(&self.buf);
        let trimmed = tail.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

// ─── Line parsing ─────────────────────────────────────────────────────────

/// Parse one line into an event.
///
/// Returns `None` for lines that are not valid JSON (truncated writes are
/// expected on this transport and skipping them keeps the stream alive)
/// and for valid JSON carrying an unrecognised `"type"` — forward
/// compatibility with envelope kinds this client does not know yet.
pub fn parse_line(line: &str) -> Option<AnalysisEvent> {
    match serde_json::from_str::<AnalysisEvent>(line) {
        Ok(event) => Some(event),
        Err(_) => None,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
