//! Incremental SSE decoder for streamed JSON-RPC frames.

/// Accumulates raw response bytes and yields complete `data` payloads.
///
/// Events may carry several `data:` lines; they are joined with `\n` and
/// emitted when a blank line ends the event. Comment lines and other fields
/// are ignored.
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    /// Feed a chunk of bytes and drain every event it completes.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);
        let mut payloads = Vec::new();
        while let Some(newline) = self.pending.iter().position(|b| *b == b'\n') {
            let raw = self.pending.drain(..=newline).collect::<Vec<_>>();
            let line = String::from_utf8_lossy(&raw);
            self.push_line(line.trim_end_matches(['\n', '\r']), &mut payloads);
        }
        payloads
    }

    /// Flush a trailing event when the stream ends without a blank line.
    pub fn finish(&mut self) -> Vec<String> {
        let mut payloads = Vec::new();
        if !self.pending.is_empty() {
            let raw = std::mem::take(&mut self.pending);
            let line = String::from_utf8_lossy(&raw).into_owned();
            self.push_line(line.trim_end_matches('\r'), &mut payloads);
        }
        self.flush_event(&mut payloads);
        payloads
    }

    fn push_line(&mut self, line: &str, payloads: &mut Vec<String>) {
        if line.is_empty() {
            self.flush_event(payloads);
            return;
        }
        if line.starts_with(':') {
            return;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data_lines.push(value.to_string());
        }
    }

    fn flush_event(&mut self, payloads: &mut Vec<String>) {
        if self.data_lines.is_empty() {
            return;
        }
        let payload = self.data_lines.join("\n");
        self.data_lines.clear();
        if !payload.trim().is_empty() && payload.trim() != "[DONE]" {
            payloads.push(payload);
        }
    }
}
