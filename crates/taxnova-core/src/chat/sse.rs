//! Server-sent event decoding for streamed chat completions.
//!
//! The body arrives in arbitrary chunks; lines are buffered as bytes so a
//! chunk boundary may split a line or a multi-byte character.

use serde::Deserialize;
use tracing::trace;

use super::Result;
use crate::error::ChatError;

/// A decoded stream event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A text fragment of the assistant reply.
    Delta(String),
    /// End of stream marker.
    Done,
}

#[derive(Deserialize)]
struct CompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    error: Option<ServiceError>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Deserialize, Default)]
struct Delta {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ServiceError {
    message: String,
}

/// Incremental SSE line decoder.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a body chunk and return the events completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<SseEvent>> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(event) = parse_line(&String::from_utf8_lossy(&line))? {
                events.push(event);
            }
        }
        Ok(events)
    }

    /// Decode whatever is left once the body has ended.
    pub fn finish(&mut self) -> Result<Vec<SseEvent>> {
        if self.buffer.is_empty() {
            return Ok(Vec::new());
        }
        let line: Vec<u8> = std::mem::take(&mut self.buffer);
        Ok(parse_line(&String::from_utf8_lossy(&line))?.into_iter().collect())
    }
}

fn parse_line(line: &str) -> Result<Option<SseEvent>> {
    let line = line.trim_end_matches(['\r', '\n']);

    // Comments, `event:` and `id:` fields carry nothing we use.
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(None);
    };
    let data = data.trim_start();

    if data.is_empty() {
        return Ok(None);
    }
    if data == "[DONE]" {
        return Ok(Some(SseEvent::Done));
    }

    trace!("stream event: {}", data);
    let chunk: CompletionChunk =
        serde_json::from_str(data).map_err(|e| ChatError::Decode(e.to_string()))?;

    if let Some(error) = chunk.error {
        return Err(ChatError::Service(error.message));
    }

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content)
        .filter(|content| !content.is_empty())
        .map(SseEvent::Delta))
}
