//! NDJSON stream decoding for Ollama streaming responses.
//!
//! Ollama streams one JSON object per line over a chunked body:
//! ```text
//! {"model":"llama3","created_at":"t1","response":"Hello","done":false}
//! {"model":"llama3","created_at":"t2","response":" world","done":false}
//! {"model":"llama3","created_at":"t3","response":"","done":true,"done_reason":"stop","eval_count":10}
//! ```
//!
//! The decoder is a pure framing/parsing layer: it splits lines,
//! parses each into a wire chunk, and yields it. It never interprets
//! `done` — that is the projector's business.
//!
//! Reference: <https://github.com/ollama/ollama/blob/main/docs/api.md>

use async_stream::try_stream;
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use kestrel_types::ServiceError;
use serde::de::DeserializeOwned;

/// Decode a byte stream of newline-delimited JSON into wire chunks.
///
/// Buffers raw bytes across network chunks and splits on `b'\n'`, so a
/// multi-byte character straddling a chunk boundary reassembles before
/// any UTF-8 decoding happens. Each complete line is decoded as UTF-8
/// and then as JSON; empty lines are skipped and a trailing fragment
/// left without a final newline is still decoded. Yields in arrival
/// order, one chunk per line, reading only as the consumer polls. The
/// first bad line (invalid UTF-8, invalid JSON, or a schema violation)
/// yields a [`ServiceError::Decode`] and ends the stream; chunks
/// already yielded stand.
pub(crate) fn ndjson_stream<T, S>(
    byte_stream: S,
) -> impl Stream<Item = Result<T, ServiceError>> + Send
where
    T: DeserializeOwned + Send + 'static,
    S: Stream<Item = Result<Bytes, ServiceError>> + Send + 'static,
{
    try_stream! {
        let mut byte_stream = std::pin::pin!(byte_stream);
        let mut buf = BytesMut::new();

        while let Some(chunk) = byte_stream.next().await {
            buf.extend_from_slice(&chunk?);

            while let Some(newline_pos) = buf.iter().position(|&b| b == b'\n') {
                let line = buf.split_to(newline_pos + 1);
                let line = line[..newline_pos].trim_ascii();

                if line.is_empty() {
                    continue;
                }

                yield decode_line(line)?;
            }
        }

        // A final line without a trailing newline is still a chunk.
        let remaining = buf.trim_ascii();
        if !remaining.is_empty() {
            yield decode_line(remaining)?;
        }
    }
}

fn decode_line<T: DeserializeOwned>(line: &[u8]) -> Result<T, ServiceError> {
    let line = std::str::from_utf8(line)
        .map_err(|e| ServiceError::Decode(format!("invalid UTF-8 in chunk: {e}")))?;
    serde_json::from_str(line).map_err(|e| ServiceError::Decode(format!("invalid chunk: {e}")))
}
