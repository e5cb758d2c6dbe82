//! Server-Sent Events (SSE) processing for streaming responses.
//!
//! This module parses the SSE body of a streaming chat completion into
//! [`ChatCompletionChunk`] values. OpenAI-compatible services emit events as
//! `data: {json}` records separated by blank lines, terminated by a literal
//! `data: [DONE]` record.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::observability::{STREAM_BYTES, STREAM_ERRORS, STREAM_EVENTS};
use crate::types::ChatCompletionChunk;
use crate::{Error, Result};

/// One frame extracted from the SSE buffer.
enum SseFrame {
    /// A parsed (or unparsable) chunk event.
    Chunk(Result<ChatCompletionChunk>),
    /// The `[DONE]` end-of-stream marker.
    Done,
}

/// Process a stream of bytes into a stream of chat completion chunks.
///
/// This function takes the byte stream of an HTTP response and converts it
/// into parsed [`ChatCompletionChunk`] objects, handling SSE framing,
/// buffering of partial events, and error conditions. The stream ends when
/// the provider sends its `[DONE]` marker or the transport closes.
pub fn process_sse<S>(byte_stream: S) -> impl Stream<Item = Result<ChatCompletionChunk>>
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin + 'static,
{
    // Convert reqwest errors to our error type
    let stream = byte_stream.map(|result| {
        result
            .map_err(|e| Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e))))
    });

    // Use a state machine to process the SSE stream
    let buffer = String::new();

    stream::unfold(
        (stream, buffer),
        move |(mut stream, mut buffer)| async move {
            loop {
                // First check if we have a complete event in the buffer
                if let Some((frame, remaining)) = extract_event(&buffer) {
                    buffer = remaining;
                    match frame {
                        SseFrame::Chunk(chunk) => {
                            observe(&chunk);
                            return Some((chunk, (stream, buffer)));
                        }
                        SseFrame::Done => return None,
                    }
                }

                // Read more data
                match stream.next().await {
                    Some(Ok(bytes)) => {
                        STREAM_BYTES.count(bytes.len() as u64);
                        match String::from_utf8(bytes.to_vec()) {
                            Ok(text) => buffer.push_str(&text),
                            Err(e) => {
                                STREAM_ERRORS.click();
                                return Some((
                                    Err(Error::encoding(
                                        format!("Invalid UTF-8 in stream: {e}"),
                                        Some(Box::new(e)),
                                    )),
                                    (stream, buffer),
                                ));
                            }
                        }
                    }
                    Some(Err(e)) => {
                        STREAM_ERRORS.click();
                        return Some((Err(e), (stream, buffer)));
                    }
                    None => {
                        // End of stream; flush a trailing event without a blank line
                        if !buffer.is_empty()
                            && let Some(frame) = parse_event(&buffer)
                        {
                            buffer.clear();
                            match frame {
                                SseFrame::Chunk(chunk) => {
                                    observe(&chunk);
                                    return Some((chunk, (stream, buffer)));
                                }
                                SseFrame::Done => return None,
                            }
                        }
                        return None;
                    }
                }
            }
        },
    )
}

fn observe(chunk: &Result<ChatCompletionChunk>) {
    if chunk.is_ok() {
        STREAM_EVENTS.click();
    } else {
        STREAM_ERRORS.click();
    }
}

/// Extract a complete SSE event from a buffer string.
///
/// Events are delimited by blank lines; anything before the delimiter is one
/// event record.
fn extract_event(buffer: &str) -> Option<(SseFrame, String)> {
    let (event_text, rest) = buffer.split_once("\n\n")?;
    let rest = rest.to_string();
    let frame = parse_event(event_text)?;
    Some((frame, rest))
}

/// Parse one SSE event record into a frame.
///
/// Records without a `data:` field (comments, `event:`-only keep-alives) are
/// skipped by treating them as empty terminal frames only when the buffer is
/// otherwise drained; here they simply parse to nothing and the caller reads
/// more input.
fn parse_event(event_text: &str) -> Option<SseFrame> {
    let mut data: Option<&str> = None;
    for line in event_text.lines() {
        if let Some(rest) = line.strip_prefix("data:") {
            data = Some(rest.trim());
        }
    }

    match data {
        Some("[DONE]") => Some(SseFrame::Done),
        Some(json_str) => match serde_json::from_str::<ChatCompletionChunk>(json_str) {
            Ok(chunk) => Some(SseFrame::Chunk(Ok(chunk))),
            Err(e) => Some(SseFrame::Chunk(Err(Error::serialization(
                format!("Failed to parse event JSON: {e}"),
                Some(Box::new(e)),
            )))),
        },
        None => None,
    }
}
