//! NDJSON stream decoding under cancellation
//!
//! Turns a byte stream of newline-delimited JSON fragments into a sequence
//! of [`StreamEvent`]s. Cancellation is checked at line boundaries, never
//! mid-line; a cancelled stream ends cleanly with whatever was already
//! decoded, a successful early return rather than a failure.

use async_stream::stream;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use quill_core::{LlmError, LlmResult, StreamEvent};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// One line of the `/generate` response stream
#[derive(Debug, Deserialize)]
struct GenerateLine {
    response: String,
    #[serde(default)]
    done: bool,
}

/// One line of the `/pull` status stream
#[derive(Debug, Deserialize)]
struct StatusLine {
    status: String,
    #[serde(default)]
    completed: Option<u64>,
    #[serde(default)]
    total: Option<u64>,
}

/// A decoded line: an optional event to emit, and whether the stream is
/// finished at this line.
struct Decoded {
    event: Option<StreamEvent>,
    finished: bool,
}

fn decode_generate(line: &str) -> LlmResult<Decoded> {
    let parsed: GenerateLine = serde_json::from_str(line)
        .map_err(|e| LlmError::Decode(format!("bad generate line: {}", e)))?;
    let event = if parsed.response.is_empty() {
        None
    } else {
        Some(StreamEvent::Fragment(parsed.response))
    };
    Ok(Decoded {
        event,
        finished: parsed.done,
    })
}

fn decode_status(line: &str) -> LlmResult<Decoded> {
    let parsed: StatusLine = serde_json::from_str(line)
        .map_err(|e| LlmError::Decode(format!("bad status line: {}", e)))?;
    let event = StreamEvent::Status {
        status: parsed.status,
        completed: parsed.completed,
        total: parsed.total,
    };
    // completed == total marks the pull finished even if more lines follow
    let finished = event.is_finished_status();
    Ok(Decoded {
        event: Some(event),
        finished,
    })
}

/// Decode a `/generate` NDJSON body into fragment events.
///
/// Blank lines are skipped. A malformed line is fatal and terminates the
/// decode with [`LlmError::Decode`]. The stream always ends with a single
/// [`StreamEvent::Done`] unless an error occurred.
pub fn generate_events<S, B, E>(
    body: S,
    cancel: CancellationToken,
) -> BoxStream<'static, LlmResult<StreamEvent>>
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: std::fmt::Display + Send,
{
    ndjson_events(body, cancel, "generate", decode_generate)
}

/// Decode a `/pull` NDJSON body into status events.
///
/// A status line whose `completed` counter has reached `total` is treated
/// as terminal: decoding stops at that line even if more lines are pending
/// in the input.
pub fn pull_events<S, B, E>(
    body: S,
    cancel: CancellationToken,
) -> BoxStream<'static, LlmResult<StreamEvent>>
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: std::fmt::Display + Send,
{
    ndjson_events(body, cancel, "pull", decode_status)
}

fn ndjson_events<S, B, E>(
    body: S,
    cancel: CancellationToken,
    operation: &'static str,
    decode: fn(&str) -> LlmResult<Decoded>,
) -> BoxStream<'static, LlmResult<StreamEvent>>
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: std::fmt::Display + Send,
{
    Box::pin(stream! {
        let mut body = std::pin::pin!(body);
        let mut buffer = String::new();
        let mut finished = false;

        'read: while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(bytes) => bytes,
                Err(e) => {
                    yield Err(LlmError::Transport {
                        operation,
                        message: e.to_string(),
                    });
                    return;
                }
            };
            buffer.push_str(&String::from_utf8_lossy(chunk.as_ref()));

            // Process complete lines; cancellation is checked per line,
            // never mid-line.
            while let Some(line_end) = buffer.find('\n') {
                if cancel.is_cancelled() {
                    debug!(operation, "stream cancelled at line boundary");
                    break 'read;
                }

                let line = buffer[..line_end].trim().to_string();
                buffer.drain(..=line_end);

                if line.is_empty() {
                    continue;
                }

                let decoded = match decode(&line) {
                    Ok(decoded) => decoded,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };
                if let Some(event) = decoded.event {
                    yield Ok(event);
                }
                if decoded.finished {
                    finished = true;
                    break 'read;
                }
            }

            if cancel.is_cancelled() {
                debug!(operation, "stream cancelled between chunks");
                break 'read;
            }
        }

        // Trailing data without a newline still forms one last line.
        if !finished && !cancel.is_cancelled() {
            let line = buffer.trim();
            if !line.is_empty() {
                match decode(line) {
                    Ok(decoded) => {
                        if let Some(event) = decoded.event {
                            yield Ok(event);
                        }
                    }
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        }

        yield Ok(StreamEvent::Done);
    })
}

/// Accumulate fragment events into the final answer text.
///
/// Fragments are appended strictly in arrival order. Status events are
/// ignored here. Once the stream ends, wrapping quote characters are
/// stripped from the result.
pub async fn collect_text(
    mut events: BoxStream<'_, LlmResult<StreamEvent>>,
) -> LlmResult<String> {
    let mut text = String::new();
    while let Some(event) = events.next().await {
        match event? {
            StreamEvent::Fragment(fragment) => text.push_str(&fragment),
            StreamEvent::Status { .. } => {}
            StreamEvent::Done => break,
        }
    }
    Ok(strip_wrapping_quotes(text.trim()).to_string())
}

/// Strip leading and trailing single/double quote characters.
///
/// Some models wrap the whole answer in quotes; the wrapper is never part
/// of the requested output.
pub fn strip_wrapping_quotes(text: &str) -> &str {
    text.trim_matches(|c| c == '"' || c == '\'')
}
