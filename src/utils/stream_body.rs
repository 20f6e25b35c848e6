use crate::utils::data_types::StreamChunk;
use axum::body::{Body, Bytes};
use eyre::{Result, WrapErr};
use futures::{Stream, StreamExt, TryStreamExt};
use reqwest as r;
use std::collections::VecDeque;

pub const DONE_MARKER: &str = "[DONE]";

/// Upper bound on a single buffered SSE line.
pub const MAX_LINE_BYTES: usize = 1 << 20;

/// One `data:` line, tagged with the `event:` type of its frame, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseData {
    pub event: Option<String>,
    pub data: String,
}

/// Splits an SSE byte stream into `data:` payloads, one per line.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
    // bytes of `buf` already known to hold no newline
    scanned: usize,
    event: Option<String>,
}

impl SseDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<SseData>> {
        self.buf.extend_from_slice(chunk);
        let mut payloads = vec![];
        while let Some(pos) = self.buf[self.scanned..].iter().position(|b| *b == b'\n') {
            let end = self.scanned + pos;
            let line = self.buf.drain(..=end).collect::<Vec<_>>();
            self.scanned = 0;
            payloads.extend(self.parse_line(&line));
        }
        self.scanned = self.buf.len();
        if self.buf.len() > MAX_LINE_BYTES {
            return Err(eyre::eyre!(
                "Stream line exceeds {} bytes without a newline",
                MAX_LINE_BYTES
            ));
        }
        Ok(payloads)
    }

    /// Flushes a trailing line that was not newline-terminated.
    pub fn finish(&mut self) -> Option<SseData> {
        let line = std::mem::take(&mut self.buf);
        self.scanned = 0;
        self.parse_line(&line)
    }

    fn parse_line(&mut self, line: &[u8]) -> Option<SseData> {
        let line = String::from_utf8_lossy(line);
        let line = line.trim_end_matches(['\n', '\r']);
        if line.is_empty() {
            // frame boundary
            self.event = None;
            return None;
        }
        if let Some(event) = field(line, "event") {
            self.event = Some(event.to_owned());
            return None;
        }
        let data = field(line, "data")?;
        Some(SseData {
            event: self.event.clone(),
            data: data.to_owned(),
        })
    }
}

fn field<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let value = line.strip_prefix(name)?.strip_prefix(':')?;
    Some(value.strip_prefix(' ').unwrap_or(value))
}

struct DeltaState {
    resp: r::Response,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    error: Option<eyre::Report>,
    finished: bool,
}

impl DeltaState {
    /// Queues text increments. A failure stops the stream once the text
    /// queued before it has been delivered.
    fn queue(&mut self, payloads: impl IntoIterator<Item = SseData>) {
        for payload in payloads {
            if self.finished {
                break;
            }
            if let Err(err) = self.queue_one(payload) {
                self.error = Some(err);
                self.finished = true;
            }
        }
    }

    fn queue_one(&mut self, payload: SseData) -> Result<()> {
        if payload.event.as_deref() == Some("error") {
            return Err(eyre::eyre!("Upstream stream error: {}", payload.data));
        }
        if payload.data == DONE_MARKER {
            self.finished = true;
            return Ok(());
        }
        let chunk: StreamChunk = serde_json::from_str(&payload.data)
            .wrap_err_with(|| format!("Malformed stream chunk: {}", payload.data))?;
        if let Some(err) = &chunk.error {
            return Err(eyre::eyre!("Upstream stream error: {}", error_message(err)));
        }
        self.pending.extend(chunk.content());
        Ok(())
    }
}

fn error_message(err: &serde_json::Value) -> String {
    match err.get("message").and_then(|m| m.as_str()) {
        Some(message) => message.to_owned(),
        None => err.to_string(),
    }
}

/// Yields each non-empty text increment of a streamed completion, as soon as
/// it arrives. Dropping the stream drops the upstream response.
pub fn completion_deltas(resp: r::Response) -> impl Stream<Item = Result<String>> {
    let state = DeltaState {
        resp,
        decoder: SseDecoder::default(),
        pending: VecDeque::new(),
        error: None,
        finished: false,
    };

    futures::stream::try_unfold(state, |mut state| async move {
        loop {
            if let Some(text) = state.pending.pop_front() {
                return Ok::<_, eyre::Report>(Some((text, state)));
            }
            if let Some(err) = state.error.take() {
                return Err(err);
            }
            if state.finished {
                return Ok(None);
            }
            match state.resp.chunk().await? {
                Some(chunk) => {
                    let payloads = state.decoder.push(&chunk)?;
                    state.queue(payloads);
                }
                None => {
                    let tail = state.decoder.finish();
                    state.queue(tail);
                    state.finished = true;
                }
            }
        }
    })
}

pub fn sse_frame(data: &str) -> Bytes {
    Bytes::from(format!("data: {}\n\n", data))
}

/// Frames each increment as `data: <text>`, then appends the `[DONE]` frame.
/// An upstream error ends the body without it.
pub fn get_body_stream<S>(deltas: S) -> Body
where
    S: Stream<Item = Result<String>> + Send + 'static,
{
    let frames = deltas
        .map_ok(|text| sse_frame(&text))
        .chain(futures::stream::once(async { Ok::<_, eyre::Report>(sse_frame(DONE_MARKER)) }))
        .inspect_err(|err| tracing::error!("[Stream] Upstream error: {:#}", err))
        .map_err(|err| std::io::Error::other(format!("{:#}", err)));

    Body::from_stream(frames)
}
