/*!
 * Decoding of line-delimited streaming responses.
 *
 * Both server-sent events (OpenAI) and JSON lines (Ollama) deliver one
 * record per line, but network chunks split lines (and multibyte chars)
 * arbitrarily. `decode_lines` reassembles complete lines and hands each one
 * to a provider-specific parser.
 */

use bytes::Bytes;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::collections::VecDeque;

use crate::errors::ProviderError;
use crate::translation::TextStream;

/// What a provider parser made of one line
#[derive(Debug)]
pub enum LineEvent {
    /// A text increment
    Text(String),
    /// Nothing to emit (keep-alives, comments, metadata)
    Skip,
    /// End of the response
    Done,
    /// The provider reported an error mid-stream
    Error(ProviderError),
}

/// Accumulates bytes and yields complete lines
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: Vec<u8>,
}

impl LineBuffer {
    /// Append a chunk and drain every complete line
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            lines.push(Self::decode(&line[..line.len() - 1]));
        }
        lines
    }

    /// Remaining partial line at end of input
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        Some(Self::decode(&rest))
    }

    fn decode(line: &[u8]) -> String {
        String::from_utf8_lossy(line).trim_end_matches('\r').to_string()
    }
}

struct DecodeState<F> {
    bytes: BoxStream<'static, Result<Bytes, ProviderError>>,
    lines: LineBuffer,
    pending: VecDeque<Result<String, ProviderError>>,
    parse: F,
    finished: bool,
}

impl<F> DecodeState<F>
where
    F: FnMut(&str) -> LineEvent,
{
    fn handle(&mut self, line: &str) {
        if self.finished {
            return;
        }
        match (self.parse)(line) {
            LineEvent::Text(text) if !text.is_empty() => self.pending.push_back(Ok(text)),
            LineEvent::Text(_) | LineEvent::Skip => {}
            LineEvent::Done => self.finished = true,
            LineEvent::Error(error) => {
                self.pending.push_back(Err(error));
                self.finished = true;
            }
        }
    }
}

/// Turn a byte stream of line records into a text stream
///
/// The stream ends at the first `Done` or error, or when the bytes run out.
pub fn decode_lines<S, F>(bytes: S, parse: F) -> TextStream
where
    S: Stream<Item = Result<Bytes, ProviderError>> + Send + 'static,
    F: FnMut(&str) -> LineEvent + Send + 'static,
{
    let state = DecodeState {
        bytes: bytes.boxed(),
        lines: LineBuffer::default(),
        pending: VecDeque::new(),
        parse,
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    for line in state.lines.push(&chunk) {
                        state.handle(&line);
                    }
                }
                Some(Err(error)) => {
                    state.pending.push_back(Err(error));
                    state.finished = true;
                }
                None => {
                    if let Some(line) = state.lines.finish() {
                        state.handle(&line);
                    }
                    state.finished = true;
                }
            }
        }
    })
    .boxed()
}
