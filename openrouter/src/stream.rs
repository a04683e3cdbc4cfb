//! Pull-based reader over a streaming completion response.
//!
//! A [`StreamReader`] owns the response body. Each [`recv`](StreamReader::recv)
//! pulls bytes until one chunk can be returned, the stream ends, or reading
//! fails:
//!
//! ```text
//!            terminator / clean EOF
//!   Open ───────────────────────────▶ Completed ──┐
//!     │                                           │ close()
//!     │ read error                                ▼
//!     └──────────────────────────────▶ Errored ─▶ Closed  (absorbing)
//! ```
//!
//! `Completed` keeps answering `Ok(None)`. `Errored` keeps failing with
//! [`StreamError::Failed`]. `Closed` always fails with [`StreamError::Closed`].

use std::fmt;
use std::marker::PhantomData;
use std::pin::Pin;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use openrouter_types::StreamError;
use tokio_util::sync::CancellationToken;

use crate::chunk::decode_chunk;
use crate::sse::{Frame, LineBuffer, classify};

// Chunk schemas live next to the reader that yields them.
pub use openrouter_types::stream::*;

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, BoxError>> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    Open,
    Completed,
    Errored,
    Closed,
}

/// Cloneable handle that closes a [`StreamReader`] from another task.
///
/// A `recv` blocked waiting for bytes wakes up and fails with
/// [`StreamError::Closed`]; later calls fail the same way.
#[derive(Debug, Clone)]
pub struct CloseHandle {
    token: CancellationToken,
}

impl CloseHandle {
    /// Close the reader. Idempotent.
    pub fn close(&self) {
        self.token.cancel();
    }

    /// Whether [`close`](Self::close) has been called on this handle, a clone,
    /// or the reader itself.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Forward-only cursor over the chunks of one streaming response.
///
/// Not meant to be driven from two tasks at once (`recv` takes `&mut self`);
/// use [`close_handle`](Self::close_handle) to cancel from elsewhere.
///
/// ```no_run
/// # async fn demo(client: openrouter::OpenRouter) -> Result<(), Box<dyn std::error::Error>> {
/// use openrouter::{ChatCompletionRequestBuilder, ChatMessage};
///
/// let messages = vec![ChatMessage::user("Hi")];
/// let request = ChatCompletionRequestBuilder::new("openai/gpt-4o", messages).build();
/// let mut stream = client.chat_completion_stream(request).await?;
/// while let Some(chunk) = stream.recv().await? {
///     for choice in &chunk.choices {
///         print!("{}", choice.delta.content.as_deref().unwrap_or_default());
///     }
/// }
/// stream.close();
/// # Ok(())
/// # }
/// ```
pub struct StreamReader<T> {
    body: Option<ByteStream>,
    lines: LineBuffer,
    state: ReaderState,
    close: CloseHandle,
    _chunk: PhantomData<fn() -> T>,
}

impl<T: StreamChunk> StreamReader<T> {
    /// Wrap an already-validated streaming HTTP response.
    pub(crate) fn from_response(response: reqwest::Response, max_line: usize) -> Self {
        Self::from_byte_stream(response.bytes_stream(), max_line)
    }

    /// Read chunks from any byte stream, e.g. a body obtained outside this
    /// crate's client or canned bytes in tests.
    pub fn from_byte_stream<S, E>(stream: S, max_line: usize) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        let body: ByteStream = Box::pin(stream.map(|item| item.map_err(Into::into)));
        Self {
            body: Some(body),
            lines: LineBuffer::new(max_line),
            state: ReaderState::Open,
            close: CloseHandle {
                token: CancellationToken::new(),
            },
            _chunk: PhantomData,
        }
    }

    /// Next chunk, `Ok(None)` once the stream has ended, or an error.
    ///
    /// The stream ends at `data: [DONE]` or when the body closes cleanly
    /// without one. Comments, blank lines, unknown fields and malformed
    /// payloads are skipped.
    ///
    /// Cancel-safe: dropping the future (e.g. under `tokio::time::timeout`)
    /// loses no buffered data, and the reader can be polled again.
    pub async fn recv(&mut self) -> Result<Option<T>, StreamError> {
        loop {
            if self.close.is_closed() {
                self.shutdown();
            }
            match self.state {
                ReaderState::Closed => return Err(StreamError::Closed),
                ReaderState::Errored => return Err(StreamError::Failed),
                ReaderState::Completed => return Ok(None),
                ReaderState::Open => {}
            }

            match self.lines.next_line() {
                Ok(Some(line)) => {
                    if let Some(outcome) = self.handle_line(&line) {
                        return Ok(outcome);
                    }
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    self.fail(&e);
                    return Err(e);
                }
            }

            let Some(body) = self.body.as_mut() else {
                tracing::debug!(kind = T::KIND, "stream body ended without terminator");
                self.complete();
                return Ok(None);
            };

            let next = tokio::select! {
                biased;
                () = self.close.token.cancelled() => continue,
                next = body.next() => next,
            };

            match next {
                Some(Ok(bytes)) => self.lines.push(&bytes),
                Some(Err(e)) => {
                    let err = StreamError::Io(e);
                    self.fail(&err);
                    return Err(err);
                }
                None => {
                    self.body = None;
                    self.lines.finish();
                }
            }
        }
    }

    /// Release the response body. Later `recv` calls fail with
    /// [`StreamError::Closed`]. Safe to call any number of times.
    pub fn close(&mut self) {
        self.close.close();
        self.shutdown();
    }

    /// A handle that can close this reader from another task, e.g. when a
    /// deadline fires while `recv` is waiting on the network.
    #[must_use]
    pub fn close_handle(&self) -> CloseHandle {
        self.close.clone()
    }

    /// Whether the stream has ended normally.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == ReaderState::Completed
    }

    /// Whether the reader has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state == ReaderState::Closed || self.close.is_closed()
    }

    /// Adapt into a [`Stream`] that ends at end-of-stream and after the first error.
    pub fn into_stream(mut self) -> impl Stream<Item = Result<T, StreamError>> + Send + 'static {
        async_stream::stream! {
            loop {
                match self.recv().await {
                    Ok(Some(chunk)) => yield Ok(chunk),
                    Ok(None) => break,
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                }
            }
        }
    }

    /// `Some` ends this `recv` call; `None` moves on to the next line.
    fn handle_line(&mut self, line: &str) -> Option<Option<T>> {
        match classify(line) {
            Frame::Data(payload) => decode_chunk::<T>(payload).map(Some),
            Frame::Terminator => {
                tracing::debug!(kind = T::KIND, "stream terminator received");
                self.complete();
                Some(None)
            }
            Frame::Comment | Frame::Other => {
                tracing::trace!(kind = T::KIND, line = line.trim(), "skipping non-data line");
                None
            }
            Frame::Empty => None,
        }
    }

    fn complete(&mut self) {
        self.state = ReaderState::Completed;
        self.body = None;
    }

    fn fail(&mut self, err: &StreamError) {
        tracing::warn!(kind = T::KIND, error = %err, "stream read failed");
        self.state = ReaderState::Errored;
        self.body = None;
    }

    fn shutdown(&mut self) {
        if self.state != ReaderState::Closed {
            tracing::debug!(kind = T::KIND, "stream closed");
            self.state = ReaderState::Closed;
            self.body = None;
        }
    }
}

impl<T> fmt::Debug for StreamReader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamReader")
            .field("state", &self.state)
            .field("pending_bytes", &self.lines.pending())
            .field("body_open", &self.body.is_some())
            .finish()
    }
}
